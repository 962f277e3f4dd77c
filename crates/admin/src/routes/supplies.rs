//! Supply ledger handlers.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use piyesa_core::{ProductId, SupplyId};

use crate::db::supplies::{self, NewSupply, Supply};
use crate::error::{AppError, Result};
use crate::params;
use crate::state::AppState;

use super::{DataBody, OkBody};

/// Build the supplies router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/supplies", get(index).post(create))
        .route("/api/supplies/{id}", get(show).delete(delete))
}

/// Body for recording a supply. `suppliedAt` defaults to now.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplyRequest {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub supplier: Option<String>,
    pub supplied_at: Option<DateTime<Utc>>,
}

/// List supplies, newest first, optionally filtered by product.
///
/// # Errors
///
/// Returns `AppError::Validation` for a malformed `productId`.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<DataBody<Vec<Supply>>>> {
    let product_id: Option<ProductId> = params::optional_id(&query, "productId")?;
    let rows = supplies::list_supplies(state.pool(), product_id).await?;
    Ok(Json(DataBody::new(rows)))
}

/// Fetch one supply.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataBody<Supply>>> {
    let id: SupplyId = params::path_id(&id, "id")?;
    let supply = supplies::get_supply(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Supply not found".to_owned()))?;
    Ok(Json(DataBody::new(supply)))
}

/// Record a supply; the product's stock goes up in the same
/// transaction.
///
/// # Errors
///
/// Returns `AppError::Validation` for bad input, `AppError::Conflict`
/// when the product does not exist.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateSupplyRequest>,
) -> Result<Json<DataBody<Supply>>> {
    let product_id: ProductId = params::body_id(body.product_id, "productId")?;
    let quantity = params::positive_quantity(body.quantity, "quantity")?;
    if body.unit_cost.is_sign_negative() {
        return Err(AppError::Validation("Invalid unitCost".to_owned()));
    }

    let supplier = body
        .supplier
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned);

    let supply = supplies::create_supply(
        state.pool(),
        NewSupply {
            product_id,
            quantity,
            unit_cost: body.unit_cost,
            supplier,
            supplied_at: body.supplied_at,
        },
    )
    .await?;

    Ok(Json(DataBody::new(supply)))
}

/// Delete a supply; the stock increment is reversed in the same
/// transaction.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id.
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<OkBody>> {
    let id: SupplyId = params::path_id(&id, "id")?;
    supplies::delete_supply(state.pool(), id).await?;
    Ok(Json(OkBody::new()))
}
