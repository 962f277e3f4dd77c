//! Sales ledger handlers.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use piyesa_core::{ProductId, SaleId};

use crate::db::sales::{self, NewSale, Sale};
use crate::error::{AppError, Result};
use crate::params;
use crate::state::AppState;

use super::{DataBody, OkBody};

/// Build the sales router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/sales", get(index).post(create))
        .route("/api/sales/{id}", get(show).delete(delete))
}

/// Body for recording a sale. `soldAt` defaults to now.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub sold_at: Option<DateTime<Utc>>,
}

/// List sales, newest first, optionally filtered by product.
///
/// # Errors
///
/// Returns `AppError::Validation` for a malformed `productId`.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<DataBody<Vec<Sale>>>> {
    let product_id: Option<ProductId> = params::optional_id(&query, "productId")?;
    let rows = sales::list_sales(state.pool(), product_id).await?;
    Ok(Json(DataBody::new(rows)))
}

/// Fetch one sale.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataBody<Sale>>> {
    let id: SaleId = params::path_id(&id, "id")?;
    let sale = sales::get_sale(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale not found".to_owned()))?;
    Ok(Json(DataBody::new(sale)))
}

/// Record a sale; the product's stock goes down in the same
/// transaction.
///
/// # Errors
///
/// Returns `AppError::Validation` for bad input or a quantity above the
/// stock on hand, `AppError::Conflict` when the product does not exist.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateSaleRequest>,
) -> Result<Json<DataBody<Sale>>> {
    let product_id: ProductId = params::body_id(body.product_id, "productId")?;
    let quantity = params::positive_quantity(body.quantity, "quantity")?;
    if body.unit_price.is_sign_negative() {
        return Err(AppError::Validation("Invalid unitPrice".to_owned()));
    }

    let sale = sales::create_sale(
        state.pool(),
        NewSale {
            product_id,
            quantity,
            unit_price: body.unit_price,
            sold_at: body.sold_at,
        },
    )
    .await?;

    Ok(Json(DataBody::new(sale)))
}

/// Delete a sale; the stock is restored in the same transaction.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id.
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<OkBody>> {
    let id: SaleId = params::path_id(&id, "id")?;
    sales::delete_sale(state.pool(), id).await?;
    Ok(Json(OkBody::new()))
}
