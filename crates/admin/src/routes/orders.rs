//! Order administration handlers.
//!
//! Orders are created by the storefront checkout; here they are listed,
//! inspected, and moved through the status lifecycle. The status string
//! is parse-validated against `OrderStatus` before any query runs, so a
//! typo is a 400 and never an opaque database error.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;

use piyesa_core::{OrderId, OrderStatus};

use crate::db::orders::{self, Order, OrderWithItems};
use crate::error::{AppError, Result};
use crate::params;
use crate::state::AppState;

use super::DataBody;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(index))
        .route("/api/orders/{id}", get(show).patch(update))
}

/// Body for a status change.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub status: String,
}

fn parse_status(raw: &str) -> Result<OrderStatus> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Validation("Invalid status".to_owned()))
}

/// List orders, newest first, optionally filtered by status.
///
/// # Errors
///
/// Returns `AppError::Validation` for an unknown status value.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<DataBody<Vec<Order>>>> {
    let status = query.get("status").map(|raw| parse_status(raw)).transpose()?;

    let rows = orders::list_orders(state.pool(), status).await?;
    Ok(Json(DataBody::new(rows)))
}

/// Fetch one order with its items.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataBody<OrderWithItems>>> {
    let id: OrderId = params::path_id(&id, "id")?;
    let order = orders::get_order_with_items(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;
    Ok(Json(DataBody::new(order)))
}

/// Move an order to a new status.
///
/// # Errors
///
/// Returns `AppError::Validation` for an unknown status value,
/// `AppError::NotFound` for an unknown id.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateOrderRequest>,
) -> Result<Json<DataBody<Order>>> {
    let id: OrderId = params::path_id(&id, "id")?;
    let status = parse_status(&body.status)?;

    let order = orders::update_order_status(state.pool(), id, status).await?;
    tracing::info!(order_id = %order.id, status = %order.status, "Order status updated");

    Ok(Json(DataBody::new(order)))
}
