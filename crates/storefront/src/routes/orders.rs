//! Checkout and order history handlers.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use piyesa_core::{AddressId, OrderId, UserId};

use crate::db::orders::{CheckoutError, OrderRepository};
use crate::error::{AppError, Result};
use crate::models::{Order, OrderWithItems};
use crate::params;
use crate::state::AppState;

use super::DataBody;

/// Body for placing an order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub user_id: i32,
    pub address_id: i32,
}

/// Place an order from the user's cart.
///
/// One transaction in the repository: snapshot the cart into order
/// lines, insert the order, clear the cart. Stock is untouched here;
/// fulfilment adjusts it through the back office.
///
/// # Errors
///
/// Returns `AppError::Validation` for malformed ids, an empty cart, or
/// an address the user does not own.
pub async fn checkout(
    State(state): State<AppState>,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<DataBody<OrderWithItems>>> {
    let user_id: UserId = params::body_id(body.user_id, "userId")?;
    let address_id: AddressId = params::body_id(body.address_id, "addressId")?;

    let order = OrderRepository::new(state.pool())
        .checkout(user_id, address_id)
        .await
        .map_err(|e| match e {
            CheckoutError::EmptyCart => AppError::Validation("Cart is empty".to_owned()),
            CheckoutError::AddressNotOwned => {
                AppError::Validation("Address does not belong to user".to_owned())
            }
            CheckoutError::Repository(err) => err.into(),
        })?;

    tracing::info!(
        user_id = %user_id,
        order_id = %order.order.id,
        reference = %order.order.reference,
        "Order placed"
    );

    Ok(Json(DataBody::new(order)))
}

/// List the user's orders, newest first.
///
/// # Errors
///
/// Returns `AppError::Validation` when `userId` is missing or malformed.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<DataBody<Vec<Order>>>> {
    let user_id: UserId = params::positive_id(query.get("userId").map(String::as_str), "userId")?;

    let orders = OrderRepository::new(state.pool())
        .list_for_user(user_id)
        .await?;

    Ok(Json(DataBody::new(orders)))
}

/// Fetch one order with its items.
///
/// # Errors
///
/// Returns `AppError::NotFound` for unknown ids and for orders owned by
/// another user alike.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<DataBody<OrderWithItems>>> {
    let order_id: OrderId = params::path_id(&id, "id")?;
    let user_id: UserId = params::positive_id(query.get("userId").map(String::as_str), "userId")?;

    let order = OrderRepository::new(state.pool())
        .get_with_items(order_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;

    Ok(Json(DataBody::new(order)))
}
