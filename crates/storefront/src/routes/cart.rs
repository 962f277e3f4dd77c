//! Cart handlers.
//!
//! Carts are created lazily on first touch. Line mutations are
//! ownership-checked by joining through the user's cart, and the
//! quantity-set / remove endpoints are no-op tolerant like the address
//! directory.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use piyesa_core::{CartItemId, ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::error::{AppError, Result};
use crate::models::Cart;
use crate::params;
use crate::state::AppState;

use super::{DataBody, OkBody};

/// Body for adding a product to the cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

/// Body for setting a line's quantity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub user_id: i32,
    pub quantity: i32,
}

/// Fetch the user's cart with line totals and subtotal.
///
/// # Errors
///
/// Returns `AppError::Validation` when `userId` is missing or malformed.
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<DataBody<Cart>>> {
    let user_id: UserId = params::positive_id(query.get("userId").map(String::as_str), "userId")?;

    let cart = CartRepository::new(state.pool()).get_cart(user_id).await?;

    Ok(Json(DataBody::new(cart)))
}

/// Add a product to the cart, accumulating quantity on repeat adds.
///
/// # Errors
///
/// Returns `AppError::Validation` for malformed ids or a non-positive
/// quantity, `AppError::NotFound` when the product is unknown or
/// inactive.
pub async fn add_item(
    State(state): State<AppState>,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<DataBody<Cart>>> {
    let user_id: UserId = params::body_id(body.user_id, "userId")?;
    let product_id: ProductId = params::body_id(body.product_id, "productId")?;
    let quantity = params::positive_quantity(body.quantity, "quantity")?;

    let repo = CartRepository::new(state.pool());
    repo.add_item(user_id, product_id, quantity)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product not found".to_owned()),
            other => other.into(),
        })?;

    let cart = repo.get_cart(user_id).await?;

    Ok(Json(DataBody::new(cart)))
}

/// Set a cart line's quantity.
///
/// A line outside the user's cart matches nothing; the caller still gets
/// `{"ok": true}` and the miss goes to the log.
///
/// # Errors
///
/// Returns `AppError::Validation` for malformed ids or a non-positive
/// quantity.
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<OkBody>> {
    let item_id: CartItemId = params::path_id(&id, "id")?;
    let user_id: UserId = params::body_id(body.user_id, "userId")?;
    let quantity = params::positive_quantity(body.quantity, "quantity")?;

    let matched = CartRepository::new(state.pool())
        .update_item_quantity(user_id, item_id, quantity)
        .await?;

    if !matched {
        tracing::info!(
            user_id = %user_id,
            item_id = %item_id,
            "Cart line update matched no rows"
        );
    }

    Ok(Json(OkBody::new()))
}

/// Remove a cart line. Idempotent.
///
/// # Errors
///
/// Returns `AppError::Validation` for malformed ids.
pub async fn remove_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<OkBody>> {
    let item_id: CartItemId = params::path_id(&id, "id")?;
    let user_id: UserId = params::positive_id(query.get("userId").map(String::as_str), "userId")?;

    let removed = CartRepository::new(state.pool())
        .remove_item(user_id, item_id)
        .await?;

    if !removed {
        tracing::info!(
            user_id = %user_id,
            item_id = %item_id,
            "Cart line removal matched no rows"
        );
    }

    Ok(Json(OkBody::new()))
}
