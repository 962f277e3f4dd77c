//! Database operations for order administration.
//!
//! The storefront creates orders at checkout; the back office reads
//! them and moves them through the status lifecycle. Items are
//! snapshots taken at checkout time and are never edited here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use piyesa_core::{AddressId, OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use super::RepositoryError;

/// An order as the back office sees it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub address_id: AddressId,
    pub reference: String,
    pub status: OrderStatus,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A checkout-time line item snapshot.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// An order with its line items.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// List orders, newest first, optionally filtered by status.
///
/// # Errors
///
/// Returns error if the query fails.
pub async fn list_orders(
    pool: &PgPool,
    status: Option<OrderStatus>,
) -> Result<Vec<Order>, RepositoryError> {
    let rows = sqlx::query_as::<_, Order>(
        r"
        SELECT id, user_id, address_id, reference, status, total, created_at, updated_at
        FROM orders
        WHERE ($1::order_status IS NULL OR status = $1)
        ORDER BY created_at DESC, id DESC
        ",
    )
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch one order with its items.
///
/// # Errors
///
/// Returns error if a query fails.
pub async fn get_order_with_items(
    pool: &PgPool,
    id: OrderId,
) -> Result<Option<OrderWithItems>, RepositoryError> {
    let order = sqlx::query_as::<_, Order>(
        r"
        SELECT id, user_id, address_id, reference, status, total, created_at, updated_at
        FROM orders
        WHERE id = $1
        ",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(order) = order else {
        return Ok(None);
    };

    let items = sqlx::query_as::<_, OrderItem>(
        r"
        SELECT id, product_id, product_name, quantity, unit_price
        FROM order_items
        WHERE order_id = $1
        ORDER BY id
        ",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(OrderWithItems { order, items }))
}

/// Move an order to a new status.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id.
pub async fn update_order_status(
    pool: &PgPool,
    id: OrderId,
    status: OrderStatus,
) -> Result<Order, RepositoryError> {
    let row = sqlx::query_as::<_, Order>(
        r"
        UPDATE orders SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, user_id, address_id, reference, status, total, created_at, updated_at
        ",
    )
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await?;

    row.ok_or(RepositoryError::NotFound)
}
