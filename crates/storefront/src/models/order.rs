//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use piyesa_core::{AddressId, OrderId, OrderStatus, ProductId};

/// An order as it appears in the user's history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub reference: String,
    pub status: OrderStatus,
    pub address_id: AddressId,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A line item snapshotted at checkout time.
///
/// `product_name` and `unit_price` are copies, so later catalog edits never
/// rewrite order history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
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
