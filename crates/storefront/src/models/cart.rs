//! Cart domain types.

use rust_decimal::Decimal;
use serde::Serialize;

use piyesa_core::{CartId, CartItemId, ProductId};

/// A cart line with its product snapshot and computed line total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
}

/// A user's cart with all lines and the running subtotal.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    pub id: CartId,
    pub items: Vec<CartItem>,
    pub subtotal: Decimal,
}
