//! Catalog browse projections.

use serde::Serialize;

use piyesa_core::{Price, ProductId};

/// A product as it appears in listing pages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub price: Price,
    pub image_url: Option<String>,
    pub in_stock: bool,
}

/// A product detail view with fitment names joined in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub price: Price,
    pub stock_on_hand: i32,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub variant: Option<String>,
    pub image_url: Option<String>,
}
