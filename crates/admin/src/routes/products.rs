//! Product management handlers.
//!
//! Full CRUD over the products table, inactive rows included. Stock is
//! read-only here; it only moves through the supply and sales ledgers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use piyesa_core::{BrandId, ModelYearId, ProductId, VariantId, VehicleModelId};

use crate::db::catalog::{self, NewProduct, Product, UpdateProduct};
use crate::error::{AppError, Result};
use crate::params;
use crate::state::AppState;

use super::{DataBody, OkBody};

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(index).post(create))
        .route("/api/products/{id}", get(show).patch(update).delete(delete))
}

/// Body for creating a product. Prices travel as decimal strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub price: Decimal,
    pub brand_id: Option<i32>,
    pub model_id: Option<i32>,
    pub year_id: Option<i32>,
    pub variant_id: Option<i32>,
    pub image_url: Option<String>,
}

/// Body for a partial product update; absent fields stay unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Decimal>,
    pub brand_id: Option<i32>,
    pub model_id: Option<i32>,
    pub year_id: Option<i32>,
    pub variant_id: Option<i32>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

fn validate_price(price: Decimal) -> Result<Decimal> {
    if price.is_sign_negative() {
        return Err(AppError::Validation("Invalid price".to_owned()));
    }
    Ok(price)
}

/// List all products, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn index(State(state): State<AppState>) -> Result<Json<DataBody<Vec<Product>>>> {
    let products = catalog::list_products(state.pool()).await?;
    Ok(Json(DataBody::new(products)))
}

/// Fetch one product, active or not.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataBody<Product>>> {
    let id: ProductId = params::path_id(&id, "id")?;

    let product = catalog::get_product(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(DataBody::new(product)))
}

/// Create a product. Stock starts at zero; intake goes through the
/// supply ledger.
///
/// # Errors
///
/// Returns `AppError::Validation` for bad input, `AppError::Conflict`
/// for a duplicate SKU or unknown fitment reference.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<Json<DataBody<Product>>> {
    let name = params::non_empty(&body.name, "name")?;
    let sku = params::non_empty(&body.sku, "sku")?;
    let price = validate_price(body.price)?;

    let brand_id: Option<BrandId> = body
        .brand_id
        .map(|raw| params::body_id(raw, "brandId"))
        .transpose()?;
    let model_id: Option<VehicleModelId> = body
        .model_id
        .map(|raw| params::body_id(raw, "modelId"))
        .transpose()?;
    let year_id: Option<ModelYearId> = body
        .year_id
        .map(|raw| params::body_id(raw, "yearId"))
        .transpose()?;
    let variant_id: Option<VariantId> = body
        .variant_id
        .map(|raw| params::body_id(raw, "variantId"))
        .transpose()?;

    let product = catalog::create_product(
        state.pool(),
        NewProduct {
            name,
            description: body.description,
            sku,
            price,
            brand_id,
            model_id,
            year_id,
            variant_id,
            image_url: body.image_url,
        },
    )
    .await?;

    Ok(Json(DataBody::new(product)))
}

/// Partially update a product.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id,
/// `AppError::Validation` for bad input, `AppError::Conflict` for a
/// duplicate SKU or unknown fitment reference.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<DataBody<Product>>> {
    let id: ProductId = params::path_id(&id, "id")?;

    let update = UpdateProduct {
        name: body
            .name
            .as_deref()
            .map(|raw| params::non_empty(raw, "name"))
            .transpose()?,
        description: body.description,
        sku: body
            .sku
            .as_deref()
            .map(|raw| params::non_empty(raw, "sku"))
            .transpose()?,
        price: body.price.map(validate_price).transpose()?,
        brand_id: body
            .brand_id
            .map(|raw| params::body_id(raw, "brandId"))
            .transpose()?,
        model_id: body
            .model_id
            .map(|raw| params::body_id(raw, "modelId"))
            .transpose()?,
        year_id: body
            .year_id
            .map(|raw| params::body_id(raw, "yearId"))
            .transpose()?,
        variant_id: body
            .variant_id
            .map(|raw| params::body_id(raw, "variantId"))
            .transpose()?,
        image_url: body.image_url,
        is_active: body.is_active,
    };

    let product = catalog::update_product(state.pool(), id, update).await?;
    Ok(Json(DataBody::new(product)))
}

/// Delete a product.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id,
/// `AppError::Conflict` while order items, cart items, supplies or
/// sales still reference it.
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<OkBody>> {
    let id: ProductId = params::path_id(&id, "id")?;
    catalog::delete_product(state.pool(), id).await?;
    Ok(Json(OkBody::new()))
}
