//! Catalog browsing handlers.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use tracing::warn;

use piyesa_core::ProductId;

use crate::db::RepositoryError;
use crate::db::catalog::{CatalogRepository, ProductFilter};
use crate::error::{AppError, Result};
use crate::models::{ProductDetail, ProductSummary};
use crate::params;
use crate::state::AppState;

use super::DataBody;

/// Product listing response: one fixed-size page plus its 1-based number.
#[derive(Debug, Serialize)]
pub struct ProductListBody {
    pub data: Vec<ProductSummary>,
    pub page: i64,
}

/// Parse an optional fitment filter id; present-but-malformed is a 400.
fn optional_id<T: From<i32>>(
    query: &HashMap<String, String>,
    field: &str,
) -> Result<Option<T>> {
    query
        .get(field)
        .map(|raw| params::parse_positive(raw, field).map(T::from))
        .transpose()
}

/// List active products, filtered and paged.
///
/// Listing is the highest-traffic read in the system, so it carries the
/// one deliberate retry: when the first attempt times out acquiring a
/// pool connection, the call is repeated exactly once. No other error,
/// and no other endpoint, retries.
///
/// # Errors
///
/// Returns `AppError::Validation` for a malformed filter id or page.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<ProductListBody>> {
    let filter = ProductFilter {
        brand_id: optional_id(&query, "brandId")?,
        model_id: optional_id(&query, "modelId")?,
        year_id: optional_id(&query, "yearId")?,
        variant_id: optional_id(&query, "variantId")?,
    };
    let search = query.get("q").map(String::as_str);
    let page = query
        .get("page")
        .map(|raw| params::parse_positive(raw, "page"))
        .transpose()?
        .map_or(1, i64::from);

    let repo = CatalogRepository::new(state.pool());
    let products = match repo.list_products(filter, search, page).await {
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut)) => {
            warn!("Product listing timed out acquiring a connection; retrying once");
            repo.list_products(filter, search, page).await?
        }
        other => other?,
    };

    Ok(Json(ProductListBody {
        data: products,
        page,
    }))
}

/// Fetch one product with its fitment names.
///
/// # Errors
///
/// Returns `AppError::NotFound` for unknown and deactivated products
/// alike; the storefront does not reveal which.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataBody<ProductDetail>>> {
    let product_id: ProductId = params::path_id(&id, "id")?;

    let product = CatalogRepository::new(state.pool())
        .get_product(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(DataBody::new(product)))
}
