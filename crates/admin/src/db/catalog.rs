//! Database operations for catalog reference data and products.
//!
//! Fitment rows (brand, year, model, variant) arrive through the tagged
//! catalog endpoint; each kind has a create and an update here and the
//! route decides which to call. Products are full CRUD, inactive rows
//! included; `stock_on_hand` is never set directly, only moved by the
//! supply and sales ledgers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use piyesa_core::{BrandId, ModelYearId, ProductId, VariantId, VehicleModelId};

use super::{RepositoryError, map_fk_violation, map_unique_violation, map_violations};

/// A vehicle brand.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
}

/// A model year.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ModelYear {
    pub id: ModelYearId,
    pub value: i32,
}

/// A vehicle model under a brand.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VehicleModel {
    pub id: VehicleModelId,
    pub name: String,
    pub brand_id: BrandId,
}

/// A variant under a vehicle model.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: VariantId,
    pub name: String,
    pub model_id: VehicleModelId,
}

/// A product as the back office sees it (inactive included, raw stock).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub price: Decimal,
    pub stock_on_hand: i32,
    pub brand_id: Option<BrandId>,
    pub model_id: Option<VehicleModelId>,
    pub year_id: Option<ModelYearId>,
    pub variant_id: Option<VariantId>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a product. Stock starts at zero; intake goes
/// through the supply ledger.
#[derive(Debug)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub price: Decimal,
    pub brand_id: Option<BrandId>,
    pub model_id: Option<VehicleModelId>,
    pub year_id: Option<ModelYearId>,
    pub variant_id: Option<VariantId>,
    pub image_url: Option<String>,
}

/// Partial update for a product. `None` fields are left unchanged.
#[derive(Debug, Default)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Decimal>,
    pub brand_id: Option<BrandId>,
    pub model_id: Option<VehicleModelId>,
    pub year_id: Option<ModelYearId>,
    pub variant_id: Option<VariantId>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

// =============================================================================
// Fitment reference data
// =============================================================================

/// Create a brand.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` when the name is taken.
pub async fn create_brand(pool: &PgPool, name: &str) -> Result<Brand, RepositoryError> {
    let row = sqlx::query_as::<_, Brand>(
        r"
        INSERT INTO brands (name) VALUES ($1)
        RETURNING id, name
        ",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .map_err(|e| map_unique_violation(e, "brand name already exists"))?;

    Ok(row)
}

/// Rename a brand.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id,
/// `RepositoryError::Conflict` when the new name is taken.
pub async fn update_brand(
    pool: &PgPool,
    id: BrandId,
    name: &str,
) -> Result<Brand, RepositoryError> {
    let row = sqlx::query_as::<_, Brand>(
        r"
        UPDATE brands SET name = $2 WHERE id = $1
        RETURNING id, name
        ",
    )
    .bind(id)
    .bind(name)
    .fetch_optional(pool)
    .await
    .map_err(|e| map_unique_violation(e, "brand name already exists"))?;

    row.ok_or(RepositoryError::NotFound)
}

/// Create a model year.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` when the value is taken.
pub async fn create_model_year(pool: &PgPool, value: i32) -> Result<ModelYear, RepositoryError> {
    let row = sqlx::query_as::<_, ModelYear>(
        r"
        INSERT INTO model_years (value) VALUES ($1)
        RETURNING id, value
        ",
    )
    .bind(value)
    .fetch_one(pool)
    .await
    .map_err(|e| map_unique_violation(e, "model year already exists"))?;

    Ok(row)
}

/// Change a model year's value.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id,
/// `RepositoryError::Conflict` when the new value is taken.
pub async fn update_model_year(
    pool: &PgPool,
    id: ModelYearId,
    value: i32,
) -> Result<ModelYear, RepositoryError> {
    let row = sqlx::query_as::<_, ModelYear>(
        r"
        UPDATE model_years SET value = $2 WHERE id = $1
        RETURNING id, value
        ",
    )
    .bind(id)
    .bind(value)
    .fetch_optional(pool)
    .await
    .map_err(|e| map_unique_violation(e, "model year already exists"))?;

    row.ok_or(RepositoryError::NotFound)
}

/// Create a vehicle model under a brand.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` for a duplicate name in the
/// brand or an unknown brand.
pub async fn create_vehicle_model(
    pool: &PgPool,
    brand_id: BrandId,
    name: &str,
) -> Result<VehicleModel, RepositoryError> {
    let row = sqlx::query_as::<_, VehicleModel>(
        r"
        INSERT INTO vehicle_models (brand_id, name) VALUES ($1, $2)
        RETURNING id, name, brand_id
        ",
    )
    .bind(brand_id)
    .bind(name)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        map_violations(e, "model name already exists for this brand", "brand does not exist")
    })?;

    Ok(row)
}

/// Rename or re-parent a vehicle model.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id,
/// `RepositoryError::Conflict` for a duplicate name or unknown brand.
pub async fn update_vehicle_model(
    pool: &PgPool,
    id: VehicleModelId,
    brand_id: BrandId,
    name: &str,
) -> Result<VehicleModel, RepositoryError> {
    let row = sqlx::query_as::<_, VehicleModel>(
        r"
        UPDATE vehicle_models SET brand_id = $2, name = $3 WHERE id = $1
        RETURNING id, name, brand_id
        ",
    )
    .bind(id)
    .bind(brand_id)
    .bind(name)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        map_violations(e, "model name already exists for this brand", "brand does not exist")
    })?;

    row.ok_or(RepositoryError::NotFound)
}

/// Create a variant under a vehicle model.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` for a duplicate name in the
/// model or an unknown model.
pub async fn create_variant(
    pool: &PgPool,
    model_id: VehicleModelId,
    name: &str,
) -> Result<Variant, RepositoryError> {
    let row = sqlx::query_as::<_, Variant>(
        r"
        INSERT INTO variants (model_id, name) VALUES ($1, $2)
        RETURNING id, name, model_id
        ",
    )
    .bind(model_id)
    .bind(name)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        map_violations(e, "variant name already exists for this model", "model does not exist")
    })?;

    Ok(row)
}

/// Rename or re-parent a variant.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id,
/// `RepositoryError::Conflict` for a duplicate name or unknown model.
pub async fn update_variant(
    pool: &PgPool,
    id: VariantId,
    model_id: VehicleModelId,
    name: &str,
) -> Result<Variant, RepositoryError> {
    let row = sqlx::query_as::<_, Variant>(
        r"
        UPDATE variants SET model_id = $2, name = $3 WHERE id = $1
        RETURNING id, name, model_id
        ",
    )
    .bind(id)
    .bind(model_id)
    .bind(name)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        map_violations(e, "variant name already exists for this model", "model does not exist")
    })?;

    row.ok_or(RepositoryError::NotFound)
}

// =============================================================================
// Products
// =============================================================================

/// List all products, newest first, inactive included.
///
/// # Errors
///
/// Returns error if the query fails.
pub async fn list_products(pool: &PgPool) -> Result<Vec<Product>, RepositoryError> {
    let rows = sqlx::query_as::<_, Product>(
        r"
        SELECT id, name, description, sku, price, stock_on_hand,
               brand_id, model_id, year_id, variant_id, image_url, is_active,
               created_at, updated_at
        FROM products
        ORDER BY created_at DESC, id DESC
        ",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch one product by id, active or not.
///
/// # Errors
///
/// Returns error if the query fails.
pub async fn get_product(pool: &PgPool, id: ProductId) -> Result<Option<Product>, RepositoryError> {
    let row = sqlx::query_as::<_, Product>(
        r"
        SELECT id, name, description, sku, price, stock_on_hand,
               brand_id, model_id, year_id, variant_id, image_url, is_active,
               created_at, updated_at
        FROM products
        WHERE id = $1
        ",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Create a product.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` for a duplicate SKU or an
/// unknown fitment reference.
pub async fn create_product(pool: &PgPool, new: NewProduct) -> Result<Product, RepositoryError> {
    let row = sqlx::query_as::<_, Product>(
        r"
        INSERT INTO products
            (name, description, sku, price, brand_id, model_id, year_id, variant_id, image_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, name, description, sku, price, stock_on_hand,
                  brand_id, model_id, year_id, variant_id, image_url, is_active,
                  created_at, updated_at
        ",
    )
    .bind(&new.name)
    .bind(&new.description)
    .bind(&new.sku)
    .bind(new.price)
    .bind(new.brand_id)
    .bind(new.model_id)
    .bind(new.year_id)
    .bind(new.variant_id)
    .bind(&new.image_url)
    .fetch_one(pool)
    .await
    .map_err(|e| map_violations(e, "sku already exists", "fitment reference does not exist"))?;

    Ok(row)
}

/// Partially update a product. `None` fields are left unchanged.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id,
/// `RepositoryError::Conflict` for a duplicate SKU or unknown fitment
/// reference.
pub async fn update_product(
    pool: &PgPool,
    id: ProductId,
    update: UpdateProduct,
) -> Result<Product, RepositoryError> {
    let row = sqlx::query_as::<_, Product>(
        r"
        UPDATE products
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            sku = COALESCE($4, sku),
            price = COALESCE($5, price),
            brand_id = COALESCE($6, brand_id),
            model_id = COALESCE($7, model_id),
            year_id = COALESCE($8, year_id),
            variant_id = COALESCE($9, variant_id),
            image_url = COALESCE($10, image_url),
            is_active = COALESCE($11, is_active),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, description, sku, price, stock_on_hand,
                  brand_id, model_id, year_id, variant_id, image_url, is_active,
                  created_at, updated_at
        ",
    )
    .bind(id)
    .bind(update.name)
    .bind(update.description)
    .bind(update.sku)
    .bind(update.price)
    .bind(update.brand_id)
    .bind(update.model_id)
    .bind(update.year_id)
    .bind(update.variant_id)
    .bind(update.image_url)
    .bind(update.is_active)
    .fetch_optional(pool)
    .await
    .map_err(|e| map_violations(e, "sku already exists", "fitment reference does not exist"))?;

    row.ok_or(RepositoryError::NotFound)
}

/// One line of the stock report: current counter plus lifetime ledger
/// totals for a product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockReportRow {
    pub product_id: ProductId,
    pub name: String,
    pub sku: String,
    pub stock_on_hand: i32,
    pub total_supplied: i64,
    pub total_sold: i64,
}

/// Per-product stock with supplied and sold totals, ordered by name.
///
/// # Errors
///
/// Returns error if the query fails.
pub async fn stock_report(pool: &PgPool) -> Result<Vec<StockReportRow>, RepositoryError> {
    let rows = sqlx::query_as::<_, StockReportRow>(
        r"
        SELECT p.id AS product_id, p.name, p.sku, p.stock_on_hand,
               COALESCE(s.total, 0) AS total_supplied,
               COALESCE(d.total, 0) AS total_sold
        FROM products p
        LEFT JOIN (
            SELECT product_id, SUM(quantity) AS total FROM supplies GROUP BY product_id
        ) s ON s.product_id = p.id
        LEFT JOIN (
            SELECT product_id, SUM(quantity) AS total FROM sales GROUP BY product_id
        ) d ON d.product_id = p.id
        ORDER BY p.name
        ",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Delete a product.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id,
/// `RepositoryError::Conflict` while order items, cart items, supplies
/// or sales still reference it (deactivate instead).
pub async fn delete_product(pool: &PgPool, id: ProductId) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        DELETE FROM products WHERE id = $1
        ",
    )
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| map_fk_violation(e, "product is still referenced; deactivate it instead"))?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
