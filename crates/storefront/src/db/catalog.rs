//! Catalog browsing reads.
//!
//! The storefront never mutates products; listings filter to
//! `is_active = TRUE` so deactivated products disappear from browse but
//! survive in order history (order items snapshot name and price).

use rust_decimal::Decimal;
use sqlx::PgPool;

use piyesa_core::{BrandId, ModelYearId, Price, ProductId, VariantId, VehicleModelId};

use super::RepositoryError;
use crate::models::{ProductDetail, ProductSummary};

/// Fixed page size for product listings.
pub const PAGE_SIZE: i64 = 24;

#[derive(Debug, sqlx::FromRow)]
struct ProductSummaryRow {
    id: i32,
    name: String,
    sku: String,
    price: Decimal,
    image_url: Option<String>,
    stock_on_hand: i32,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductDetailRow {
    id: i32,
    name: String,
    description: Option<String>,
    sku: String,
    price: Decimal,
    stock_on_hand: i32,
    brand: Option<String>,
    model: Option<String>,
    year: Option<i32>,
    variant: Option<String>,
    image_url: Option<String>,
}

/// Optional fitment filters for the product listing.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProductFilter {
    pub brand_id: Option<BrandId>,
    pub model_id: Option<VehicleModelId>,
    pub year_id: Option<ModelYearId>,
    pub variant_id: Option<VariantId>,
}

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active products, newest first, one fixed-size page at a time.
    ///
    /// `page` is 1-based. `search` matches the product name
    /// case-insensitively. NULL filter parameters are no-ops, so one
    /// statement covers every filter combination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_products(
        &self,
        filter: ProductFilter,
        search: Option<&str>,
        page: i64,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let page = page.max(1);
        let offset = (page - 1) * PAGE_SIZE;
        let search_pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let rows = sqlx::query_as::<_, ProductSummaryRow>(
            r"
            SELECT id, name, sku, price, image_url, stock_on_hand
            FROM products
            WHERE is_active = TRUE
              AND ($1::int IS NULL OR brand_id = $1)
              AND ($2::int IS NULL OR model_id = $2)
              AND ($3::int IS NULL OR year_id = $3)
              AND ($4::int IS NULL OR variant_id = $4)
              AND ($5::text IS NULL OR name ILIKE $5)
            ORDER BY created_at DESC, id DESC
            LIMIT $6 OFFSET $7
            ",
        )
        .bind(filter.brand_id)
        .bind(filter.model_id)
        .bind(filter.year_id)
        .bind(filter.variant_id)
        .bind(search_pattern)
        .bind(PAGE_SIZE)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ProductSummary {
                id: ProductId::new(r.id),
                name: r.name,
                sku: r.sku,
                price: Price::php(r.price),
                image_url: r.image_url,
                in_stock: r.stock_on_hand > 0,
            })
            .collect())
    }

    /// Fetch one active product with its fitment names joined in.
    ///
    /// Returns `None` for unknown ids and for deactivated products; the
    /// storefront treats both as 404.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_product(
        &self,
        product_id: ProductId,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductDetailRow>(
            r"
            SELECT p.id, p.name, p.description, p.sku, p.price, p.stock_on_hand,
                   b.name AS brand,
                   vm.name AS model,
                   my.value AS year,
                   v.name AS variant,
                   p.image_url
            FROM products p
            LEFT JOIN brands b ON p.brand_id = b.id
            LEFT JOIN vehicle_models vm ON p.model_id = vm.id
            LEFT JOIN model_years my ON p.year_id = my.id
            LEFT JOIN variants v ON p.variant_id = v.id
            WHERE p.id = $1 AND p.is_active = TRUE
            ",
        )
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| ProductDetail {
            id: ProductId::new(r.id),
            name: r.name,
            description: r.description,
            sku: r.sku,
            price: Price::php(r.price),
            stock_on_hand: r.stock_on_hand,
            brand: r.brand,
            model: r.model,
            year: r.year,
            variant: r.variant,
            image_url: r.image_url,
        }))
    }
}

/// Escape LIKE metacharacters so user input matches literally.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_passes_plain_text() {
        assert_eq!(escape_like("brake pad"), "brake pad");
    }

    #[test]
    fn test_escape_like_escapes_metacharacters() {
        assert_eq!(escape_like("100%_pure"), "100\\%\\_pure");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
