//! Database operations for the sales ledger.
//!
//! A sale records stock leaving outside the storefront order flow
//! (walk-in counter sales, order fulfilment). Creating one decrements
//! the product's `stock_on_hand` after checking there is enough on
//! hand; deleting one restores the stock. Both run inside a single
//! transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use piyesa_core::{ProductId, SaleId};

use super::RepositoryError;

/// One recorded sale.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub sold_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Parameters for recording a sale. `sold_at` defaults to now.
#[derive(Debug)]
pub struct NewSale {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub sold_at: Option<DateTime<Utc>>,
}

/// List sales, newest first, optionally scoped to one product.
///
/// # Errors
///
/// Returns error if the query fails.
pub async fn list_sales(
    pool: &PgPool,
    product_id: Option<ProductId>,
) -> Result<Vec<Sale>, RepositoryError> {
    let rows = sqlx::query_as::<_, Sale>(
        r"
        SELECT id, product_id, quantity, unit_price, sold_at, created_at
        FROM sales
        WHERE ($1::int IS NULL OR product_id = $1)
        ORDER BY sold_at DESC, id DESC
        ",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch one sale by id.
///
/// # Errors
///
/// Returns error if the query fails.
pub async fn get_sale(pool: &PgPool, id: SaleId) -> Result<Option<Sale>, RepositoryError> {
    let row = sqlx::query_as::<_, Sale>(
        r"
        SELECT id, product_id, quantity, unit_price, sold_at, created_at
        FROM sales
        WHERE id = $1
        ",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Record a sale and decrement the product's stock in one transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` when the product does not exist,
/// `RepositoryError::InsufficientStock` when the quantity exceeds what
/// is on hand.
pub async fn create_sale(pool: &PgPool, new: NewSale) -> Result<Sale, RepositoryError> {
    let mut tx = pool.begin().await?;

    let stock: Option<i32> = sqlx::query_scalar(
        r"
        SELECT stock_on_hand FROM products WHERE id = $1
        ",
    )
    .bind(new.product_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(available) = stock else {
        return Err(RepositoryError::Conflict("product does not exist".to_owned()));
    };
    if new.quantity > available {
        return Err(RepositoryError::InsufficientStock { available });
    }

    let row = sqlx::query_as::<_, Sale>(
        r"
        INSERT INTO sales (product_id, quantity, unit_price, sold_at)
        VALUES ($1, $2, $3, COALESCE($4, NOW()))
        RETURNING id, product_id, quantity, unit_price, sold_at, created_at
        ",
    )
    .bind(new.product_id)
    .bind(new.quantity)
    .bind(new.unit_price)
    .bind(new.sold_at)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r"
        UPDATE products
        SET stock_on_hand = stock_on_hand - $2, updated_at = NOW()
        WHERE id = $1
        ",
    )
    .bind(new.product_id)
    .bind(new.quantity)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(row)
}

/// Delete a sale and restore its stock in one transaction.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id.
pub async fn delete_sale(pool: &PgPool, id: SaleId) -> Result<(), RepositoryError> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query_as::<_, (ProductId, i32)>(
        r"
        DELETE FROM sales WHERE id = $1
        RETURNING product_id, quantity
        ",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some((product_id, quantity)) = removed else {
        return Err(RepositoryError::NotFound);
    };

    sqlx::query(
        r"
        UPDATE products
        SET stock_on_hand = stock_on_hand + $2, updated_at = NOW()
        WHERE id = $1
        ",
    )
    .bind(product_id)
    .bind(quantity)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(())
}
