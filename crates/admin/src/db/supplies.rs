//! Database operations for the supply intake ledger.
//!
//! A supply records stock arriving from a supplier. Creating one
//! increments the product's `stock_on_hand` and deleting one reverses
//! that increment, both inside a single transaction so the ledger and
//! the counter never drift.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use piyesa_core::{ProductId, SupplyId};

use super::{RepositoryError, map_fk_violation};

/// One stock intake.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Supply {
    pub id: SupplyId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub supplier: Option<String>,
    pub supplied_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Parameters for recording a supply. `supplied_at` defaults to now.
#[derive(Debug)]
pub struct NewSupply {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub supplier: Option<String>,
    pub supplied_at: Option<DateTime<Utc>>,
}

/// List supplies, newest first, optionally scoped to one product.
///
/// # Errors
///
/// Returns error if the query fails.
pub async fn list_supplies(
    pool: &PgPool,
    product_id: Option<ProductId>,
) -> Result<Vec<Supply>, RepositoryError> {
    let rows = sqlx::query_as::<_, Supply>(
        r"
        SELECT id, product_id, quantity, unit_cost, supplier, supplied_at, created_at
        FROM supplies
        WHERE ($1::int IS NULL OR product_id = $1)
        ORDER BY supplied_at DESC, id DESC
        ",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch one supply by id.
///
/// # Errors
///
/// Returns error if the query fails.
pub async fn get_supply(pool: &PgPool, id: SupplyId) -> Result<Option<Supply>, RepositoryError> {
    let row = sqlx::query_as::<_, Supply>(
        r"
        SELECT id, product_id, quantity, unit_cost, supplier, supplied_at, created_at
        FROM supplies
        WHERE id = $1
        ",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Record a supply and increment the product's stock in one transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` when the product does not exist.
pub async fn create_supply(pool: &PgPool, new: NewSupply) -> Result<Supply, RepositoryError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, Supply>(
        r"
        INSERT INTO supplies (product_id, quantity, unit_cost, supplier, supplied_at)
        VALUES ($1, $2, $3, $4, COALESCE($5, NOW()))
        RETURNING id, product_id, quantity, unit_cost, supplier, supplied_at, created_at
        ",
    )
    .bind(new.product_id)
    .bind(new.quantity)
    .bind(new.unit_cost)
    .bind(&new.supplier)
    .bind(new.supplied_at)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_fk_violation(e, "product does not exist"))?;

    sqlx::query(
        r"
        UPDATE products
        SET stock_on_hand = stock_on_hand + $2, updated_at = NOW()
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

/// Delete a supply and reverse its stock increment in one transaction.
///
/// The reversal can leave `stock_on_hand` negative when the intake has
/// already been sold on; the stock report surfaces that for correction.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id.
pub async fn delete_supply(pool: &PgPool, id: SupplyId) -> Result<(), RepositoryError> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query_as::<_, (ProductId, i32)>(
        r"
        DELETE FROM supplies WHERE id = $1
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
        SET stock_on_hand = stock_on_hand - $2, updated_at = NOW()
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
