//! Database operations for the admin API.
//!
//! Both binaries share one `PostgreSQL` database; the admin owns the
//! write-side of the reference data and the movement ledgers:
//!
//! ## Tables
//!
//! - `regions` / `provinces` / `municipalities` / `barangays` /
//!   `approved_addresses` - Geography reference data (full CRUD)
//! - `brands` / `vehicle_models` / `model_years` / `variants` - Fitment
//!   reference data (upsert via the tagged catalog endpoint)
//! - `products` - Catalog management (includes inactive)
//! - `supplies` / `sales` - Stock movement ledgers
//! - `orders` / `order_items` - Order administration (status changes)
//!
//! # Migrations
//!
//! Migrations are stored in `migrations/` at the workspace root and run via:
//! ```bash
//! cargo run -p piyesa-cli -- migrate
//! ```

pub mod catalog;
pub mod geography;
pub mod orders;
pub mod sales;
pub mod supplies;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::config::PoolConfig;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (duplicate natural key, referenced row).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A stock movement would take a product below zero on hand.
    #[error("insufficient stock: {available} on hand")]
    InsufficientStock { available: i32 },
}

/// Map a sqlx unique-violation to a readable `Conflict`, passing everything
/// else through as `Database`.
pub(crate) fn map_unique_violation(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}

/// Map a sqlx foreign-key violation to a readable `Conflict`, passing
/// everything else through as `Database`.
pub(crate) fn map_fk_violation(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}

/// Map both violation classes at once, for statements that can hit a
/// duplicate natural key or an unknown parent in the same insert/update.
pub(crate) fn map_violations(
    e: sqlx::Error,
    unique_message: &str,
    fk_message: &str,
) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(unique_message.to_owned());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::Conflict(fk_message.to_owned());
        }
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool with the configured bounds.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `pool` - Pool bounds from configuration
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    pool: &PoolConfig,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(pool.max_connections)
        .min_connections(pool.min_connections)
        .acquire_timeout(Duration::from_secs(pool.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(pool.idle_timeout_secs))
        .connect(database_url.expose_secret())
        .await
}
