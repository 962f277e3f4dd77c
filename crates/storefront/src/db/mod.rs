//! Database operations for the storefront.
//!
//! Both binaries share one `PostgreSQL` database; the storefront touches the
//! user-facing slices of it:
//!
//! ## Tables
//!
//! - `users` - Account authentication
//! - `addresses` - User shipping addresses (single-default invariant)
//! - `regions` / `provinces` / `municipalities` / `barangays` /
//!   `approved_addresses` - Geography reference data (read-only here)
//! - `products` plus fitment reference tables (read-only here)
//! - `carts` / `cart_items` - Shopping carts
//! - `orders` / `order_items` - Placed orders
//!
//! # Migrations
//!
//! Migrations are stored in `migrations/` at the workspace root and run via:
//! ```bash
//! cargo run -p piyesa-cli -- migrate
//! ```

pub mod addresses;
pub mod carts;
pub mod catalog;
pub mod geography;
pub mod orders;
pub mod users;

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

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email, referenced row).
    #[error("constraint violation: {0}")]
    Conflict(String),
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
