//! Database migration command.
//!
//! Both binaries share one database; the migrations live at the
//! workspace root and are embedded into this binary at compile time.
//!
//! # Usage
//!
//! ```bash
//! piyesa-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string (also read from `.env`)

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

/// Errors that can occur while running migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending migrations against `DATABASE_URL`.
///
/// # Errors
///
/// Returns `MigrationError` when the environment variable is missing,
/// the connection fails, or a migration does not apply cleanly.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url: SecretString = std::env::var("DATABASE_URL")
        .map(Into::into)
        .map_err(|_| MigrationError::MissingEnvVar("DATABASE_URL"))?;

    info!("Connecting to database...");
    let pool = sqlx::PgPool::connect(database_url.expose_secret()).await?;

    info!("Running migrations...");
    sqlx::migrate!("../../migrations").run(&pool).await?;

    info!("Migrations complete");
    Ok(())
}
