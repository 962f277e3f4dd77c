//! Piyesa CLI - Database migrations and seeding tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! piyesa-cli migrate
//!
//! # Seed the 17 standard Philippine regions (idempotent)
//! piyesa-cli seed geography
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations from `migrations/`
//! - `seed geography` - Insert the standard regions, skipping existing rows
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string (also read from `.env`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "piyesa-cli")]
#[command(author, version, about = "Piyesa CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed reference data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert the 17 standard Philippine regions (idempotent)
    Geography,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "piyesa_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Geography => commands::seed::geography().await?,
        },
    }
    Ok(())
}
