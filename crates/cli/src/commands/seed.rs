//! Seed the geography tables with the Philippine administrative regions.
//!
//! Only regions are seeded; provinces, municipalities, barangays, and the
//! approved-address directory are maintained through the back-office API.
//! The insert is idempotent, so the command can run repeatedly (for example
//! as part of environment bootstrap) without duplicating rows.

use piyesa_core::IslandGroup;
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

/// The 17 administrative regions of the Philippines, PSGC names.
///
/// MIMAROPA is stored under its former designation "Region IV-B" so the
/// island-group classifier can read the roman numeral.
const REGIONS: [&str; 17] = [
    "National Capital Region (NCR)",
    "Cordillera Administrative Region (CAR)",
    "Region I (Ilocos Region)",
    "Region II (Cagayan Valley)",
    "Region III (Central Luzon)",
    "Region IV-A (CALABARZON)",
    "Region IV-B (MIMAROPA)",
    "Region V (Bicol Region)",
    "Region VI (Western Visayas)",
    "Region VII (Central Visayas)",
    "Region VIII (Eastern Visayas)",
    "Region IX (Zamboanga Peninsula)",
    "Region X (Northern Mindanao)",
    "Region XI (Davao Region)",
    "Region XII (SOCCSKSARGEN)",
    "Region XIII (Caraga)",
    "Bangsamoro Autonomous Region in Muslim Mindanao (BARMM)",
];

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Insert the region list, skipping names that already exist.
pub async fn geography() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url: SecretString = std::env::var("DATABASE_URL")
        .map(Into::into)
        .map_err(|_| SeedError::MissingEnvVar("DATABASE_URL"))?;

    let pool = sqlx::PgPool::connect(database_url.expose_secret()).await?;

    let mut inserted = 0u64;
    for name in REGIONS {
        let result =
            sqlx::query("INSERT INTO regions (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
                .bind(name)
                .execute(&pool)
                .await?;
        inserted += result.rows_affected();
    }

    let by_group = |group| {
        REGIONS
            .iter()
            .filter(|name| IslandGroup::classify(name) == Some(group))
            .count()
    };
    info!(
        inserted,
        total = REGIONS.len(),
        luzon = by_group(IslandGroup::Luzon),
        visayas = by_group(IslandGroup::Visayas),
        mindanao = by_group(IslandGroup::Mindanao),
        "Geography seed complete"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use piyesa_core::IslandGroup;

    use super::REGIONS;

    #[test]
    fn test_all_seeded_regions_classify() {
        for name in REGIONS {
            assert!(
                IslandGroup::classify(name).is_some(),
                "region {name:?} did not classify into an island group"
            );
        }
    }

    #[test]
    fn test_island_group_distribution() {
        let mut luzon = 0;
        let mut visayas = 0;
        let mut mindanao = 0;
        for name in REGIONS {
            match IslandGroup::classify(name).unwrap() {
                IslandGroup::Luzon => luzon += 1,
                IslandGroup::Visayas => visayas += 1,
                IslandGroup::Mindanao => mindanao += 1,
            }
        }
        assert_eq!((luzon, visayas, mindanao), (8, 3, 6));
    }
}
