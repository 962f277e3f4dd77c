//! Geography reference-data reads for the lookup gateway.
//!
//! The storefront only ever reads this hierarchy; writes happen through
//! the back-office binary. Every list is ordered by display name so the
//! cascading dropdowns render stably.

use sqlx::PgPool;

use piyesa_core::{ApprovedAddressId, BarangayId, MunicipalityId, RegionId};

use super::RepositoryError;
use crate::models::{ApprovedAddress, Barangay, Municipality, Region};

#[derive(Debug, sqlx::FromRow)]
struct RegionRow {
    id: i32,
    name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct MunicipalityRow {
    id: i32,
    name: String,
    postal_code: String,
}

#[derive(Debug, sqlx::FromRow)]
struct BarangayRow {
    id: i32,
    name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ApprovedAddressRow {
    id: i32,
    street_line: String,
}

/// Repository for geography lookups.
pub struct GeographyRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GeographyRepository<'a> {
    /// Create a new geography repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all regions, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_regions(&self) -> Result<Vec<Region>, RepositoryError> {
        let rows = sqlx::query_as::<_, RegionRow>(
            r"
            SELECT id, name
            FROM regions
            ORDER BY name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Region {
                id: RegionId::new(r.id),
                name: r.name,
            })
            .collect())
    }

    /// List the municipalities of a region, ordered by name.
    ///
    /// Municipalities hang off provinces, so the region constraint joins
    /// through the province tier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_municipalities(
        &self,
        region_id: RegionId,
    ) -> Result<Vec<Municipality>, RepositoryError> {
        let rows = sqlx::query_as::<_, MunicipalityRow>(
            r"
            SELECT m.id, m.name, m.postal_code
            FROM municipalities m
            JOIN provinces p ON m.province_id = p.id
            WHERE p.region_id = $1
            ORDER BY m.name
            ",
        )
        .bind(region_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Municipality {
                id: MunicipalityId::new(r.id),
                name: r.name,
                postal_code: r.postal_code,
            })
            .collect())
    }

    /// List the barangays of a municipality, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_barangays(
        &self,
        municipality_id: MunicipalityId,
    ) -> Result<Vec<Barangay>, RepositoryError> {
        let rows = sqlx::query_as::<_, BarangayRow>(
            r"
            SELECT id, name
            FROM barangays
            WHERE municipality_id = $1
            ORDER BY name
            ",
        )
        .bind(municipality_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Barangay {
                id: BarangayId::new(r.id),
                name: r.name,
            })
            .collect())
    }

    /// List the active approved addresses of a barangay, ordered by street
    /// line.
    ///
    /// Deactivated rows (`is_active = FALSE`) stay referenced by existing
    /// user addresses and orders but never show up here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_approved_addresses(
        &self,
        barangay_id: BarangayId,
    ) -> Result<Vec<ApprovedAddress>, RepositoryError> {
        let rows = sqlx::query_as::<_, ApprovedAddressRow>(
            r"
            SELECT id, street_line
            FROM approved_addresses
            WHERE barangay_id = $1 AND is_active = TRUE
            ORDER BY street_line
            ",
        )
        .bind(barangay_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ApprovedAddress {
                id: ApprovedAddressId::new(r.id),
                label: r.street_line,
            })
            .collect())
    }
}
