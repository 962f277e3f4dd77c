//! Database operations for geography reference data.
//!
//! Full CRUD over the five tiers. Deletes rely on foreign-key RESTRICT:
//! a referenced row cannot disappear from under an address or a child
//! tier, and the violation surfaces as a Conflict the routes turn into
//! a 409. Approved addresses soft-delete through `is_active` instead of
//! vanishing, so existing customer addresses keep their reference.

use serde::Serialize;
use sqlx::PgPool;

use piyesa_core::{ApprovedAddressId, BarangayId, MunicipalityId, ProvinceId, RegionId};

use super::{RepositoryError, map_fk_violation, map_violations};

/// A region as managed by the back office.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
}

/// A province with its parent region.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Province {
    pub id: ProvinceId,
    pub name: String,
    pub region_id: RegionId,
}

/// A municipality with its postal code and parent province.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Municipality {
    pub id: MunicipalityId,
    pub name: String,
    pub postal_code: String,
    pub province_id: ProvinceId,
}

/// A barangay with its parent municipality.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Barangay {
    pub id: BarangayId,
    pub name: String,
    pub municipality_id: MunicipalityId,
}

/// An approved address, including inactive rows (admin view).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedAddress {
    pub id: ApprovedAddressId,
    pub barangay_id: BarangayId,
    pub street_line: String,
    pub is_active: bool,
}

/// Partial update for a province.
#[derive(Debug, Default)]
pub struct UpdateProvince {
    pub name: Option<String>,
    pub region_id: Option<RegionId>,
}

/// Partial update for a municipality.
#[derive(Debug, Default)]
pub struct UpdateMunicipality {
    pub name: Option<String>,
    pub postal_code: Option<String>,
    pub province_id: Option<ProvinceId>,
}

/// Partial update for a barangay.
#[derive(Debug, Default)]
pub struct UpdateBarangay {
    pub name: Option<String>,
    pub municipality_id: Option<MunicipalityId>,
}

/// Partial update for an approved address.
#[derive(Debug, Default)]
pub struct UpdateApprovedAddress {
    pub street_line: Option<String>,
    pub barangay_id: Option<BarangayId>,
    pub is_active: Option<bool>,
}

// =============================================================================
// Regions
// =============================================================================

/// List all regions, ordered by name.
///
/// # Errors
///
/// Returns error if the query fails.
pub async fn list_regions(pool: &PgPool) -> Result<Vec<Region>, RepositoryError> {
    let rows = sqlx::query_as::<_, Region>(
        r"
        SELECT id, name FROM regions ORDER BY name
        ",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Create a region.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` when the name is taken.
pub async fn create_region(pool: &PgPool, name: &str) -> Result<Region, RepositoryError> {
    let row = sqlx::query_as::<_, Region>(
        r"
        INSERT INTO regions (name) VALUES ($1)
        RETURNING id, name
        ",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .map_err(|e| super::map_unique_violation(e, "region name already exists"))?;

    Ok(row)
}

/// Rename a region.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id,
/// `RepositoryError::Conflict` when the new name is taken.
pub async fn update_region(
    pool: &PgPool,
    id: RegionId,
    name: &str,
) -> Result<Region, RepositoryError> {
    let row = sqlx::query_as::<_, Region>(
        r"
        UPDATE regions SET name = $2 WHERE id = $1
        RETURNING id, name
        ",
    )
    .bind(id)
    .bind(name)
    .fetch_optional(pool)
    .await
    .map_err(|e| super::map_unique_violation(e, "region name already exists"))?;

    row.ok_or(RepositoryError::NotFound)
}

/// Delete a region.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id,
/// `RepositoryError::Conflict` when provinces still reference it.
pub async fn delete_region(pool: &PgPool, id: RegionId) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        DELETE FROM regions WHERE id = $1
        ",
    )
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| map_fk_violation(e, "region is still referenced"))?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

// =============================================================================
// Provinces
// =============================================================================

/// List all provinces, ordered by name.
///
/// # Errors
///
/// Returns error if the query fails.
pub async fn list_provinces(pool: &PgPool) -> Result<Vec<Province>, RepositoryError> {
    let rows = sqlx::query_as::<_, Province>(
        r"
        SELECT id, name, region_id FROM provinces ORDER BY name
        ",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Create a province under a region.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` when the name is taken in the
/// region or the region does not exist.
pub async fn create_province(
    pool: &PgPool,
    name: &str,
    region_id: RegionId,
) -> Result<Province, RepositoryError> {
    let row = sqlx::query_as::<_, Province>(
        r"
        INSERT INTO provinces (name, region_id) VALUES ($1, $2)
        RETURNING id, name, region_id
        ",
    )
    .bind(name)
    .bind(region_id)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        map_violations(e, "province name already exists in this region", "region does not exist")
    })?;

    Ok(row)
}

/// Rename or re-parent a province. `None` fields are left unchanged.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id,
/// `RepositoryError::Conflict` for a duplicate name or unknown region.
pub async fn update_province(
    pool: &PgPool,
    id: ProvinceId,
    update: UpdateProvince,
) -> Result<Province, RepositoryError> {
    let row = sqlx::query_as::<_, Province>(
        r"
        UPDATE provinces
        SET name = COALESCE($2, name),
            region_id = COALESCE($3, region_id)
        WHERE id = $1
        RETURNING id, name, region_id
        ",
    )
    .bind(id)
    .bind(update.name)
    .bind(update.region_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        map_violations(e, "province name already exists in this region", "region does not exist")
    })?;

    row.ok_or(RepositoryError::NotFound)
}

/// Delete a province.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id,
/// `RepositoryError::Conflict` when municipalities still reference it.
pub async fn delete_province(pool: &PgPool, id: ProvinceId) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        DELETE FROM provinces WHERE id = $1
        ",
    )
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| map_fk_violation(e, "province is still referenced"))?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

// =============================================================================
// Municipalities
// =============================================================================

/// List all municipalities, ordered by name.
///
/// # Errors
///
/// Returns error if the query fails.
pub async fn list_municipalities(pool: &PgPool) -> Result<Vec<Municipality>, RepositoryError> {
    let rows = sqlx::query_as::<_, Municipality>(
        r"
        SELECT id, name, postal_code, province_id
        FROM municipalities
        ORDER BY name
        ",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Create a municipality under a province.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` when the province does not exist.
pub async fn create_municipality(
    pool: &PgPool,
    name: &str,
    postal_code: &str,
    province_id: ProvinceId,
) -> Result<Municipality, RepositoryError> {
    let row = sqlx::query_as::<_, Municipality>(
        r"
        INSERT INTO municipalities (name, postal_code, province_id)
        VALUES ($1, $2, $3)
        RETURNING id, name, postal_code, province_id
        ",
    )
    .bind(name)
    .bind(postal_code)
    .bind(province_id)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        map_violations(
            e,
            "municipality name already exists in this province",
            "province does not exist",
        )
    })?;

    Ok(row)
}

/// Edit a municipality. `None` fields are left unchanged.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id,
/// `RepositoryError::Conflict` for a duplicate name or unknown province.
pub async fn update_municipality(
    pool: &PgPool,
    id: MunicipalityId,
    update: UpdateMunicipality,
) -> Result<Municipality, RepositoryError> {
    let row = sqlx::query_as::<_, Municipality>(
        r"
        UPDATE municipalities
        SET name = COALESCE($2, name),
            postal_code = COALESCE($3, postal_code),
            province_id = COALESCE($4, province_id)
        WHERE id = $1
        RETURNING id, name, postal_code, province_id
        ",
    )
    .bind(id)
    .bind(update.name)
    .bind(update.postal_code)
    .bind(update.province_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        map_violations(
            e,
            "municipality name already exists in this province",
            "province does not exist",
        )
    })?;

    row.ok_or(RepositoryError::NotFound)
}

/// Delete a municipality.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id,
/// `RepositoryError::Conflict` when barangays still reference it.
pub async fn delete_municipality(pool: &PgPool, id: MunicipalityId) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        DELETE FROM municipalities WHERE id = $1
        ",
    )
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| map_fk_violation(e, "municipality is still referenced"))?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

// =============================================================================
// Barangays
// =============================================================================

/// List all barangays, ordered by name.
///
/// # Errors
///
/// Returns error if the query fails.
pub async fn list_barangays(pool: &PgPool) -> Result<Vec<Barangay>, RepositoryError> {
    let rows = sqlx::query_as::<_, Barangay>(
        r"
        SELECT id, name, municipality_id FROM barangays ORDER BY name
        ",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Create a barangay under a municipality.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` when the municipality does not
/// exist.
pub async fn create_barangay(
    pool: &PgPool,
    name: &str,
    municipality_id: MunicipalityId,
) -> Result<Barangay, RepositoryError> {
    let row = sqlx::query_as::<_, Barangay>(
        r"
        INSERT INTO barangays (name, municipality_id) VALUES ($1, $2)
        RETURNING id, name, municipality_id
        ",
    )
    .bind(name)
    .bind(municipality_id)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        map_violations(
            e,
            "barangay name already exists in this municipality",
            "municipality does not exist",
        )
    })?;

    Ok(row)
}

/// Edit a barangay. `None` fields are left unchanged.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id,
/// `RepositoryError::Conflict` for a duplicate name or unknown
/// municipality.
pub async fn update_barangay(
    pool: &PgPool,
    id: BarangayId,
    update: UpdateBarangay,
) -> Result<Barangay, RepositoryError> {
    let row = sqlx::query_as::<_, Barangay>(
        r"
        UPDATE barangays
        SET name = COALESCE($2, name),
            municipality_id = COALESCE($3, municipality_id)
        WHERE id = $1
        RETURNING id, name, municipality_id
        ",
    )
    .bind(id)
    .bind(update.name)
    .bind(update.municipality_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        map_violations(
            e,
            "barangay name already exists in this municipality",
            "municipality does not exist",
        )
    })?;

    row.ok_or(RepositoryError::NotFound)
}

/// Delete a barangay.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id,
/// `RepositoryError::Conflict` when approved addresses still reference
/// it.
pub async fn delete_barangay(pool: &PgPool, id: BarangayId) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        DELETE FROM barangays WHERE id = $1
        ",
    )
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| map_fk_violation(e, "barangay is still referenced"))?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

// =============================================================================
// Approved addresses
// =============================================================================

/// List approved addresses, inactive included, ordered by street line.
///
/// `barangay_id` narrows the list to one barangay when present.
///
/// # Errors
///
/// Returns error if the query fails.
pub async fn list_approved_addresses(
    pool: &PgPool,
    barangay_id: Option<BarangayId>,
) -> Result<Vec<ApprovedAddress>, RepositoryError> {
    let rows = sqlx::query_as::<_, ApprovedAddress>(
        r"
        SELECT id, barangay_id, street_line, is_active
        FROM approved_addresses
        WHERE ($1::int IS NULL OR barangay_id = $1)
        ORDER BY street_line
        ",
    )
    .bind(barangay_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Create an approved address under a barangay.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` for a duplicate street line in
/// the barangay or an unknown barangay.
pub async fn create_approved_address(
    pool: &PgPool,
    barangay_id: BarangayId,
    street_line: &str,
) -> Result<ApprovedAddress, RepositoryError> {
    let row = sqlx::query_as::<_, ApprovedAddress>(
        r"
        INSERT INTO approved_addresses (barangay_id, street_line)
        VALUES ($1, $2)
        RETURNING id, barangay_id, street_line, is_active
        ",
    )
    .bind(barangay_id)
    .bind(street_line)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        map_violations(
            e,
            "approved address already exists in this barangay",
            "barangay does not exist",
        )
    })?;

    Ok(row)
}

/// Edit an approved address. `None` fields are left unchanged.
///
/// Setting `is_active` to false removes the row from storefront
/// selection lists without touching the addresses that reference it.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id,
/// `RepositoryError::Conflict` for a duplicate street line or unknown
/// barangay.
pub async fn update_approved_address(
    pool: &PgPool,
    id: ApprovedAddressId,
    update: UpdateApprovedAddress,
) -> Result<ApprovedAddress, RepositoryError> {
    let row = sqlx::query_as::<_, ApprovedAddress>(
        r"
        UPDATE approved_addresses
        SET street_line = COALESCE($2, street_line),
            barangay_id = COALESCE($3, barangay_id),
            is_active = COALESCE($4, is_active)
        WHERE id = $1
        RETURNING id, barangay_id, street_line, is_active
        ",
    )
    .bind(id)
    .bind(update.street_line)
    .bind(update.barangay_id)
    .bind(update.is_active)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        map_violations(
            e,
            "approved address already exists in this barangay",
            "barangay does not exist",
        )
    })?;

    row.ok_or(RepositoryError::NotFound)
}

/// Delete an approved address.
///
/// Deactivation (`is_active = false`) is the usual path; hard delete is
/// only possible while no customer address references the row.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` for an unknown id,
/// `RepositoryError::Conflict` when customer addresses still reference
/// it.
pub async fn delete_approved_address(
    pool: &PgPool,
    id: ApprovedAddressId,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        DELETE FROM approved_addresses WHERE id = $1
        ",
    )
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| map_fk_violation(e, "approved address is still referenced"))?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
