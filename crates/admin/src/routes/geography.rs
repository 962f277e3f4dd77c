//! Geography reference data handlers.
//!
//! Five tiers, each with list/create/update/delete. Deletes lean on the
//! database's RESTRICT foreign keys: a referenced row comes back as a
//! 409 with a readable message instead of disappearing from under the
//! addresses that point at it. Approved addresses soft-delete through
//! `isActive` instead, so the hard delete is only for rows that never
//! shipped.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use serde::Deserialize;

use piyesa_core::{ApprovedAddressId, BarangayId, MunicipalityId, ProvinceId, RegionId};

use crate::db::geography::{
    self, ApprovedAddress, Barangay, Municipality, Province, Region, UpdateApprovedAddress,
    UpdateBarangay, UpdateMunicipality, UpdateProvince,
};
use crate::error::Result;
use crate::params;
use crate::state::AppState;

use super::{DataBody, OkBody};

/// Build the geography router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/regions", get(list_regions).post(create_region))
        .route("/api/regions/{id}", patch(update_region).delete(delete_region))
        .route("/api/provinces", get(list_provinces).post(create_province))
        .route("/api/provinces/{id}", patch(update_province).delete(delete_province))
        .route("/api/municipalities", get(list_municipalities).post(create_municipality))
        .route("/api/municipalities/{id}", patch(update_municipality).delete(delete_municipality))
        .route("/api/barangays", get(list_barangays).post(create_barangay))
        .route("/api/barangays/{id}", patch(update_barangay).delete(delete_barangay))
        .route("/api/approvedAddresses", get(list_approved_addresses).post(create_approved_address))
        .route(
            "/api/approvedAddresses/{id}",
            patch(update_approved_address).delete(delete_approved_address),
        )
}

// =============================================================================
// Regions
// =============================================================================

/// Body for creating or renaming a region.
#[derive(Debug, Deserialize)]
pub struct RegionBody {
    pub name: String,
}

/// List all regions.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn list_regions(State(state): State<AppState>) -> Result<Json<DataBody<Vec<Region>>>> {
    let regions = geography::list_regions(state.pool()).await?;
    Ok(Json(DataBody::new(regions)))
}

/// Create a region.
///
/// # Errors
///
/// Returns `AppError::Validation` for a blank name,
/// `AppError::Conflict` for a duplicate name.
pub async fn create_region(
    State(state): State<AppState>,
    Json(body): Json<RegionBody>,
) -> Result<Json<DataBody<Region>>> {
    let name = params::non_empty(&body.name, "name")?;
    let region = geography::create_region(state.pool(), &name).await?;
    Ok(Json(DataBody::new(region)))
}

/// Rename a region.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id,
/// `AppError::Conflict` for a duplicate name.
pub async fn update_region(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RegionBody>,
) -> Result<Json<DataBody<Region>>> {
    let id: RegionId = params::path_id(&id, "id")?;
    let name = params::non_empty(&body.name, "name")?;
    let region = geography::update_region(state.pool(), id, &name).await?;
    Ok(Json(DataBody::new(region)))
}

/// Delete a region.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id,
/// `AppError::Conflict` while provinces still reference it.
pub async fn delete_region(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OkBody>> {
    let id: RegionId = params::path_id(&id, "id")?;
    geography::delete_region(state.pool(), id).await?;
    Ok(Json(OkBody::new()))
}

// =============================================================================
// Provinces
// =============================================================================

/// Body for creating a province.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProvinceRequest {
    pub region_id: i32,
    pub name: String,
}

/// Body for updating a province; absent fields stay unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProvinceRequest {
    pub region_id: Option<i32>,
    pub name: Option<String>,
}

/// List all provinces.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn list_provinces(
    State(state): State<AppState>,
) -> Result<Json<DataBody<Vec<Province>>>> {
    let provinces = geography::list_provinces(state.pool()).await?;
    Ok(Json(DataBody::new(provinces)))
}

/// Create a province under a region.
///
/// # Errors
///
/// Returns `AppError::Validation` for bad input, `AppError::Conflict`
/// for a duplicate name in the region or an unknown region.
pub async fn create_province(
    State(state): State<AppState>,
    Json(body): Json<CreateProvinceRequest>,
) -> Result<Json<DataBody<Province>>> {
    let region_id: RegionId = params::body_id(body.region_id, "regionId")?;
    let name = params::non_empty(&body.name, "name")?;
    let province = geography::create_province(state.pool(), &name, region_id).await?;
    Ok(Json(DataBody::new(province)))
}

/// Rename or re-parent a province.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id,
/// `AppError::Conflict` for a duplicate name or unknown region.
pub async fn update_province(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProvinceRequest>,
) -> Result<Json<DataBody<Province>>> {
    let id: ProvinceId = params::path_id(&id, "id")?;
    let update = UpdateProvince {
        name: body
            .name
            .as_deref()
            .map(|raw| params::non_empty(raw, "name"))
            .transpose()?,
        region_id: body
            .region_id
            .map(|raw| params::body_id(raw, "regionId"))
            .transpose()?,
    };
    let province = geography::update_province(state.pool(), id, update).await?;
    Ok(Json(DataBody::new(province)))
}

/// Delete a province.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id,
/// `AppError::Conflict` while municipalities still reference it.
pub async fn delete_province(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OkBody>> {
    let id: ProvinceId = params::path_id(&id, "id")?;
    geography::delete_province(state.pool(), id).await?;
    Ok(Json(OkBody::new()))
}

// =============================================================================
// Municipalities
// =============================================================================

/// Body for creating a municipality.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMunicipalityRequest {
    pub province_id: i32,
    pub name: String,
    pub postal_code: String,
}

/// Body for updating a municipality; absent fields stay unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMunicipalityRequest {
    pub province_id: Option<i32>,
    pub name: Option<String>,
    pub postal_code: Option<String>,
}

/// List all municipalities.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn list_municipalities(
    State(state): State<AppState>,
) -> Result<Json<DataBody<Vec<Municipality>>>> {
    let municipalities = geography::list_municipalities(state.pool()).await?;
    Ok(Json(DataBody::new(municipalities)))
}

/// Create a municipality under a province.
///
/// # Errors
///
/// Returns `AppError::Validation` for bad input, `AppError::Conflict`
/// for a duplicate name in the province or an unknown province.
pub async fn create_municipality(
    State(state): State<AppState>,
    Json(body): Json<CreateMunicipalityRequest>,
) -> Result<Json<DataBody<Municipality>>> {
    let province_id: ProvinceId = params::body_id(body.province_id, "provinceId")?;
    let name = params::non_empty(&body.name, "name")?;
    let postal_code = params::non_empty(&body.postal_code, "postalCode")?;
    let municipality =
        geography::create_municipality(state.pool(), &name, &postal_code, province_id).await?;
    Ok(Json(DataBody::new(municipality)))
}

/// Rename, re-parent, or edit the postal code of a municipality.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id,
/// `AppError::Conflict` for a duplicate name or unknown province.
pub async fn update_municipality(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateMunicipalityRequest>,
) -> Result<Json<DataBody<Municipality>>> {
    let id: MunicipalityId = params::path_id(&id, "id")?;
    let update = UpdateMunicipality {
        name: body
            .name
            .as_deref()
            .map(|raw| params::non_empty(raw, "name"))
            .transpose()?,
        postal_code: body
            .postal_code
            .as_deref()
            .map(|raw| params::non_empty(raw, "postalCode"))
            .transpose()?,
        province_id: body
            .province_id
            .map(|raw| params::body_id(raw, "provinceId"))
            .transpose()?,
    };
    let municipality = geography::update_municipality(state.pool(), id, update).await?;
    Ok(Json(DataBody::new(municipality)))
}

/// Delete a municipality.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id,
/// `AppError::Conflict` while barangays still reference it.
pub async fn delete_municipality(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OkBody>> {
    let id: MunicipalityId = params::path_id(&id, "id")?;
    geography::delete_municipality(state.pool(), id).await?;
    Ok(Json(OkBody::new()))
}

// =============================================================================
// Barangays
// =============================================================================

/// Body for creating a barangay.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBarangayRequest {
    pub municipality_id: i32,
    pub name: String,
}

/// Body for updating a barangay; absent fields stay unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBarangayRequest {
    pub municipality_id: Option<i32>,
    pub name: Option<String>,
}

/// List all barangays.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn list_barangays(
    State(state): State<AppState>,
) -> Result<Json<DataBody<Vec<Barangay>>>> {
    let barangays = geography::list_barangays(state.pool()).await?;
    Ok(Json(DataBody::new(barangays)))
}

/// Create a barangay under a municipality.
///
/// # Errors
///
/// Returns `AppError::Validation` for bad input, `AppError::Conflict`
/// for a duplicate name in the municipality or an unknown municipality.
pub async fn create_barangay(
    State(state): State<AppState>,
    Json(body): Json<CreateBarangayRequest>,
) -> Result<Json<DataBody<Barangay>>> {
    let municipality_id: MunicipalityId = params::body_id(body.municipality_id, "municipalityId")?;
    let name = params::non_empty(&body.name, "name")?;
    let barangay = geography::create_barangay(state.pool(), &name, municipality_id).await?;
    Ok(Json(DataBody::new(barangay)))
}

/// Rename or re-parent a barangay.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id,
/// `AppError::Conflict` for a duplicate name or unknown municipality.
pub async fn update_barangay(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateBarangayRequest>,
) -> Result<Json<DataBody<Barangay>>> {
    let id: BarangayId = params::path_id(&id, "id")?;
    let update = UpdateBarangay {
        name: body
            .name
            .as_deref()
            .map(|raw| params::non_empty(raw, "name"))
            .transpose()?,
        municipality_id: body
            .municipality_id
            .map(|raw| params::body_id(raw, "municipalityId"))
            .transpose()?,
    };
    let barangay = geography::update_barangay(state.pool(), id, update).await?;
    Ok(Json(DataBody::new(barangay)))
}

/// Delete a barangay.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id,
/// `AppError::Conflict` while approved addresses still reference it.
pub async fn delete_barangay(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OkBody>> {
    let id: BarangayId = params::path_id(&id, "id")?;
    geography::delete_barangay(state.pool(), id).await?;
    Ok(Json(OkBody::new()))
}

// =============================================================================
// Approved addresses
// =============================================================================

/// Body for creating an approved address.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApprovedAddressRequest {
    pub barangay_id: i32,
    pub street_line: String,
}

/// Body for updating an approved address; absent fields stay unchanged.
/// `isActive: false` is the soft delete.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApprovedAddressRequest {
    pub barangay_id: Option<i32>,
    pub street_line: Option<String>,
    pub is_active: Option<bool>,
}

/// List approved addresses, inactive included, optionally filtered by
/// barangay.
///
/// # Errors
///
/// Returns `AppError::Validation` for a malformed `barangayId`.
pub async fn list_approved_addresses(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<DataBody<Vec<ApprovedAddress>>>> {
    let barangay_id: Option<BarangayId> = params::optional_id(&query, "barangayId")?;
    let addresses = geography::list_approved_addresses(state.pool(), barangay_id).await?;
    Ok(Json(DataBody::new(addresses)))
}

/// Create an approved address under a barangay.
///
/// # Errors
///
/// Returns `AppError::Validation` for bad input, `AppError::Conflict`
/// for a duplicate street line in the barangay or an unknown barangay.
pub async fn create_approved_address(
    State(state): State<AppState>,
    Json(body): Json<CreateApprovedAddressRequest>,
) -> Result<Json<DataBody<ApprovedAddress>>> {
    let barangay_id: BarangayId = params::body_id(body.barangay_id, "barangayId")?;
    let street_line = params::non_empty(&body.street_line, "streetLine")?;
    let address =
        geography::create_approved_address(state.pool(), barangay_id, &street_line).await?;
    Ok(Json(DataBody::new(address)))
}

/// Edit or soft-delete an approved address.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id,
/// `AppError::Conflict` for a duplicate street line or unknown barangay.
pub async fn update_approved_address(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateApprovedAddressRequest>,
) -> Result<Json<DataBody<ApprovedAddress>>> {
    let id: ApprovedAddressId = params::path_id(&id, "id")?;
    let update = UpdateApprovedAddress {
        street_line: body
            .street_line
            .as_deref()
            .map(|raw| params::non_empty(raw, "streetLine"))
            .transpose()?,
        barangay_id: body
            .barangay_id
            .map(|raw| params::body_id(raw, "barangayId"))
            .transpose()?,
        is_active: body.is_active,
    };
    let address = geography::update_approved_address(state.pool(), id, update).await?;
    Ok(Json(DataBody::new(address)))
}

/// Hard-delete an approved address.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id,
/// `AppError::Conflict` while user addresses still reference it.
pub async fn delete_approved_address(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OkBody>> {
    let id: ApprovedAddressId = params::path_id(&id, "id")?;
    geography::delete_approved_address(state.pool(), id).await?;
    Ok(Json(OkBody::new()))
}
