//! Cascading geography lookup handlers.
//!
//! Region → municipality → barangay → approved address, each tier keyed
//! by its parent id. Responses are served from the in-process cache when
//! fresh and carry a `Cache-Control` header matching the server-side TTL,
//! so browsers and CDNs observe the same staleness bound.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Serialize;
use tracing::debug;

use piyesa_core::{BarangayId, IslandGroup, MunicipalityId, RegionId};

use crate::cache::{LookupKey, LookupValue};
use crate::db::geography::GeographyRepository;
use crate::error::{AppError, Result};
use crate::params;
use crate::state::AppState;

use super::DataBody;

/// `Cache-Control` value for lookup responses, matching [`crate::cache::LOOKUP_TTL`].
const CACHE_CONTROL_VALUE: &str = "public, max-age=300";

/// Wrap lookup data in the `{"data": ...}` envelope with the cache header.
fn cached<T: Serialize>(data: T) -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, CACHE_CONTROL_VALUE)],
        Json(DataBody::new(data)),
    )
}

/// List regions, optionally filtered by island group.
///
/// The cache holds the unfiltered list; island-group filtering runs per
/// request, so one cache entry serves every filter value. A region whose
/// name cannot be classified never matches any filter.
///
/// # Errors
///
/// Returns `AppError::Validation` for an unrecognized `islandGroup` value.
pub async fn regions(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse> {
    let filter = query
        .get("islandGroup")
        .map(|raw| {
            raw.parse::<IslandGroup>()
                .map_err(|_| AppError::Validation("Invalid islandGroup".to_owned()))
        })
        .transpose()?;

    let all = if let Some(LookupValue::Regions(regions)) =
        state.lookup_cache().get(&LookupKey::Regions).await
    {
        debug!("Cache hit for regions");
        regions
    } else {
        let regions = GeographyRepository::new(state.pool())
            .list_regions()
            .await?;
        state
            .lookup_cache()
            .insert(LookupKey::Regions, LookupValue::Regions(regions.clone()))
            .await;
        regions
    };

    let data = match filter {
        Some(group) => all
            .into_iter()
            .filter(|region| IslandGroup::classify(&region.name) == Some(group))
            .collect(),
        None => all,
    };

    Ok(cached(data))
}

/// List municipalities under a region (joined through provinces).
///
/// Unknown region ids yield an empty list, not a 404; the hierarchy is
/// reference data and clients drive it top-down from the region response.
///
/// # Errors
///
/// Returns `AppError::Validation` when `regionId` is missing or malformed.
pub async fn municipalities(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse> {
    let region_id: RegionId =
        params::positive_id(query.get("regionId").map(String::as_str), "regionId")?;

    let key = LookupKey::Municipalities(region_id);
    let data = if let Some(LookupValue::Municipalities(items)) =
        state.lookup_cache().get(&key).await
    {
        debug!("Cache hit for municipalities");
        items
    } else {
        let items = GeographyRepository::new(state.pool())
            .list_municipalities(region_id)
            .await?;
        state
            .lookup_cache()
            .insert(key, LookupValue::Municipalities(items.clone()))
            .await;
        items
    };

    Ok(cached(data))
}

/// List barangays under a municipality.
///
/// # Errors
///
/// Returns `AppError::Validation` when `municipalityId` is missing or
/// malformed.
pub async fn barangays(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse> {
    let municipality_id: MunicipalityId = params::positive_id(
        query.get("municipalityId").map(String::as_str),
        "municipalityId",
    )?;

    let key = LookupKey::Barangays(municipality_id);
    let data = if let Some(LookupValue::Barangays(items)) = state.lookup_cache().get(&key).await {
        debug!("Cache hit for barangays");
        items
    } else {
        let items = GeographyRepository::new(state.pool())
            .list_barangays(municipality_id)
            .await?;
        state
            .lookup_cache()
            .insert(key, LookupValue::Barangays(items.clone()))
            .await;
        items
    };

    Ok(cached(data))
}

/// List active approved addresses under a barangay.
///
/// Deactivated rows never appear here; existing customer addresses keep
/// referencing them, but they cannot be selected for new ones.
///
/// # Errors
///
/// Returns `AppError::Validation` when `barangayId` is missing or malformed.
pub async fn approved_addresses(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse> {
    let barangay_id: BarangayId =
        params::positive_id(query.get("barangayId").map(String::as_str), "barangayId")?;

    let key = LookupKey::ApprovedAddresses(barangay_id);
    let data = if let Some(LookupValue::ApprovedAddresses(items)) =
        state.lookup_cache().get(&key).await
    {
        debug!("Cache hit for approved addresses");
        items
    } else {
        let items = GeographyRepository::new(state.pool())
            .list_approved_addresses(barangay_id)
            .await?;
        state
            .lookup_cache()
            .insert(key, LookupValue::ApprovedAddresses(items.clone()))
            .await;
        items
    };

    Ok(cached(data))
}
