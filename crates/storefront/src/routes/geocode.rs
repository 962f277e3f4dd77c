//! Geocoding proxy handler.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
};

use crate::error::{AppError, Result};
use crate::services::geocoder::GeocodeResult;
use crate::state::AppState;

use super::DataBody;

/// Search the geocoding provider for address suggestions.
///
/// A thin proxy: the provider key never reaches the browser, and the
/// response is normalized to `{id, label, lat, lng}` regardless of what
/// the provider returns.
///
/// # Errors
///
/// Returns `AppError::Configuration` (503) when no provider is configured,
/// `AppError::Upstream` mapped to 400 for a too-short query, and 502 for
/// provider failures.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<DataBody<Vec<GeocodeResult>>>> {
    let geocoder = state.geocoder().ok_or_else(|| {
        AppError::Configuration("Address search is not configured".to_owned())
    })?;

    // A missing q behaves like an empty one: too short, rejected before
    // any network call.
    let q = query.get("q").map_or("", String::as_str);
    let results = geocoder.search(q).await?;

    Ok(Json(DataBody::new(results)))
}
