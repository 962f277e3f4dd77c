//! Geocoding provider client for the address-search proxy.
//!
//! Forwards autocomplete queries to a LocationIQ-style provider and
//! normalizes the response for storefront clients. The proxy is
//! stateless: it holds no data, performs no retries, and every failure
//! surfaces immediately as [`GeocoderError`].
//!
//! The provider returns latitude/longitude as strings; entries whose
//! coordinates do not parse as finite numbers are dropped rather than
//! passed through.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::GeocoderConfig;

/// Minimum query length (after trimming) before any network call.
pub const MIN_QUERY_LENGTH: usize = 3;

/// Maximum results returned to clients.
pub const MAX_RESULTS: usize = 10;

/// Errors that can occur when proxying an address search.
#[derive(Debug, Error)]
pub enum GeocoderError {
    /// Query shorter than the minimum; rejected before any I/O.
    #[error("query must be at least {min} characters")]
    QueryTooShort { min: usize },

    /// HTTP request failed (unreachable provider, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Provider payload did not match the expected schema.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A normalized geocoding result.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GeocodeResult {
    pub id: String,
    pub label: String,
    pub lat: f64,
    pub lng: f64,
}

/// One entry of the provider's autocomplete response.
///
/// Coordinates arrive as strings; parsing happens during normalization.
#[derive(Debug, Deserialize)]
pub(crate) struct ProviderEntry {
    pub place_id: String,
    pub display_name: String,
    pub lat: String,
    pub lon: String,
}

/// Client for the geocoding provider.
#[derive(Clone)]
pub struct GeocoderClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeocoderClient {
    /// Create a new geocoder client.
    ///
    /// The API key goes into a default header so it never appears in
    /// per-request code; the request timeout bounds every call.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &GeocoderConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(config.api_key.expose_secret()) {
            headers.insert("x-api-key", value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Search the provider for addresses matching `query`.
    ///
    /// Returns at most [`MAX_RESULTS`] normalized entries.
    ///
    /// # Errors
    ///
    /// Returns `GeocoderError::QueryTooShort` before any network call
    /// when the trimmed query has fewer than [`MIN_QUERY_LENGTH`]
    /// characters; `Http`/`Api`/`Parse` for provider failures.
    pub async fn search(&self, query: &str) -> Result<Vec<GeocodeResult>, GeocoderError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LENGTH {
            return Err(GeocoderError::QueryTooShort {
                min: MIN_QUERY_LENGTH,
            });
        }

        let limit = MAX_RESULTS.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("limit", &limit), ("format", "json")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeocoderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let entries: Vec<ProviderEntry> = response
            .json()
            .await
            .map_err(|e| GeocoderError::Parse(e.to_string()))?;

        Ok(normalize(entries))
    }
}

/// Sanitize provider entries: drop non-finite coordinates, cap the list.
fn normalize(entries: Vec<ProviderEntry>) -> Vec<GeocodeResult> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let lat = entry.lat.trim().parse::<f64>().ok()?;
            let lng = entry.lon.trim().parse::<f64>().ok()?;
            if !lat.is_finite() || !lng.is_finite() {
                return None;
            }
            Some(GeocodeResult {
                id: entry.place_id,
                label: entry.display_name,
                lat,
                lng,
            })
        })
        .take(MAX_RESULTS)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn test_config() -> GeocoderConfig {
        GeocoderConfig {
            // Unroutable on purpose; tests must never reach the network
            base_url: "http://127.0.0.1:9/autocomplete".to_owned(),
            api_key: SecretString::from("pk.test.4fd9a2c81b7e"),
            timeout_secs: 1,
        }
    }

    #[tokio::test]
    async fn test_short_query_rejected_before_network() {
        let client = GeocoderClient::new(&test_config()).unwrap();

        let err = client.search("ab").await.unwrap_err();
        assert!(matches!(err, GeocoderError::QueryTooShort { min: 3 }));

        // Whitespace padding does not rescue a short query
        let err = client.search("  ab  ").await.unwrap_err();
        assert!(matches!(err, GeocoderError::QueryTooShort { .. }));
    }

    #[test]
    fn test_normalize_parses_provider_payload() {
        let payload = r#"[
            {"place_id": "321046245166", "display_name": "Main St, Cebu City", "lat": "10.3157", "lon": "123.8854"},
            {"place_id": "321046245167", "display_name": "Main St Ext, Cebu City", "lat": "10.3190", "lon": "123.8900"}
        ]"#;
        let entries: Vec<ProviderEntry> = serde_json::from_str(payload).unwrap();

        let results = normalize(entries);
        assert_eq!(results.len(), 2);
        let first = results.first().unwrap();
        assert_eq!(first.id, "321046245166");
        assert_eq!(first.label, "Main St, Cebu City");
        assert!((first.lat - 10.3157).abs() < 1e-9);
        assert!((first.lng - 123.8854).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_drops_unparseable_coordinates() {
        let payload = r#"[
            {"place_id": "1", "display_name": "Good", "lat": "14.5995", "lon": "120.9842"},
            {"place_id": "2", "display_name": "Bad lat", "lat": "north-ish", "lon": "120.0"},
            {"place_id": "3", "display_name": "Bad lon", "lat": "14.0", "lon": ""}
        ]"#;
        let entries: Vec<ProviderEntry> = serde_json::from_str(payload).unwrap();

        let results = normalize(entries);
        assert_eq!(results.len(), 1);
        assert_eq!(results.first().unwrap().id, "1");
    }

    #[test]
    fn test_normalize_drops_non_finite_coordinates() {
        let entries = vec![
            ProviderEntry {
                place_id: "1".to_owned(),
                display_name: "Infinite".to_owned(),
                lat: "inf".to_owned(),
                lon: "120.0".to_owned(),
            },
            ProviderEntry {
                place_id: "2".to_owned(),
                display_name: "Not a number".to_owned(),
                lat: "NaN".to_owned(),
                lon: "120.0".to_owned(),
            },
        ];

        assert!(normalize(entries).is_empty());
    }

    #[test]
    fn test_normalize_caps_results() {
        let entries: Vec<ProviderEntry> = (0..25)
            .map(|i| ProviderEntry {
                place_id: i.to_string(),
                display_name: format!("Result {i}"),
                lat: "14.0".to_owned(),
                lon: "121.0".to_owned(),
            })
            .collect();

        assert_eq!(normalize(entries).len(), MAX_RESULTS);
    }
}
