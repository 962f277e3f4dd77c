//! Application state shared across handlers.

use std::sync::Arc;

use moka::future::Cache;
use sqlx::PgPool;

use crate::cache::{LookupKey, LookupValue, build_lookup_cache};
use crate::config::StorefrontConfig;
use crate::services::geocoder::GeocoderClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration. Handlers
/// receive it explicitly; there is no ambient global state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    lookup_cache: Cache<LookupKey, LookupValue>,
    geocoder: Option<GeocoderClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The geocoder client is only constructed when the config carries a
    /// provider block; without one the geocode endpoint reports itself
    /// unavailable instead of failing at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the geocoder HTTP client cannot be built.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, reqwest::Error> {
        let geocoder = config
            .geocoder
            .as_ref()
            .map(GeocoderClient::new)
            .transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                lookup_cache: build_lookup_cache(),
                geocoder,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the geography lookup cache.
    #[must_use]
    pub fn lookup_cache(&self) -> &Cache<LookupKey, LookupValue> {
        &self.inner.lookup_cache
    }

    /// Get the geocoder client, if configured.
    #[must_use]
    pub fn geocoder(&self) -> Option<&GeocoderClient> {
        self.inner.geocoder.as_ref()
    }
}
