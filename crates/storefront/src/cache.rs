//! Cache types for geography lookup responses.
//!
//! Reference data changes rarely, so the lookup gateway serves each tier
//! from a `moka` cache (5-minute TTL) keyed by parent id. Callers see
//! eventually-consistent results with bounded staleness; admin edits show
//! up when the entry expires.

use std::time::Duration;

use moka::future::Cache;

use piyesa_core::{BarangayId, MunicipalityId, RegionId};

use crate::models::{ApprovedAddress, Barangay, Municipality, Region};

/// How long a cached tier is served before re-reading the database.
pub const LOOKUP_TTL: Duration = Duration::from_secs(300);

/// Cache key for the geography tiers.
///
/// The region list is cached unfiltered; island-group filtering happens
/// per request so one entry serves every filter value.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum LookupKey {
    Regions,
    Municipalities(RegionId),
    Barangays(MunicipalityId),
    ApprovedAddresses(BarangayId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum LookupValue {
    Regions(Vec<Region>),
    Municipalities(Vec<Municipality>),
    Barangays(Vec<Barangay>),
    ApprovedAddresses(Vec<ApprovedAddress>),
}

/// Build the lookup cache with the standard TTL.
#[must_use]
pub fn build_lookup_cache() -> Cache<LookupKey, LookupValue> {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(LOOKUP_TTL)
        .build()
}
