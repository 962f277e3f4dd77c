//! Geography reference-data projections served by the lookup endpoints.

use serde::Serialize;

use piyesa_core::{ApprovedAddressId, BarangayId, MunicipalityId, RegionId};

/// A region (top of the geography hierarchy).
#[derive(Debug, Clone, Serialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
}

/// A municipality, projected with its postal code for address forms.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Municipality {
    pub id: MunicipalityId,
    pub name: String,
    pub postal_code: String,
}

/// A barangay (smallest administrative division).
#[derive(Debug, Clone, Serialize)]
pub struct Barangay {
    pub id: BarangayId,
    pub name: String,
}

/// An active approved address, labeled by its street line.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovedAddress {
    pub id: ApprovedAddressId,
    pub label: String,
}
