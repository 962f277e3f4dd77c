//! Address directory domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use piyesa_core::{AddressId, ApprovedAddressId};

/// A user-owned shipping address.
///
/// Either references an admin-curated approved address or carries a
/// free-form street line; `label` is resolved from whichever is present.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub approved_address_id: Option<ApprovedAddressId>,
    pub label: String,
    pub contact_name: String,
    pub phone: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}
