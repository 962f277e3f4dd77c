//! HTTP route handlers for the admin API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Health check
//! GET  /health/ready                - Readiness check (database ping)
//!
//! # Geography reference data (one block per tier)
//! GET    /api/regions               - List regions
//! POST   /api/regions               - Create region
//! PATCH  /api/regions/{id}          - Rename region
//! DELETE /api/regions/{id}          - Delete region (409 while referenced)
//! GET/POST /api/provinces           - List / create provinces
//! PATCH/DELETE /api/provinces/{id}  - Update / delete province
//! GET/POST /api/municipalities      - List / create municipalities
//! PATCH/DELETE /api/municipalities/{id}
//! GET/POST /api/barangays           - List / create barangays
//! PATCH/DELETE /api/barangays/{id}
//! GET/POST /api/approvedAddresses   - List (?barangayId=, inactive included) / create
//! PATCH/DELETE /api/approvedAddresses/{id}
//!
//! # Catalog
//! POST   /api/catalog               - Fitment upsert, body tagged by `kind`
//! GET    /api/products              - List products (inactive included)
//! POST   /api/products              - Create product (stock starts at 0)
//! GET    /api/products/{id}         - Product detail
//! PATCH  /api/products/{id}         - Partial update
//! DELETE /api/products/{id}         - Delete (409 while referenced)
//!
//! # Stock ledgers
//! GET    /api/supplies              - List supplies (?productId=)
//! POST   /api/supplies              - Record intake, increments stock
//! GET    /api/supplies/{id}         - Supply detail
//! DELETE /api/supplies/{id}         - Reverse the intake
//! GET    /api/sales                 - List sales (?productId=)
//! POST   /api/sales                 - Record sale, decrements stock
//! GET    /api/sales/{id}            - Sale detail
//! DELETE /api/sales/{id}            - Restore the stock
//! GET    /api/reports/stock         - Per-product stock report
//!
//! # Orders
//! GET    /api/orders                - List orders (?status=)
//! GET    /api/orders/{id}           - Order with items
//! PATCH  /api/orders/{id}           - Move order to a new status
//! ```
//!
//! Success responses are wrapped in `{"data": ...}`; deletes acknowledge
//! with `{"ok": true}` after 404-checking the target. Errors come back as
//! `{"error": "..."}` with the status from `AppError`.

pub mod catalog;
pub mod geography;
pub mod orders;
pub mod products;
pub mod reports;
pub mod sales;
pub mod supplies;

use axum::Router;
use serde::Serialize;

use crate::state::AppState;

/// Success envelope wrapping the payload under a `data` key.
#[derive(Debug, Serialize)]
pub struct DataBody<T> {
    pub data: T,
}

impl<T> DataBody<T> {
    pub const fn new(data: T) -> Self {
        Self { data }
    }
}

/// Acknowledgement envelope for deletes.
#[derive(Debug, Serialize)]
pub struct OkBody {
    pub ok: bool,
}

impl OkBody {
    pub const fn new() -> Self {
        Self { ok: true }
    }
}

impl Default for OkBody {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the complete admin API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(geography::router())
        .merge(catalog::router())
        .merge(products::router())
        .merge(supplies::router())
        .merge(sales::router())
        .merge(reports::router())
        .merge(orders::router())
}
