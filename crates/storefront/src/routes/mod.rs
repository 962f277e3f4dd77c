//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (database ping)
//!
//! # Geography lookups (cached, Cache-Control: max-age=300)
//! GET  /api/regions                 - Regions, optional ?islandGroup= filter
//! GET  /api/municipalities          - Municipalities by ?regionId=
//! GET  /api/barangays               - Barangays by ?municipalityId=
//! GET  /api/approvedAddresses       - Active approved addresses by ?barangayId=
//!
//! # Geocoding proxy
//! GET  /api/geocode/search          - Provider search by ?q= (min 3 chars)
//!
//! # Auth
//! POST /api/auth/register           - Create account
//! POST /api/auth/login              - Verify credentials
//!
//! # Address directory
//! GET    /api/addresses             - List by ?userId=
//! POST   /api/addresses             - Create
//! PATCH  /api/addresses/{id}        - Set/clear default (single-default invariant)
//! DELETE /api/addresses/{id}        - Delete if owned (idempotent)
//!
//! # Catalog
//! GET  /api/products                - Listing with fitment filters, search, paging
//! GET  /api/products/{id}           - Product detail
//!
//! # Cart & checkout
//! GET    /api/cart                  - The user's cart (?userId=)
//! POST   /api/cart/items            - Add/accumulate a line
//! PATCH  /api/cart/items/{id}       - Set line quantity
//! DELETE /api/cart/items/{id}       - Remove a line (idempotent)
//! POST   /api/checkout              - Place an order from the cart
//! GET    /api/orders                - Order history (?userId=)
//! GET    /api/orders/{id}           - Order with items
//! ```
//!
//! All responses are JSON: `{"data": ...}` for reads, `{"ok": true}` for
//! the no-op-tolerant writes, `{"error": "..."}` for failures.

pub mod addresses;
pub mod auth;
pub mod cart;
pub mod geocode;
pub mod lookups;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, patch, post},
};
use serde::Serialize;

use crate::state::AppState;

/// `{"data": ...}` envelope for read responses.
#[derive(Debug, Serialize)]
pub struct DataBody<T> {
    pub data: T,
}

impl<T> DataBody<T> {
    pub const fn new(data: T) -> Self {
        Self { data }
    }
}

/// `{"ok": true}` envelope for the no-op-tolerant write endpoints.
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

/// Create the geography lookup routes router.
pub fn lookup_routes() -> Router<AppState> {
    Router::new()
        .route("/regions", get(lookups::regions))
        .route("/municipalities", get(lookups::municipalities))
        .route("/barangays", get(lookups::barangays))
        .route("/approvedAddresses", get(lookups::approved_addresses))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Create the address directory routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(addresses::index).post(addresses::create))
        .route("/{id}", patch(addresses::update).delete(addresses::delete))
}

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add_item))
        .route("/items/{id}", patch(cart::update_item).delete(cart::remove_item))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Cascading geography lookups
        .nest("/api", lookup_routes())
        // Geocoding proxy
        .route("/api/geocode/search", get(geocode::search))
        // Auth
        .nest("/api/auth", auth_routes())
        // Address directory
        .nest("/api/addresses", address_routes())
        // Catalog
        .nest("/api/products", product_routes())
        // Cart and checkout
        .nest("/api/cart", cart_routes())
        .route("/api/checkout", post(orders::checkout))
        .route("/api/orders", get(orders::index))
        .route("/api/orders/{id}", get(orders::show))
}
