//! Integration tests for Piyesa.
//!
//! Every test drives the system over HTTP the way real clients do: the
//! storefront on one port, the back office on another, one shared
//! `PostgreSQL` schema underneath. Tests create their own fixtures
//! through the APIs (unique emails, SKUs, and names), so the suite can
//! run repeatedly against the same database.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare the database
//! cargo run -p piyesa-cli -- migrate
//! cargo run -p piyesa-cli -- seed geography
//!
//! # Start both servers, then run the suite
//! cargo run -p piyesa-storefront &
//! cargo run -p piyesa-admin &
//! cargo test -p piyesa-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - Storefront base URL (default `http://localhost:3000`)
//! - `ADMIN_BASE_URL` - Back-office base URL (default `http://localhost:3001`)
//!
//! # Test Categories
//!
//! - `storefront_*` - Public storefront API
//! - `admin_*` - Back-office API, including cross-service checks against
//!   the storefront

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Shared handles for one test: an HTTP client plus both base URLs.
pub struct TestContext {
    pub client: Client,
    pub storefront_url: String,
    pub admin_url: String,
}

impl TestContext {
    /// Build a context from the environment, falling back to the default
    /// development ports.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            storefront_url: std::env::var("STOREFRONT_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            admin_url: std::env::var("ADMIN_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
        }
    }

    /// Absolute storefront URL for `path`.
    #[must_use]
    pub fn storefront(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// Absolute back-office URL for `path`.
    #[must_use]
    pub fn admin(&self, path: &str) -> String {
        format!("{}{path}", self.admin_url)
    }

    /// Register a fresh storefront account and return its user id.
    ///
    /// # Panics
    ///
    /// Panics when the request fails or the envelope is malformed; both
    /// mean the environment is broken, not the test.
    pub async fn register_user(&self) -> i64 {
        let email = format!("integration-test-{}@example.com", Uuid::new_v4());
        let resp = self
            .client
            .post(self.storefront("/api/auth/register"))
            .json(&json!({"email": email, "password": "correct horse battery staple"}))
            .send()
            .await
            .expect("Failed to register test user");
        assert!(
            resp.status().is_success(),
            "register failed: {}",
            resp.status()
        );
        let body: Value = resp.json().await.expect("Failed to parse register response");
        data_id(&body)
    }

    /// Create a product through the back office and return its body.
    ///
    /// `price` is a decimal string like `"149.99"`. The SKU is unique per
    /// call and the product starts active with zero stock.
    ///
    /// # Panics
    ///
    /// Panics when the request fails or the envelope is malformed.
    pub async fn create_product(&self, price: &str) -> Value {
        let sku = format!("IT-{}", Uuid::new_v4());
        let resp = self
            .client
            .post(self.admin("/api/products"))
            .json(&json!({
                "name": format!("Test Product {sku}"),
                "sku": sku,
                "price": price,
            }))
            .send()
            .await
            .expect("Failed to create test product");
        assert!(
            resp.status().is_success(),
            "product create failed: {}",
            resp.status()
        );
        let body: Value = resp.json().await.expect("Failed to parse product response");
        body.get("data").cloned().expect("product response missing data")
    }

    /// Record a supply so the product has stock on hand.
    ///
    /// # Panics
    ///
    /// Panics when the request fails.
    pub async fn add_stock(&self, product_id: i64, quantity: i32) {
        let resp = self
            .client
            .post(self.admin("/api/supplies"))
            .json(&json!({
                "productId": product_id,
                "quantity": quantity,
                "unitCost": "10.00",
            }))
            .send()
            .await
            .expect("Failed to record test supply");
        assert!(
            resp.status().is_success(),
            "supply create failed: {}",
            resp.status()
        );
    }

    /// Create a free-form street address for the user and return its id.
    ///
    /// # Panics
    ///
    /// Panics when the request fails or the envelope is malformed.
    pub async fn create_street_address(&self, user_id: i64, is_default: bool) -> i64 {
        let resp = self
            .client
            .post(self.storefront("/api/addresses"))
            .json(&json!({
                "userId": user_id,
                "streetLine": format!("{} Test Street", Uuid::new_v4()),
                "contactName": "Integration Test",
                "phone": "+63 917 555 0000",
                "isDefault": is_default,
            }))
            .send()
            .await
            .expect("Failed to create test address");
        assert!(
            resp.status().is_success(),
            "address create failed: {}",
            resp.status()
        );
        let body: Value = resp.json().await.expect("Failed to parse address response");
        data_id(&body)
    }

    /// Place an order end to end: a fresh product in the cart, a fresh
    /// address, checkout. Returns the order body from the checkout
    /// response (`id`, `reference`, `status`, `total`, `items`).
    ///
    /// # Panics
    ///
    /// Panics when any step fails.
    pub async fn place_order(&self, user_id: i64) -> Value {
        let product = self.create_product("250.00").await;
        let product_id = product
            .get("id")
            .and_then(Value::as_i64)
            .expect("product missing id");
        let address_id = self.create_street_address(user_id, false).await;

        let resp = self
            .client
            .post(self.storefront("/api/cart/items"))
            .json(&json!({"userId": user_id, "productId": product_id, "quantity": 1}))
            .send()
            .await
            .expect("Failed to add to cart");
        assert!(
            resp.status().is_success(),
            "cart add failed: {}",
            resp.status()
        );

        let resp = self
            .client
            .post(self.storefront("/api/checkout"))
            .json(&json!({"userId": user_id, "addressId": address_id}))
            .send()
            .await
            .expect("Failed to checkout");
        assert!(
            resp.status().is_success(),
            "checkout failed: {}",
            resp.status()
        );
        let body: Value = resp.json().await.expect("Failed to parse checkout response");
        body.get("data").cloned().expect("checkout response missing data")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract `data.id` from a `{"data": {...}}` envelope.
///
/// # Panics
///
/// Panics when the field is missing or not an integer.
#[must_use]
pub fn data_id(body: &Value) -> i64 {
    body.pointer("/data/id")
        .and_then(Value::as_i64)
        .expect("response missing data.id")
}

/// Extract the `data` array from a `{"data": [...]}` envelope.
///
/// # Panics
///
/// Panics when the field is missing or not an array.
#[must_use]
pub fn data_array(body: &Value) -> &[Value] {
    body.get("data")
        .and_then(Value::as_array)
        .expect("response missing data array")
}
