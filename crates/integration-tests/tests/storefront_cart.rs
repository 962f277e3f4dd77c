//! Integration tests for storefront catalog browsing and the cart.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - The storefront server running (cargo run -p piyesa-storefront)
//! - The back-office server running (cargo run -p piyesa-admin), used to
//!   create products for the cart to hold
//!
//! Run with: cargo test -p piyesa-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use piyesa_integration_tests::{TestContext, data_array};

/// Fetch the user's cart body.
async fn get_cart(ctx: &TestContext, user_id: i64) -> Value {
    let resp = ctx
        .client
        .get(ctx.storefront(&format!("/api/cart?userId={user_id}")))
        .send()
        .await
        .expect("Failed to fetch cart");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse cart");
    body.get("data").cloned().expect("cart response missing data")
}

/// Add a product to the user's cart, asserting success.
async fn add_item(ctx: &TestContext, user_id: i64, product_id: i64, quantity: i32) {
    let resp = ctx
        .client
        .post(ctx.storefront("/api/cart/items"))
        .json(&json!({"userId": user_id, "productId": product_id, "quantity": quantity}))
        .send()
        .await
        .expect("Failed to add cart item");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Catalog browsing
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn test_product_listing_and_detail() {
    let ctx = TestContext::new();
    let product = ctx.create_product("149.99").await;
    let product_id = product.get("id").and_then(Value::as_i64).expect("id");

    let resp = ctx
        .client
        .get(ctx.storefront(&format!("/api/products/{product_id}")))
        .send()
        .await
        .expect("Failed to fetch product");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(
        body.pointer("/data/price/amount").and_then(Value::as_str),
        Some("149.99")
    );
    assert_eq!(
        body.pointer("/data/price/currencyCode").and_then(Value::as_str),
        Some("PHP")
    );
    assert_eq!(
        body.pointer("/data/stockOnHand").and_then(Value::as_i64),
        Some(0)
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_product_listing_rejects_malformed_filter() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .get(ctx.storefront("/api/products?brandId=abc"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn test_deactivated_product_hidden_from_storefront() {
    let ctx = TestContext::new();
    let product = ctx.create_product("99.00").await;
    let product_id = product.get("id").and_then(Value::as_i64).expect("id");

    let resp = ctx
        .client
        .patch(ctx.admin(&format!("/api/products/{product_id}")))
        .json(&json!({"isActive": false}))
        .send()
        .await
        .expect("Failed to deactivate product");
    assert_eq!(resp.status(), StatusCode::OK);

    // The storefront treats deactivated and unknown alike.
    let resp = ctx
        .client
        .get(ctx.storefront(&format!("/api/products/{product_id}")))
        .send()
        .await
        .expect("Failed to fetch product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_cart_starts_empty() {
    let ctx = TestContext::new();
    let user_id = ctx.register_user().await;

    let cart = get_cart(&ctx, user_id).await;
    assert_eq!(
        cart.get("items").and_then(Value::as_array).map(Vec::len),
        Some(0)
    );
    assert_eq!(cart.get("subtotal").and_then(Value::as_str), Some("0"));
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn test_repeat_adds_accumulate_quantity() {
    let ctx = TestContext::new();
    let user_id = ctx.register_user().await;
    let product = ctx.create_product("149.99").await;
    let product_id = product.get("id").and_then(Value::as_i64).expect("id");

    add_item(&ctx, user_id, product_id, 2).await;
    add_item(&ctx, user_id, product_id, 3).await;

    let cart = get_cart(&ctx, user_id).await;
    let items = cart.get("items").and_then(Value::as_array).expect("items");
    assert_eq!(items.len(), 1, "repeat adds must merge into one line");

    let line = items.first().expect("line");
    assert_eq!(line.get("quantity").and_then(Value::as_i64), Some(5));
    assert_eq!(line.get("unitPrice").and_then(Value::as_str), Some("149.99"));
    assert_eq!(line.get("lineTotal").and_then(Value::as_str), Some("749.95"));
    assert_eq!(cart.get("subtotal").and_then(Value::as_str), Some("749.95"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_add_unknown_product_not_found() {
    let ctx = TestContext::new();
    let user_id = ctx.register_user().await;

    let resp = ctx
        .client
        .post(ctx.storefront("/api/cart/items"))
        .json(&json!({"userId": user_id, "productId": 999_999, "quantity": 1}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_add_nonpositive_quantity_rejected() {
    let ctx = TestContext::new();
    let user_id = ctx.register_user().await;

    for quantity in [0, -4] {
        let resp = ctx
            .client
            .post(ctx.storefront("/api/cart/items"))
            .json(&json!({"userId": user_id, "productId": 1, "quantity": quantity}))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn test_set_line_quantity() {
    let ctx = TestContext::new();
    let user_id = ctx.register_user().await;
    let product = ctx.create_product("149.99").await;
    let product_id = product.get("id").and_then(Value::as_i64).expect("id");

    add_item(&ctx, user_id, product_id, 5).await;
    let cart = get_cart(&ctx, user_id).await;
    let line_id = cart
        .pointer("/items/0/id")
        .and_then(Value::as_i64)
        .expect("line id");

    let resp = ctx
        .client
        .patch(ctx.storefront(&format!("/api/cart/items/{line_id}")))
        .json(&json!({"userId": user_id, "quantity": 1}))
        .send()
        .await
        .expect("Failed to patch line");
    assert_eq!(resp.status(), StatusCode::OK);

    let cart = get_cart(&ctx, user_id).await;
    assert_eq!(cart.pointer("/items/0/quantity").and_then(Value::as_i64), Some(1));
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn test_foreign_line_update_is_a_noop() {
    let ctx = TestContext::new();
    let owner = ctx.register_user().await;
    let intruder = ctx.register_user().await;
    let product = ctx.create_product("149.99").await;
    let product_id = product.get("id").and_then(Value::as_i64).expect("id");

    add_item(&ctx, owner, product_id, 2).await;
    let cart = get_cart(&ctx, owner).await;
    let line_id = cart
        .pointer("/items/0/id")
        .and_then(Value::as_i64)
        .expect("line id");

    // Same {"ok": true} as a real update; the owner's line is untouched.
    let resp = ctx
        .client
        .patch(ctx.storefront(&format!("/api/cart/items/{line_id}")))
        .json(&json!({"userId": intruder, "quantity": 99}))
        .send()
        .await
        .expect("Failed to patch line");
    assert_eq!(resp.status(), StatusCode::OK);

    let cart = get_cart(&ctx, owner).await;
    assert_eq!(cart.pointer("/items/0/quantity").and_then(Value::as_i64), Some(2));
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn test_remove_line_is_idempotent() {
    let ctx = TestContext::new();
    let user_id = ctx.register_user().await;
    let product = ctx.create_product("149.99").await;
    let product_id = product.get("id").and_then(Value::as_i64).expect("id");

    add_item(&ctx, user_id, product_id, 1).await;
    let cart = get_cart(&ctx, user_id).await;
    let line_id = cart
        .pointer("/items/0/id")
        .and_then(Value::as_i64)
        .expect("line id");

    for _ in 0..2 {
        let resp = ctx
            .client
            .delete(ctx.storefront(&format!(
                "/api/cart/items/{line_id}?userId={user_id}"
            )))
            .send()
            .await
            .expect("Failed to send delete");
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.expect("Failed to parse delete body");
        assert_eq!(body.get("ok"), Some(&Value::Bool(true)));
    }

    let cart = get_cart(&ctx, user_id).await;
    assert_eq!(
        cart.get("items").and_then(Value::as_array).map(Vec::len),
        Some(0)
    );
}

// ============================================================================
// Filters return active products only
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn test_listing_search_finds_product_by_name() {
    let ctx = TestContext::new();
    let product = ctx.create_product("88.00").await;
    let product_id = product.get("id").and_then(Value::as_i64).expect("id");
    let sku = product.get("sku").and_then(Value::as_str).expect("sku");

    // The generated name embeds the unique SKU, so searching for it
    // isolates this product.
    let resp = ctx
        .client
        .get(ctx.storefront(&format!("/api/products?q={sku}")))
        .send()
        .await
        .expect("Failed to search products");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse listing");
    let found = data_array(&body)
        .iter()
        .any(|p| p.get("id").and_then(Value::as_i64) == Some(product_id));
    assert!(found, "freshly created product missing from search results");
    assert_eq!(body.get("page").and_then(Value::as_i64), Some(1));
}
