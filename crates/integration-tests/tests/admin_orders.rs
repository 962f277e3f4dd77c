//! Integration tests for back-office order administration.
//!
//! Orders are created through the storefront (there is no admin create),
//! so these tests drive a storefront checkout first and then manage the
//! result from the back office.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - Both servers running (cargo run -p piyesa-storefront,
//!   cargo run -p piyesa-admin)
//!
//! Run with: cargo test -p piyesa-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use piyesa_integration_tests::{TestContext, data_array};

/// PATCH an order's status and return the response.
async fn set_status(ctx: &TestContext, order_id: i64, status: &str) -> reqwest::Response {
    ctx.client
        .patch(ctx.admin(&format!("/api/orders/{order_id}")))
        .json(&json!({"status": status}))
        .send()
        .await
        .expect("Failed to patch order")
}

// ============================================================================
// Listing & detail
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn test_order_appears_in_admin_listing() {
    let ctx = TestContext::new();
    let user_id = ctx.register_user().await;
    let order = ctx.place_order(user_id).await;
    let order_id = order.get("id").and_then(Value::as_i64).expect("order id");
    let reference = order
        .get("reference")
        .and_then(Value::as_str)
        .expect("reference")
        .to_owned();

    let resp = ctx
        .client
        .get(ctx.admin("/api/orders"))
        .send()
        .await
        .expect("Failed to list orders");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse orders");
    let listed = data_array(&body)
        .iter()
        .find(|o| o.get("id").and_then(Value::as_i64) == Some(order_id))
        .cloned()
        .expect("order missing from admin listing");
    assert_eq!(
        listed.get("reference").and_then(Value::as_str),
        Some(reference.as_str())
    );
    assert_eq!(listed.get("userId").and_then(Value::as_i64), Some(user_id));
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn test_order_detail_includes_items() {
    let ctx = TestContext::new();
    let user_id = ctx.register_user().await;
    let order = ctx.place_order(user_id).await;
    let order_id = order.get("id").and_then(Value::as_i64).expect("order id");

    let resp = ctx
        .client
        .get(ctx.admin(&format!("/api/orders/{order_id}")))
        .send()
        .await
        .expect("Failed to fetch order");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse order");
    let items = body
        .pointer("/data/items")
        .and_then(Value::as_array)
        .expect("order missing items");
    assert_eq!(items.len(), 1);
    let line = items.first().expect("line");
    assert!(line.get("productName").and_then(Value::as_str).is_some());
    assert!(line.get("unitPrice").and_then(Value::as_str).is_some());
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_order_unknown_id_not_found() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .get(ctx.admin("/api/orders/999999"))
        .send()
        .await
        .expect("Failed to fetch order");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn test_order_listing_filters_by_status() {
    let ctx = TestContext::new();
    let user_id = ctx.register_user().await;
    let order = ctx.place_order(user_id).await;
    let order_id = order.get("id").and_then(Value::as_i64).expect("order id");

    let resp = set_status(&ctx, order_id, "shipped").await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Every row honors the filter, and ours is among them.
    let resp = ctx
        .client
        .get(ctx.admin("/api/orders?status=shipped"))
        .send()
        .await
        .expect("Failed to list orders");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse orders");
    let rows = data_array(&body);
    assert!(
        rows.iter()
            .all(|o| o.get("status").and_then(Value::as_str) == Some("shipped"))
    );
    assert!(
        rows.iter()
            .any(|o| o.get("id").and_then(Value::as_i64) == Some(order_id))
    );

    // And it no longer shows under its old status.
    let resp = ctx
        .client
        .get(ctx.admin("/api/orders?status=pending"))
        .send()
        .await
        .expect("Failed to list orders");
    let body: Value = resp.json().await.expect("Failed to parse orders");
    assert!(
        data_array(&body)
            .iter()
            .all(|o| o.get("id").and_then(Value::as_i64) != Some(order_id))
    );
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_order_listing_rejects_bogus_status() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .get(ctx.admin("/api/orders?status=teleported"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body.get("error").and_then(Value::as_str), Some("Invalid status"));
}

// ============================================================================
// Status updates
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn test_order_status_walkthrough() {
    let ctx = TestContext::new();
    let user_id = ctx.register_user().await;
    let order = ctx.place_order(user_id).await;
    let order_id = order.get("id").and_then(Value::as_i64).expect("order id");
    assert_eq!(order.get("status").and_then(Value::as_str), Some("pending"));

    for status in ["paid", "shipped", "delivered"] {
        let resp = set_status(&ctx, order_id, status).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.expect("Failed to parse order");
        assert_eq!(
            body.pointer("/data/status").and_then(Value::as_str),
            Some(status)
        );
    }

    // The storefront sees the final status too.
    let resp = ctx
        .client
        .get(ctx.storefront(&format!("/api/orders/{order_id}?userId={user_id}")))
        .send()
        .await
        .expect("Failed to fetch storefront order");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse order");
    assert_eq!(
        body.pointer("/data/status").and_then(Value::as_str),
        Some("delivered")
    );
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn test_order_status_rejects_unknown_value() {
    let ctx = TestContext::new();
    let user_id = ctx.register_user().await;
    let order = ctx.place_order(user_id).await;
    let order_id = order.get("id").and_then(Value::as_i64).expect("order id");

    let resp = set_status(&ctx, order_id, "teleported").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body.get("error").and_then(Value::as_str), Some("Invalid status"));

    // The order is untouched.
    let resp = ctx
        .client
        .get(ctx.admin(&format!("/api/orders/{order_id}")))
        .send()
        .await
        .expect("Failed to fetch order");
    let body: Value = resp.json().await.expect("Failed to parse order");
    assert_eq!(
        body.pointer("/data/status").and_then(Value::as_str),
        Some("pending")
    );
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_order_status_update_unknown_id_not_found() {
    let ctx = TestContext::new();

    let resp = set_status(&ctx, 999_999, "paid").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
