//! Integration tests for the storefront address directory.
//!
//! The directory has one invariant worth hammering from outside: a user
//! has at most one default address, no matter how the flag is flipped.
//! These tests also pin the no-op tolerance of the write endpoints, since
//! clients retry them blindly.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - The storefront server running (cargo run -p piyesa-storefront)
//!
//! Run with: cargo test -p piyesa-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use piyesa_integration_tests::{TestContext, data_array};

/// Fetch the user's addresses.
async fn list_addresses(ctx: &TestContext, user_id: i64) -> Vec<Value> {
    let resp = ctx
        .client
        .get(ctx.storefront(&format!("/api/addresses?userId={user_id}")))
        .send()
        .await
        .expect("Failed to list addresses");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse address list");
    data_array(&body).to_vec()
}

/// Count rows with `isDefault: true`.
fn count_defaults(addresses: &[Value]) -> usize {
    addresses
        .iter()
        .filter(|a| a.get("isDefault").and_then(Value::as_bool) == Some(true))
        .count()
}

/// Set or clear the default flag as `user_id`.
async fn set_default(ctx: &TestContext, user_id: i64, address_id: i64, is_default: bool) {
    let resp = ctx
        .client
        .patch(ctx.storefront(&format!("/api/addresses/{address_id}")))
        .json(&json!({"userId": user_id, "isDefault": is_default}))
        .send()
        .await
        .expect("Failed to patch address");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse patch body");
    assert_eq!(body.get("ok"), Some(&Value::Bool(true)));
}

// ============================================================================
// Creation
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_address_create_requires_a_location() {
    let ctx = TestContext::new();
    let user_id = ctx.register_user().await;

    // Neither an approved address nor a street line.
    let resp = ctx
        .client
        .post(ctx.storefront("/api/addresses"))
        .json(&json!({
            "userId": user_id,
            "contactName": "Integration Test",
            "phone": "+63 917 555 0000",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // A blank street line does not count as a location either.
    let resp = ctx
        .client
        .post(ctx.storefront("/api/addresses"))
        .json(&json!({
            "userId": user_id,
            "streetLine": "   ",
            "contactName": "Integration Test",
            "phone": "+63 917 555 0000",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_address_create_unknown_approved_address_conflict() {
    let ctx = TestContext::new();
    let user_id = ctx.register_user().await;

    let resp = ctx
        .client
        .post(ctx.storefront("/api/addresses"))
        .json(&json!({
            "userId": user_id,
            "approvedAddressId": 999_999,
            "contactName": "Integration Test",
            "phone": "+63 917 555 0000",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

// ============================================================================
// Single-default invariant
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_at_most_one_default_address() {
    let ctx = TestContext::new();
    let user_id = ctx.register_user().await;

    let first = ctx.create_street_address(user_id, true).await;
    let second = ctx.create_street_address(user_id, true).await;

    // Creating the second as default displaced the first.
    let addresses = list_addresses(&ctx, user_id).await;
    assert_eq!(addresses.len(), 2);
    assert_eq!(count_defaults(&addresses), 1);

    // Flip the flag back and forth; the count never exceeds one.
    set_default(&ctx, user_id, first, true).await;
    set_default(&ctx, user_id, second, true).await;
    set_default(&ctx, user_id, first, true).await;

    let addresses = list_addresses(&ctx, user_id).await;
    assert_eq!(count_defaults(&addresses), 1);
    let default_id = addresses
        .iter()
        .find(|a| a.get("isDefault").and_then(Value::as_bool) == Some(true))
        .and_then(|a| a.get("id"))
        .and_then(Value::as_i64);
    assert_eq!(default_id, Some(first));
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_default_flag_can_be_cleared() {
    let ctx = TestContext::new();
    let user_id = ctx.register_user().await;

    let address_id = ctx.create_street_address(user_id, true).await;
    set_default(&ctx, user_id, address_id, false).await;

    let addresses = list_addresses(&ctx, user_id).await;
    assert_eq!(count_defaults(&addresses), 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_default_listed_first() {
    let ctx = TestContext::new();
    let user_id = ctx.register_user().await;

    ctx.create_street_address(user_id, false).await;
    let middle = ctx.create_street_address(user_id, true).await;
    ctx.create_street_address(user_id, false).await;

    let addresses = list_addresses(&ctx, user_id).await;
    assert_eq!(addresses.len(), 3);
    assert_eq!(
        addresses.first().and_then(|a| a.get("id")).and_then(Value::as_i64),
        Some(middle)
    );
}

// ============================================================================
// Cross-user isolation
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_default_update_for_other_user_is_a_noop() {
    let ctx = TestContext::new();
    let owner = ctx.register_user().await;
    let intruder = ctx.register_user().await;

    let address_id = ctx.create_street_address(owner, true).await;

    // The intruder gets the same {"ok": true} a real update would, but
    // nothing changes.
    set_default(&ctx, intruder, address_id, false).await;

    let addresses = list_addresses(&ctx, owner).await;
    assert_eq!(count_defaults(&addresses), 1);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_delete_for_other_user_is_a_noop() {
    let ctx = TestContext::new();
    let owner = ctx.register_user().await;
    let intruder = ctx.register_user().await;

    let address_id = ctx.create_street_address(owner, false).await;

    let resp = ctx
        .client
        .delete(ctx.storefront(&format!(
            "/api/addresses/{address_id}?userId={intruder}"
        )))
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(resp.status(), StatusCode::OK);

    let addresses = list_addresses(&ctx, owner).await;
    assert_eq!(addresses.len(), 1);
}

// ============================================================================
// Idempotent delete
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_address_delete_is_idempotent() {
    let ctx = TestContext::new();
    let user_id = ctx.register_user().await;
    let address_id = ctx.create_street_address(user_id, false).await;

    for _ in 0..2 {
        let resp = ctx
            .client
            .delete(ctx.storefront(&format!(
                "/api/addresses/{address_id}?userId={user_id}"
            )))
            .send()
            .await
            .expect("Failed to send delete");
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.expect("Failed to parse delete body");
        assert_eq!(body.get("ok"), Some(&Value::Bool(true)));
    }

    assert!(list_addresses(&ctx, user_id).await.is_empty());
}
