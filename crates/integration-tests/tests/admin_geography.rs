//! Integration tests for back-office geography management.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - The back-office server running (cargo run -p piyesa-admin)
//! - The storefront server running, for the cross-service visibility
//!   checks
//!
//! Run with: cargo test -p piyesa-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use piyesa_integration_tests::{TestContext, data_array, data_id};

/// Create a region with a unique name; returns its id.
async fn create_region(ctx: &TestContext) -> i64 {
    let resp = ctx
        .client
        .post(ctx.admin("/api/regions"))
        .json(&json!({"name": format!("Test Region {}", Uuid::new_v4())}))
        .send()
        .await
        .expect("Failed to create region");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse region");
    data_id(&body)
}

/// Create a province under `region_id`; returns its id.
async fn create_province(ctx: &TestContext, region_id: i64) -> i64 {
    let resp = ctx
        .client
        .post(ctx.admin("/api/provinces"))
        .json(&json!({
            "regionId": region_id,
            "name": format!("Test Province {}", Uuid::new_v4()),
        }))
        .send()
        .await
        .expect("Failed to create province");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse province");
    data_id(&body)
}

/// Create a municipality under `province_id`; returns its id.
async fn create_municipality(ctx: &TestContext, province_id: i64) -> i64 {
    let resp = ctx
        .client
        .post(ctx.admin("/api/municipalities"))
        .json(&json!({
            "provinceId": province_id,
            "name": format!("Test Municipality {}", Uuid::new_v4()),
            "postalCode": "4217",
        }))
        .send()
        .await
        .expect("Failed to create municipality");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse municipality");
    data_id(&body)
}

/// Create a barangay under `municipality_id`; returns its id.
async fn create_barangay(ctx: &TestContext, municipality_id: i64) -> i64 {
    let resp = ctx
        .client
        .post(ctx.admin("/api/barangays"))
        .json(&json!({
            "municipalityId": municipality_id,
            "name": format!("Test Barangay {}", Uuid::new_v4()),
        }))
        .send()
        .await
        .expect("Failed to create barangay");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse barangay");
    data_id(&body)
}

// ============================================================================
// Region CRUD
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_region_crud() {
    let ctx = TestContext::new();
    let name = format!("Test Region {}", Uuid::new_v4());

    let resp = ctx
        .client
        .post(ctx.admin("/api/regions"))
        .json(&json!({"name": name}))
        .send()
        .await
        .expect("Failed to create region");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse region");
    let region_id = data_id(&body);
    assert_eq!(body.pointer("/data/name").and_then(Value::as_str), Some(name.as_str()));

    // Listed among all regions.
    let resp = ctx
        .client
        .get(ctx.admin("/api/regions"))
        .send()
        .await
        .expect("Failed to list regions");
    let body: Value = resp.json().await.expect("Failed to parse list");
    assert!(
        data_array(&body)
            .iter()
            .any(|r| r.get("id").and_then(Value::as_i64) == Some(region_id))
    );

    // Rename.
    let renamed = format!("Renamed Region {}", Uuid::new_v4());
    let resp = ctx
        .client
        .patch(ctx.admin(&format!("/api/regions/{region_id}")))
        .json(&json!({"name": renamed}))
        .send()
        .await
        .expect("Failed to rename region");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse region");
    assert_eq!(
        body.pointer("/data/name").and_then(Value::as_str),
        Some(renamed.as_str())
    );

    // Delete, then confirm the rename target is gone from the list.
    let resp = ctx
        .client
        .delete(ctx.admin(&format!("/api/regions/{region_id}")))
        .send()
        .await
        .expect("Failed to delete region");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse delete body");
    assert_eq!(body.get("ok"), Some(&Value::Bool(true)));

    let resp = ctx
        .client
        .delete(ctx.admin(&format!("/api/regions/{region_id}")))
        .send()
        .await
        .expect("Failed to send second delete");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_region_duplicate_name_conflict() {
    let ctx = TestContext::new();
    let name = format!("Test Region {}", Uuid::new_v4());

    for expected in [StatusCode::OK, StatusCode::CONFLICT] {
        let resp = ctx
            .client
            .post(ctx.admin("/api/regions"))
            .json(&json!({"name": name}))
            .send()
            .await
            .expect("Failed to create region");
        assert_eq!(resp.status(), expected);
    }
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_region_blank_name_rejected() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .post(ctx.admin("/api/regions"))
        .json(&json!({"name": "   "}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_region_with_provinces_cannot_be_deleted() {
    let ctx = TestContext::new();
    let region_id = create_region(&ctx).await;
    let province_id = create_province(&ctx, region_id).await;

    let resp = ctx
        .client
        .delete(ctx.admin(&format!("/api/regions/{region_id}")))
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Bottom-up works.
    for path in [
        format!("/api/provinces/{province_id}"),
        format!("/api/regions/{region_id}"),
    ] {
        let resp = ctx
            .client
            .delete(ctx.admin(&path))
            .send()
            .await
            .expect("Failed to delete");
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

// ============================================================================
// Lower tiers
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_province_requires_existing_region() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .post(ctx.admin("/api/provinces"))
        .json(&json!({"regionId": 999_999, "name": "Orphan Province"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_municipality_blank_postal_code_rejected() {
    let ctx = TestContext::new();
    let region_id = create_region(&ctx).await;
    let province_id = create_province(&ctx, region_id).await;

    let resp = ctx
        .client
        .post(ctx.admin("/api/municipalities"))
        .json(&json!({
            "provinceId": province_id,
            "name": "Test Municipality",
            "postalCode": "  ",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running admin and storefront servers"]
async fn test_hierarchy_flows_through_to_storefront() {
    let ctx = TestContext::new();
    let region_id = create_region(&ctx).await;
    let province_id = create_province(&ctx, region_id).await;
    let municipality_id = create_municipality(&ctx, province_id).await;
    let barangay_id = create_barangay(&ctx, municipality_id).await;

    // A fresh region id is a cold cache key on the storefront, so the
    // lookup reads straight through to the rows just created.
    let resp = ctx
        .client
        .get(ctx.storefront(&format!("/api/municipalities?regionId={region_id}")))
        .send()
        .await
        .expect("Failed to fetch storefront municipalities");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse municipalities");
    assert!(
        data_array(&body)
            .iter()
            .any(|m| m.get("id").and_then(Value::as_i64) == Some(municipality_id))
    );

    let resp = ctx
        .client
        .get(ctx.storefront(&format!(
            "/api/barangays?municipalityId={municipality_id}"
        )))
        .send()
        .await
        .expect("Failed to fetch storefront barangays");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse barangays");
    assert!(
        data_array(&body)
            .iter()
            .any(|b| b.get("id").and_then(Value::as_i64) == Some(barangay_id))
    );
}

// ============================================================================
// Approved addresses
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin and storefront servers"]
async fn test_deactivated_approved_address_hidden_from_storefront() {
    let ctx = TestContext::new();
    let region_id = create_region(&ctx).await;
    let province_id = create_province(&ctx, region_id).await;
    let municipality_id = create_municipality(&ctx, province_id).await;
    let barangay_id = create_barangay(&ctx, municipality_id).await;

    // Two approved addresses; deactivate the second.
    let mut ids = Vec::new();
    for street in ["12 Mabini Street", "34 Rizal Avenue"] {
        let resp = ctx
            .client
            .post(ctx.admin("/api/approvedAddresses"))
            .json(&json!({"barangayId": barangay_id, "streetLine": street}))
            .send()
            .await
            .expect("Failed to create approved address");
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.expect("Failed to parse approved address");
        ids.push(data_id(&body));
    }
    let kept = ids.first().copied().expect("kept id");
    let deactivated = ids.last().copied().expect("deactivated id");

    let resp = ctx
        .client
        .patch(ctx.admin(&format!("/api/approvedAddresses/{deactivated}")))
        .json(&json!({"isActive": false}))
        .send()
        .await
        .expect("Failed to deactivate approved address");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse approved address");
    assert_eq!(
        body.pointer("/data/isActive").and_then(Value::as_bool),
        Some(false)
    );

    // The back office still sees both; the storefront only the active one.
    let resp = ctx
        .client
        .get(ctx.admin(&format!("/api/approvedAddresses?barangayId={barangay_id}")))
        .send()
        .await
        .expect("Failed to list approved addresses");
    let body: Value = resp.json().await.expect("Failed to parse admin list");
    assert_eq!(data_array(&body).len(), 2);

    let resp = ctx
        .client
        .get(ctx.storefront(&format!(
            "/api/approvedAddresses?barangayId={barangay_id}"
        )))
        .send()
        .await
        .expect("Failed to list storefront approved addresses");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse storefront list");
    let visible: Vec<i64> = data_array(&body)
        .iter()
        .filter_map(|a| a.get("id").and_then(Value::as_i64))
        .collect();
    assert_eq!(visible, vec![kept]);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_duplicate_street_line_in_barangay_conflict() {
    let ctx = TestContext::new();
    let region_id = create_region(&ctx).await;
    let province_id = create_province(&ctx, region_id).await;
    let municipality_id = create_municipality(&ctx, province_id).await;
    let barangay_id = create_barangay(&ctx, municipality_id).await;

    for expected in [StatusCode::OK, StatusCode::CONFLICT] {
        let resp = ctx
            .client
            .post(ctx.admin("/api/approvedAddresses"))
            .json(&json!({"barangayId": barangay_id, "streetLine": "56 Bonifacio Street"}))
            .send()
            .await
            .expect("Failed to create approved address");
        assert_eq!(resp.status(), expected);
    }
}
