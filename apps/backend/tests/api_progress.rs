//! Progress API tests.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use common::fixtures;
use common::TestContext;

/// Test progress starts out empty.
#[tokio::test]
async fn test_get_progress_empty() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user("miyuki").await;

    let response = server
        .get("/api/progress")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert!(body["progress"].as_object().unwrap().is_empty());
}

/// Test a single update round-trips through the map keyed by item id.
#[tokio::test]
async fn test_update_then_get() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user("miyuki").await;

    let response = server
        .post("/api/progress/update")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .json(&fixtures::update_progress_request(
            "日",
            fixtures::progress_fields(true, 4, 2.6),
        ))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!({ "success": true }));

    let body: serde_json::Value = server
        .get("/api/progress")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .await
        .json();

    let record = &body["progress"]["日"];
    assert_eq!(record["learned"], true);
    assert_eq!(record["in_review"], true);
    assert_eq!(record["interval"], 4);
    assert_eq!(record["ease"], 2.6);
    assert_eq!(record["total_reviews"], 3);
    assert_eq!(record["correct_reviews"], 2);
}

/// Test unspecified fields take their documented defaults.
#[tokio::test]
async fn test_update_fills_defaults() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user("miyuki").await;

    let response = server
        .post("/api/progress/update")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .json(&json!({ "item_id": "月", "learned": true }))
        .await;

    response.assert_status_ok();

    let body: serde_json::Value = server
        .get("/api/progress")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .await
        .json();

    let record = &body["progress"]["月"];
    assert_eq!(record["learned"], true);
    assert_eq!(record["in_review"], false);
    assert_eq!(record["interval"], 1);
    assert_eq!(record["ease"], 2.5);
    assert_eq!(record["consecutive_correct"], 0);
    assert_eq!(record["total_reviews"], 0);
    // Unset optional fields are omitted, not null
    assert!(record.get("note").is_none());
}

/// Test an update replaces the whole record, not just the sent fields.
#[tokio::test]
async fn test_update_replaces_not_merges() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user("miyuki").await;

    // First write with a full set of fields
    server
        .post("/api/progress/update")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .json(&fixtures::update_progress_request(
            "火",
            fixtures::progress_fields(true, 10, 2.8),
        ))
        .await
        .assert_status_ok();

    // Second write sends only one field
    server
        .post("/api/progress/update")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .json(&json!({ "item_id": "火", "learned": false }))
        .await
        .assert_status_ok();

    let body: serde_json::Value = server
        .get("/api/progress")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .await
        .json();

    // The earlier interval and ease are gone; defaults replaced them
    let record = &body["progress"]["火"];
    assert_eq!(record["learned"], false);
    assert_eq!(record["interval"], 1);
    assert_eq!(record["ease"], 2.5);
}

/// Test a missing item id is rejected.
#[tokio::test]
async fn test_update_requires_item_id() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user("miyuki").await;

    let response = server
        .post("/api/progress/update")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .json(&json!({ "item_id": "  ", "learned": true }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
}

/// Test invariant violations are rejected and nothing is written.
#[tokio::test]
async fn test_update_rejects_invalid_counts() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user("miyuki").await;

    let response = server
        .post("/api/progress/update")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .json(&json!({
            "item_id": "水",
            "total_reviews": 2,
            "correct_reviews": 5
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("correct_reviews"));

    let body: serde_json::Value = server
        .get("/api/progress")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .await
        .json();
    assert!(body["progress"].as_object().unwrap().is_empty());
}

/// Test a zero interval is rejected.
#[tokio::test]
async fn test_update_rejects_zero_interval() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user("miyuki").await;

    let response = server
        .post("/api/progress/update")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .json(&json!({ "item_id": "水", "interval": 0 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

/// Test bulk update applies every entry and reports the count.
#[tokio::test]
async fn test_bulk_update_applies_all() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user("miyuki").await;

    let response = server
        .post("/api/progress/bulk-update")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .json(&fixtures::bulk_update_request(vec![
            ("日", fixtures::progress_fields(true, 4, 2.6)),
            ("月", json!({ "learned": false })),
            ("火", json!({ "in_review": true })),
        ]))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["updated"], 3);

    let body: serde_json::Value = server
        .get("/api/progress")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .await
        .json();
    assert_eq!(body["progress"].as_object().unwrap().len(), 3);
}

/// Test the last occurrence wins when a batch repeats an item.
#[tokio::test]
async fn test_bulk_update_last_occurrence_wins() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user("miyuki").await;

    let response = server
        .post("/api/progress/bulk-update")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .json(&fixtures::bulk_update_request(vec![
            ("日", json!({ "learned": true, "interval": 9 })),
            ("日", json!({ "learned": false })),
        ]))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    // Both entries count, even though they hit the same record
    assert_eq!(body["updated"], 2);

    let body: serde_json::Value = server
        .get("/api/progress")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .await
        .json();

    let record = &body["progress"]["日"];
    assert_eq!(record["learned"], false);
    assert_eq!(record["interval"], 1);
}

/// Test one bad entry rejects the whole batch.
#[tokio::test]
async fn test_bulk_update_is_all_or_nothing() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user("miyuki").await;

    let response = server
        .post("/api/progress/bulk-update")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .json(&fixtures::bulk_update_request(vec![
            ("日", json!({ "learned": true })),
            ("月", json!({ "interval": -2 })),
            ("火", json!({ "learned": true })),
        ]))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("items[1]"));

    // No partial state survived
    let body: serde_json::Value = server
        .get("/api/progress")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .await
        .json();
    assert!(body["progress"].as_object().unwrap().is_empty());
}

/// Test a body without `items` is rejected.
#[tokio::test]
async fn test_bulk_update_requires_items_field() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user("miyuki").await;

    let response = server
        .post("/api/progress/bulk-update")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "missing field: items");
}

/// Test a non-array `items` is rejected.
#[tokio::test]
async fn test_bulk_update_rejects_non_array_items() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user("miyuki").await;

    let response = server
        .post("/api/progress/bulk-update")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .json(&json!({ "items": "day" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "items must be an array");
}

/// Test an empty batch succeeds with a zero count.
#[tokio::test]
async fn test_bulk_update_empty_batch() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let user = ctx.create_test_user("miyuki").await;

    let response = server
        .post("/api/progress/bulk-update")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&user.token),
        )
        .json(&json!({ "items": [] }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["updated"], 0);
}

/// Test progress is isolated per user.
#[tokio::test]
async fn test_progress_scoped_to_user() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let miyuki = ctx.create_test_user("miyuki").await;
    let haruto = ctx.create_test_user("haruto").await;

    server
        .post("/api/progress/update")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&miyuki.token),
        )
        .json(&json!({ "item_id": "日", "learned": true }))
        .await
        .assert_status_ok();

    let body: serde_json::Value = server
        .get("/api/progress")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&haruto.token),
        )
        .await
        .json();
    assert!(body["progress"].as_object().unwrap().is_empty());
}
