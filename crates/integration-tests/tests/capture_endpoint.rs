//! Integration tests for the capture endpoint.
//!
//! These tests require:
//! - The capture service running (cargo run -p precheckout-storefront)
//! - Valid VTEX credentials in environment
//!
//! Captures write real documents into the configured data entity, so run
//! them against a sandbox account.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Base URL for the capture service (configurable via environment).
fn base_url() -> String {
    std::env::var("PRECHECKOUT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A unique email per test run, so the first capture always creates.
fn fresh_email() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("it-{nanos:x}@example.com")
}

async fn post_capture(client: &Client, body: &Value) -> reqwest::Response {
    client
        .post(format!("{}/_v/precheckout/client", base_url()))
        .json(body)
        .send()
        .await
        .expect("Failed to reach capture endpoint")
}

#[tokio::test]
#[ignore = "Requires running service and VTEX credentials"]
async fn test_health() {
    let resp = reqwest::get(format!("{}/health", base_url()))
        .await
        .expect("Failed to reach service");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running service and VTEX credentials"]
async fn test_fresh_email_creates_then_updates_same_id() {
    let client = Client::new();
    let email = fresh_email();

    let resp = post_capture(
        &client,
        &json!({ "email": email, "homePhone": "11987654321" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["ok"], true);
    assert_eq!(body["action"], "created");
    let id = body["id"].as_str().expect("id missing").to_owned();
    assert!(!id.is_empty());

    let resp = post_capture(
        &client,
        &json!({ "email": email, "homePhone": "21999998888", "orderFormId": "it-of" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["action"], "updated");
    assert_eq!(body["id"], id);
}

#[tokio::test]
#[ignore = "Requires running service and VTEX credentials"]
async fn test_phone_alias_is_accepted() {
    let client = Client::new();
    let email = fresh_email();

    let resp = post_capture(&client, &json!({ "email": email, "phone": "11987654321" })).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["ok"], true);
}

#[tokio::test]
#[ignore = "Requires running service and VTEX credentials"]
async fn test_missing_fields_are_rejected() {
    let client = Client::new();

    let resp = post_capture(&client, &json!({ "email": "", "homePhone": "11987654321" })).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["ok"], false);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));

    let resp = post_capture(&client, &json!({ "email": fresh_email() })).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
