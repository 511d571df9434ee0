//! Integration tests for the server-rendered pre-checkout form.
//!
//! These tests require:
//! - The capture service running (cargo run -p precheckout-storefront)
//! - Valid VTEX credentials in environment

use reqwest::{Client, StatusCode, redirect};

/// Base URL for the capture service (configurable via environment).
fn base_url() -> String {
    std::env::var("PRECHECKOUT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Client that does not follow redirects, so the 303 is observable.
fn no_redirect_client() -> Client {
    Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

#[tokio::test]
#[ignore = "Requires running service and VTEX credentials"]
async fn test_form_page_renders() {
    let resp = reqwest::get(format!("{}/precheckout", base_url()))
        .await
        .expect("Failed to reach service");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("name=\"email\""));
    assert!(body.contains("name=\"phone\""));
}

#[tokio::test]
#[ignore = "Requires running service and VTEX credentials"]
async fn test_invalid_submit_rerenders_with_hints() {
    let client = no_redirect_client();

    let resp = client
        .post(format!("{}/precheckout", base_url()))
        .form(&[("email", "not-an-email"), ("phone", "123")])
        .send()
        .await
        .expect("Failed to submit form");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Enter a valid email"));
    assert!(body.contains("Enter a valid mobile number"));
}

#[tokio::test]
#[ignore = "Requires running service and VTEX credentials"]
async fn test_valid_submit_redirects_to_checkout() {
    let client = no_redirect_client();

    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let email = format!("it-{nanos:x}@example.com");

    let resp = client
        .post(format!("{}/precheckout", base_url()))
        .form(&[("email", email.as_str()), ("phone", "(11) 98765-4321")])
        .send()
        .await
        .expect("Failed to submit form");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/checkout/#/cart");
}
