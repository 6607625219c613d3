//! Integration tests for brand CRUD and product↔brand links.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p agora-server)
//!
//! Run with: cargo test -p agora-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the server under test (configurable via environment).
fn base_url() -> String {
    std::env::var("AGORA_BASE_URL").unwrap_or_else(|_| "http://localhost:9000".to_string())
}

/// Register a throwaway vendor and return its bearer token.
async fn vendor_token(client: &Client) -> String {
    let mut body = json!({
        "store_name": "Brand Test Store",
        "email": format!("brands-{}@example.com", Uuid::new_v4()),
        "password": "secret"
    });
    if let Ok(code) = std::env::var("STORE_REGISTRATION_CODE") {
        body["registration_code"] = json!(code);
    }

    let resp: Value = client
        .post(format!("{}/stores/regular", base_url()))
        .json(&body)
        .send()
        .await
        .expect("request failed")
        .json()
        .await
        .expect("json body");

    resp["token"]
        .as_str()
        .expect("registration should auto-login")
        .to_owned()
}

/// Create a brand and return it.
async fn create_brand(client: &Client, token: &str, body: Value) -> (StatusCode, Value) {
    let resp = client
        .post(format!("{}/admin/brands", base_url()))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("request failed");
    let status = resp.status();
    (status, resp.json().await.expect("json body"))
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_brand_handle_derived_from_name() {
    let client = Client::new();
    let token = vendor_token(&client).await;

    let suffix = Uuid::new_v4().simple().to_string();
    let (status, body) = create_brand(
        &client,
        &token,
        json!({ "name": format!("Fancy! Brand {suffix}") }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["brand"]["handle"],
        format!("fancy-brand-{suffix}").as_str()
    );
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_brand_requires_name() {
    let client = Client::new();
    let token = vendor_token(&client).await;

    let (status, body) = create_brand(&client, &token, json!({ "description": "no name" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Name is required");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_duplicate_handle_conflicts_with_friendly_message() {
    let client = Client::new();
    let token = vendor_token(&client).await;

    let handle = format!("dup-{}", Uuid::new_v4().simple());
    let (first, _) = create_brand(
        &client,
        &token,
        json!({ "name": "First", "handle": handle }),
    )
    .await;
    assert_eq!(first, StatusCode::CREATED);

    let (second, body) = create_brand(
        &client,
        &token,
        json!({ "name": "Second", "handle": handle }),
    )
    .await;
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "A brand with this handle already exists");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_relinking_product_keeps_exactly_one_brand() {
    let client = Client::new();
    let token = vendor_token(&client).await;

    // Two brands and one product.
    let (_, first) = create_brand(
        &client,
        &token,
        json!({ "name": format!("One {}", Uuid::new_v4().simple()) }),
    )
    .await;
    let (_, second) = create_brand(
        &client,
        &token,
        json!({ "name": format!("Two {}", Uuid::new_v4().simple()) }),
    )
    .await;

    let product: Value = client
        .post(format!("{}/admin/products", base_url()))
        .bearer_auth(&token)
        .json(&json!({ "title": "Linkable product" }))
        .send()
        .await
        .expect("request failed")
        .json()
        .await
        .expect("json body");
    let product_id = product["product"]["id"].as_str().expect("product id");

    // Link to the first brand, then relink to the second.
    for brand in [&first, &second] {
        let resp = client
            .post(format!("{}/admin/products/{product_id}/brand", base_url()))
            .bearer_auth(&token)
            .json(&json!({ "brand_id": brand["brand"]["id"] }))
            .send()
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    // Exactly one active link remains: the most recent.
    let current: Value = client
        .get(format!("{}/admin/products/{product_id}/brand", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("request failed")
        .json()
        .await
        .expect("json body");

    assert_eq!(current["brand"]["id"], second["brand"]["id"]);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_product_handle_gets_random_suffix() {
    let client = Client::new();
    let token = vendor_token(&client).await;

    let mut handles = Vec::new();
    for _ in 0..2 {
        let product: Value = client
            .post(format!("{}/admin/products", base_url()))
            .bearer_auth(&token)
            .json(&json!({ "title": "Same Title" }))
            .send()
            .await
            .expect("request failed")
            .json()
            .await
            .expect("json body");
        handles.push(
            product["product"]["handle"]
                .as_str()
                .expect("handle")
                .to_owned(),
        );
    }

    assert_ne!(handles[0], handles[1], "suffix keeps reused titles apart");
    for handle in &handles {
        assert!(handle.starts_with("same-title-"));
    }
}
