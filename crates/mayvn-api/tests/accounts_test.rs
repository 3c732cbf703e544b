//! Token storage, account listing, disconnect and health integration tests.
//!
//! Run with: `cargo test -p mayvn-api --test accounts_test`

mod helpers;

use helpers::fixtures::{
    connected_account, expired, expires_in, mock_graph_json, BRAND_ID, USER_ID,
};
use helpers::{api_path, setup_test_app};
use mayvn_core::models::TokenType;
use mayvn_db::ConnectedAccountStore;
use serde_json::{json, Value};

fn save_payload() -> Value {
    json!({
        "userId": USER_ID,
        "brandId": BRAND_ID,
        "accessToken": "EAAB-long-lived",
        "instagramUserId": "ig-1"
    })
}

#[tokio::test]
async fn test_save_token_classifies_and_encrypts() {
    let mut app = setup_test_app().await;
    let _debug = mock_graph_json(
        &mut app.graph,
        "/debug_token",
        200,
        json!({"data": {"expires_at": expires_in(59).timestamp(), "is_valid": true}}),
    )
    .await;

    let response = app
        .client()
        .post(&api_path("/token/save"))
        .json(&save_payload())
        .await;

    assert_eq!(response.status_code(), 200);
    let data: Value = response.json();
    assert_eq!(data["success"], true);
    assert_eq!(data["message"], "Token saved successfully");
    assert_eq!(data["tokenType"], "long-lived");
    assert_eq!(data["expiresInDays"], 59);

    let stored = app
        .store
        .find(USER_ID, BRAND_ID, "ig-1")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.is_active);
    assert!(stored.access_token.is_none());
    assert!(stored.access_token_encrypted.is_some());
    assert_eq!(stored.token_type, TokenType::LongLived);
}

#[tokio::test]
async fn test_save_token_with_failed_inspection() {
    let mut app = setup_test_app().await;
    let _debug = mock_graph_json(
        &mut app.graph,
        "/debug_token",
        400,
        json!({"error": {"message": "Invalid OAuth access token."}}),
    )
    .await;

    let response = app
        .client()
        .post(&api_path("/token/save"))
        .json(&save_payload())
        .await;

    assert_eq!(response.status_code(), 200);
    let data: Value = response.json();
    assert_eq!(data["tokenType"], "unknown");
    assert_eq!(data["expiresInDays"], 60);
}

#[tokio::test]
async fn test_save_token_missing_fields() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/token/save"))
        .json(&json!({"userId": USER_ID, "brandId": BRAND_ID, "accessToken": ""}))
        .await;

    assert_eq!(response.status_code(), 400);
    let data: Value = response.json();
    assert_eq!(
        data["error"],
        "Missing required fields: userId, brandId, accessToken, and instagramUserId are required"
    );
}

#[tokio::test]
async fn test_list_accounts() {
    let app = setup_test_app().await;
    app.store.insert(connected_account("ig-1", "tok-1", 30)).await;
    app.store
        .insert(expired(connected_account("ig-2", "tok-2", 10)))
        .await;

    let response = app
        .client()
        .get(&api_path("/instagram/accounts"))
        .add_query_param("userId", USER_ID)
        .add_query_param("brandId", BRAND_ID)
        .await;

    assert_eq!(response.status_code(), 200);
    let data: Value = response.json();
    assert_eq!(
        data["accounts"],
        json!([
            {"instagramUserId": "ig-1", "username": "ig-1-handle", "isActive": true},
            {"instagramUserId": "ig-2", "username": "ig-2-handle", "isActive": false}
        ])
    );

    let response = app
        .client()
        .get(&api_path("/instagram/accounts"))
        .add_query_param("userId", USER_ID)
        .await;
    assert_eq!(response.status_code(), 400);

    let response = app
        .client()
        .get(&format!(
            "{}?userId={}&brandId=a&brandId=b",
            api_path("/instagram/accounts"),
            USER_ID
        ))
        .await;
    assert_eq!(response.status_code(), 400);
    let data: Value = response.json();
    assert_eq!(data["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_disconnect_clears_token() {
    let app = setup_test_app().await;
    app.store.insert(connected_account("ig-1", "tok-1", 30)).await;

    let response = app
        .client()
        .post(&api_path("/auth/instagram/disconnect"))
        .json(&json!({"userId": USER_ID, "brandId": BRAND_ID, "instagramUserId": "ig-1"}))
        .await;

    assert_eq!(response.status_code(), 200);
    let data: Value = response.json();
    assert_eq!(data["message"], "Instagram account disconnected successfully");

    let stored = app
        .store
        .find(USER_ID, BRAND_ID, "ig-1")
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.is_active);
    assert!(!stored.has_token_material());

    let response = app
        .client()
        .get(&api_path("/instagram/insights"))
        .add_query_param("userId", USER_ID)
        .add_query_param("brandId", BRAND_ID)
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_disconnect_unknown_account() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/auth/instagram/disconnect"))
        .json(&json!({"userId": USER_ID, "brandId": BRAND_ID, "instagramUserId": "ig-9"}))
        .await;
    assert_eq!(response.status_code(), 404);

    let response = app
        .client()
        .post(&api_path("/auth/instagram/disconnect"))
        .json(&json!({"userId": USER_ID}))
        .await;
    assert_eq!(response.status_code(), 400);
    let data: Value = response.json();
    assert_eq!(
        data["error"],
        "Missing required fields: userId, brandId, and instagramUserId are required"
    );
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/live")
        .add_header("X-Request-ID", "req-123")
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("X-Request-ID"), "req-123");

    let response = app.client().get("/live").await;
    assert!(!response.header("X-Request-ID").is_empty());
}

#[tokio::test]
async fn test_health_reports_store_and_model() {
    let mut app = setup_test_app().await;
    let _tags = app
        .ollama
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_body(r#"{"models":[]}"#)
        .create_async()
        .await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let data: Value = response.json();
    assert_eq!(data["status"], "healthy");
    assert_eq!(data["token_store"], "healthy");
    assert_eq!(data["language_model"], "healthy");
    assert_eq!(data["model"], "qwen2.5:1.5b");
}
