//! Fixture records and upstream responses shared by the integration tests.

use chrono::{DateTime, Duration, Utc};
use mayvn_core::models::{ConnectedAccount, TokenType};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};

pub const USER_ID: &str = "user-1";
pub const BRAND_ID: &str = "brand-1";

/// Active account holding a plaintext token, connected `minutes_ago`
pub fn connected_account(
    instagram_user_id: &str,
    token: &str,
    minutes_ago: i64,
) -> ConnectedAccount {
    let connected_at = Utc::now() - Duration::minutes(minutes_ago);
    ConnectedAccount {
        user_id: USER_ID.to_string(),
        brand_id: BRAND_ID.to_string(),
        instagram_user_id: instagram_user_id.to_string(),
        username: Some(format!("{}-handle", instagram_user_id)),
        name: None,
        profile_picture_url: None,
        access_token: Some(token.to_string()),
        access_token_encrypted: None,
        token_type: TokenType::LongLived,
        token_expires_at: Some(Utc::now() + Duration::days(50)),
        is_active: true,
        connected_at,
        updated_at: connected_at,
    }
}

pub fn expired(mut account: ConnectedAccount) -> ConnectedAccount {
    account.token_expires_at = Some(Utc::now() - Duration::days(1));
    account
}

pub fn expires_in(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}

/// Ten well-formed ideas as a model would return them
pub fn ten_ideas_json() -> String {
    let ideas: Vec<Value> = (1..=10)
        .map(|i| {
            json!({
                "idea": format!("Carousel {}", i),
                "concept": format!("Concept {}", i),
                "visual_style": "Bold typography on brand colors",
                "creativity_score": 8,
                "brand_alignment_score": 9,
                "engagement_score": 7,
                "clarity_score": 8,
                "total_score": 8
            })
        })
        .collect();
    serde_json::to_string(&ideas).expect("serialize ideas")
}

pub async fn mock_ollama_response(server: &mut ServerGuard, model_output: &str) -> Mock {
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "model": "qwen2.5:1.5b", "response": model_output, "done": true }).to_string(),
        )
        .create_async()
        .await
}

pub async fn mock_graph_account(server: &mut ServerGuard, account_id: &str, token: &str) -> Mock {
    server
        .mock("GET", format!("/{}", account_id).as_str())
        .match_query(Matcher::UrlEncoded("access_token".into(), token.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": account_id,
                "username": "acme.studio",
                "name": "Acme Studio",
                "profile_picture_url": "https://cdn.example.com/acme.jpg",
                "followers_count": 1520,
                "media_count": 2
            })
            .to_string(),
        )
        .create_async()
        .await
}

pub async fn mock_graph_media(server: &mut ServerGuard, account_id: &str, media: Value) -> Mock {
    server
        .mock("GET", format!("/{}/media", account_id).as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "data": media }).to_string())
        .create_async()
        .await
}

pub async fn mock_graph_json(
    server: &mut ServerGuard,
    path: &str,
    status: usize,
    body: Value,
) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}
