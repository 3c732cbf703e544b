//! Health check handlers and response types.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Duration;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(serde::Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub token_store: String,
    pub language_model: String,
    pub model: String,
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Token store reachability decides the status code; an unreachable model
/// only degrades the report since idea generation falls back.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.accounts.store().clone();
    let model = state.ideas.model().clone();

    let (store_check, model_check) = tokio::join!(
        tokio::time::timeout(CHECK_TIMEOUT, store.ping()),
        tokio::time::timeout(CHECK_TIMEOUT, model.health_check()),
    );

    let token_store = match store_check {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Token store health check failed");
            format!("unhealthy: {}", e)
        }
        Err(_) => "timeout".to_string(),
    };
    let language_model = match model_check {
        Ok(true) => "healthy",
        Ok(false) => "unreachable",
        Err(_) => "timeout",
    };

    let healthy = token_store == "healthy";
    let response = HealthCheckResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        token_store,
        language_model: language_model.to_string(),
        model: model.model_name().to_string(),
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
