//! Domain route groups

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn instagram_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("{}/instagram/insights", API_PREFIX),
        get(handlers::insights::get_insights),
    )
}

pub fn idea_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("{}/ollama/generate-ideas", API_PREFIX),
        post(handlers::ideas::generate_ideas),
    )
}

pub fn account_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/token/save", API_PREFIX),
            post(handlers::tokens::save_token),
        )
        .route(
            &format!("{}/instagram/accounts", API_PREFIX),
            get(handlers::accounts::list_accounts),
        )
        .route(
            &format!("{}/auth/instagram/disconnect", API_PREFIX),
            post(handlers::accounts::disconnect),
        )
}
