//! Access-token storage handler

use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use mayvn_core::models::{SaveTokenRequest, SaveTokenResponse};
use mayvn_core::AppError;
use std::sync::Arc;
use validator::Validate;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

const MISSING_FIELDS: &str =
    "Missing required fields: userId, brandId, accessToken, and instagramUserId are required";

/// Store an Instagram access token for a brand and report its type and expiry
#[utoipa::path(
    post,
    path = "/api/token/save",
    request_body = SaveTokenRequest,
    responses(
        (status = 200, description = "Token stored", body = SaveTokenResponse),
        (status = 400, description = "Missing required fields", body = ErrorResponse),
        (status = 500, description = "Encryption or storage failure", body = ErrorResponse)
    ),
    tag = "accounts"
)]
#[tracing::instrument(skip(state, request))]
pub async fn save_token(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<SaveTokenRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request
        .validate()
        .map_err(|_| AppError::InvalidInput(MISSING_FIELDS.to_string()))?;

    let SaveTokenRequest {
        user_id,
        brand_id,
        access_token,
        instagram_user_id,
    } = request;

    let (_account, classification) = state
        .accounts
        .save_token(
            &user_id.unwrap_or_default(),
            &brand_id.unwrap_or_default(),
            &instagram_user_id.unwrap_or_default(),
            &access_token.unwrap_or_default(),
        )
        .await?;

    Ok(Json(SaveTokenResponse {
        success: true,
        message: "Token saved successfully".to_string(),
        token_type: classification.token_type,
        expires_in_days: classification.expires_in_days,
        expires_at: classification.expires_at,
    }))
}
