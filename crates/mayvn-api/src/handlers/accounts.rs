//! Connected-account listing and disconnect handlers

use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use mayvn_core::models::{
    AccountsQuery, AccountsResponse, ConnectedAccount, DisconnectRequest, DisconnectResponse,
};
use mayvn_core::AppError;
use std::sync::Arc;
use validator::Validate;

use super::required;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson, ValidatedQuery};
use crate::state::AppState;

/// List the Instagram accounts connected to a brand
#[utoipa::path(
    get,
    path = "/api/instagram/accounts",
    params(AccountsQuery),
    responses(
        (status = 200, description = "Connected accounts", body = AccountsResponse),
        (status = 400, description = "Missing userId or brandId", body = ErrorResponse)
    ),
    tag = "accounts"
)]
#[tracing::instrument(skip(state))]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<AccountsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user_id = required(query.user_id, "User ID is required")?;
    let brand_id = required(query.brand_id, "Brand ID is required")?;

    let accounts = state.accounts.list_accounts(&user_id, &brand_id).await?;

    Ok(Json(AccountsResponse {
        accounts: accounts.iter().map(ConnectedAccount::summary).collect(),
    }))
}

/// Deactivate a connected account and clear its stored token
#[utoipa::path(
    post,
    path = "/api/auth/instagram/disconnect",
    request_body = DisconnectRequest,
    responses(
        (status = 200, description = "Account disconnected", body = DisconnectResponse),
        (status = 400, description = "Missing required fields", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    ),
    tag = "accounts"
)]
#[tracing::instrument(skip(state))]
pub async fn disconnect(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<DisconnectRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(|_| {
        AppError::InvalidInput(
            "Missing required fields: userId, brandId, and instagramUserId are required"
                .to_string(),
        )
    })?;

    let DisconnectRequest {
        user_id,
        brand_id,
        instagram_user_id,
    } = request;

    state
        .accounts
        .disconnect(
            &user_id.unwrap_or_default(),
            &brand_id.unwrap_or_default(),
            &instagram_user_id.unwrap_or_default(),
        )
        .await?;

    Ok(Json(DisconnectResponse {
        success: true,
        message: "Instagram account disconnected successfully".to_string(),
    }))
}
