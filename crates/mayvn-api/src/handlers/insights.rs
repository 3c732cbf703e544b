//! Instagram insights handler

use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use mayvn_core::models::{InsightsQuery, InsightsResponse};
use std::sync::Arc;

use super::{non_empty, required};
use crate::error::{ErrorResponse, HttpAppError, ValidatedQuery};
use crate::state::AppState;

/// Profile, recent media with insights and comments, and totals for one
/// connected account of a brand
#[utoipa::path(
    get,
    path = "/api/instagram/insights",
    params(InsightsQuery),
    responses(
        (status = 200, description = "Insights for the selected account", body = InsightsResponse),
        (status = 400, description = "Missing userId or brandId", body = ErrorResponse),
        (status = 401, description = "Not connected, token expired or missing", body = ErrorResponse),
        (status = 404, description = "Requested account not found", body = ErrorResponse),
        (status = 500, description = "Graph API or internal failure", body = ErrorResponse)
    ),
    tag = "instagram"
)]
#[tracing::instrument(skip(state))]
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<InsightsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user_id = required(query.user_id, "User ID is required")?;
    let brand_id = required(query.brand_id, "Brand ID is required")?;
    let requested = non_empty(query.instagram_user_id);

    let selected = state
        .accounts
        .select_account(&user_id, &brand_id, requested.as_deref())
        .await?;

    let report = state
        .insights
        .fetch_insights(
            &selected.account.instagram_user_id,
            &selected.access_token,
            state.config.insights_media_limit,
        )
        .await?;

    state
        .accounts
        .cache_profile(&selected.account, &report.account)
        .await;

    Ok(Json(InsightsResponse {
        success: true,
        account: report.account,
        current_instagram_user_id: selected.account.instagram_user_id,
        all_accounts: selected.all_accounts,
        media_insights: report.media,
        insights: report.totals,
    }))
}
