//! Carousel idea generation handler

use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use mayvn_core::models::{GenerateIdeasRequest, GenerateIdeasResponse};
use mayvn_core::AppError;
use std::sync::Arc;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

/// Generate ten scored carousel ideas for a brand.
/// Model failures still answer 200 with the fallback ideas.
#[utoipa::path(
    post,
    path = "/api/ollama/generate-ideas",
    request_body = GenerateIdeasRequest,
    responses(
        (status = 200, description = "Generated or fallback ideas", body = GenerateIdeasResponse),
        (status = 400, description = "Missing brand data or malformed body", body = ErrorResponse)
    ),
    tag = "ideas"
)]
#[tracing::instrument(skip(state, request))]
pub async fn generate_ideas(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<GenerateIdeasRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let brand = request
        .brand_data
        .ok_or_else(|| AppError::InvalidInput("Brand data is required".to_string()))?;

    Ok(Json(state.ideas.generate(&brand).await))
}
