//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use mayvn_core::models;

/// The OpenAPI document served at `/api/openapi.json`
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mayvn API",
        version = "0.1.0",
        description = "Instagram insights aggregation and carousel idea generation for brand marketing."
    ),
    paths(
        handlers::insights::get_insights,
        handlers::ideas::generate_ideas,
        handlers::tokens::save_token,
        handlers::accounts::list_accounts,
        handlers::accounts::disconnect,
    ),
    components(schemas(
        error::ErrorResponse,
        models::AccountProfile,
        models::MediaKind,
        models::MediaItem,
        models::InsightSource,
        models::InsightBundle,
        models::MediaComment,
        models::MediaInsight,
        models::InsightTotals,
        models::InsightsResponse,
        models::AccountSummary,
        models::TokenType,
        models::BrandData,
        models::Idea,
        models::GenerateIdeasRequest,
        models::GenerateIdeasResponse,
        models::SaveTokenRequest,
        models::SaveTokenResponse,
        models::AccountsResponse,
        models::DisconnectRequest,
        models::DisconnectResponse,
    )),
    tags(
        (name = "instagram", description = "Instagram account insights"),
        (name = "ideas", description = "Carousel idea generation"),
        (name = "accounts", description = "Connected Instagram accounts and tokens"),
    )
)]
pub struct ApiDoc;
