use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// Username stored until the first profile fetch fills in the real one
pub const PLACEHOLDER_USERNAME: &str = "Instagram Account";

/// Kind of access token, derived from the provider's token inspection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "instagram_token_type", rename_all = "kebab-case")
)]
#[serde(rename_all = "kebab-case")]
pub enum TokenType {
    LongLived,
    ShortLived,
    PageToken,
    PageTokenPermanent,
    Unknown,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::LongLived => "long-lived",
            TokenType::ShortLived => "short-lived",
            TokenType::PageToken => "page-token",
            TokenType::PageTokenPermanent => "page-token-permanent",
            TokenType::Unknown => "unknown",
        }
    }
}

impl Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Instagram account connected to a brand, as held in the token store
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct ConnectedAccount {
    pub user_id: String,
    pub brand_id: String,
    pub instagram_user_id: String,
    pub username: Option<String>,
    pub name: Option<String>,
    pub profile_picture_url: Option<String>,
    pub access_token: Option<String>,
    pub access_token_encrypted: Option<String>,
    pub token_type: TokenType,
    pub token_expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub connected_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Debug for ConnectedAccount {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ConnectedAccount")
            .field("user_id", &self.user_id)
            .field("brand_id", &self.brand_id)
            .field("instagram_user_id", &self.instagram_user_id)
            .field("username", &self.username)
            .field("token_type", &self.token_type)
            .field("token_expires_at", &self.token_expires_at)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

impl ConnectedAccount {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.token_expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Active and holding an unexpired token
    pub fn is_usable(&self) -> bool {
        self.is_active && !self.is_expired()
    }

    pub fn has_token_material(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
            || self
                .access_token_encrypted
                .as_deref()
                .is_some_and(|t| !t.is_empty())
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            instagram_user_id: self.instagram_user_id.clone(),
            username: self.username.clone(),
            is_active: self.is_usable(),
        }
    }
}

/// Fields written when a token is saved for an account
#[derive(Clone)]
pub struct NewConnectedAccount {
    pub user_id: String,
    pub brand_id: String,
    pub instagram_user_id: String,
    pub access_token: Option<String>,
    pub access_token_encrypted: Option<String>,
    pub token_type: TokenType,
    pub token_expires_at: Option<DateTime<Utc>>,
}

impl Debug for NewConnectedAccount {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("NewConnectedAccount")
            .field("user_id", &self.user_id)
            .field("brand_id", &self.brand_id)
            .field("instagram_user_id", &self.instagram_user_id)
            .field("token_type", &self.token_type)
            .field("token_expires_at", &self.token_expires_at)
            .finish_non_exhaustive()
    }
}

/// Profile fields cached on the account after a successful Graph API fetch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileCache {
    pub username: Option<String>,
    pub name: Option<String>,
    pub profile_picture_url: Option<String>,
}

/// Entry of the account switcher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub instagram_user_id: String,
    pub username: Option<String>,
    pub is_active: bool,
}

/// Request body for saving an access token.
/// Fields are optional so that all missing ones can be reported at once.
#[derive(Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveTokenRequest {
    #[validate(required, length(min = 1))]
    pub user_id: Option<String>,
    #[validate(required, length(min = 1))]
    pub brand_id: Option<String>,
    #[validate(required, length(min = 1))]
    pub access_token: Option<String>,
    #[validate(required, length(min = 1))]
    pub instagram_user_id: Option<String>,
}

impl Debug for SaveTokenRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SaveTokenRequest")
            .field("user_id", &self.user_id)
            .field("brand_id", &self.brand_id)
            .field("instagram_user_id", &self.instagram_user_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveTokenResponse {
    pub success: bool,
    pub message: String,
    pub token_type: TokenType,
    pub expires_in_days: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct AccountsQuery {
    pub user_id: Option<String>,
    pub brand_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountsResponse {
    pub accounts: Vec<AccountSummary>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectRequest {
    #[validate(required, length(min = 1))]
    pub user_id: Option<String>,
    #[validate(required, length(min = 1))]
    pub brand_id: Option<String>,
    #[validate(required, length(min = 1))]
    pub instagram_user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DisconnectResponse {
    pub success: bool,
    pub message: String,
}
