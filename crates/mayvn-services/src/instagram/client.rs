//! HTTP client for the Instagram Graph API

use anyhow::Context;
use mayvn_core::models::{AccountProfile, MediaComment, MediaItem};
use mayvn_core::AppError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

const ACCOUNT_FIELDS: &str =
    "id,username,name,biography,profile_picture_url,followers_count,follows_count,media_count,website";
const MEDIA_FIELDS: &str =
    "id,caption,media_type,media_url,thumbnail_url,permalink,timestamp,like_count,comments_count";
const COMMENT_FIELDS: &str = "id,text,timestamp,from{id,username}";

#[derive(Debug, thiserror::Error)]
pub enum GraphApiError {
    /// Transport failure; the request URL is stripped since it carries the token
    #[error("Graph API request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Non-success response, with the provider's `error.message` when present
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode Graph API response: {0}")]
    Decode(String),
}

impl GraphApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GraphApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<GraphApiError> for AppError {
    fn from(err: GraphApiError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

#[derive(Deserialize)]
struct GraphErrorBody {
    error: Option<GraphErrorDetail>,
}

#[derive(Deserialize)]
struct GraphErrorDetail {
    message: Option<String>,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Deserialize)]
struct InsightMetric {
    name: String,
    #[serde(default)]
    values: Vec<InsightValue>,
}

#[derive(Deserialize)]
struct InsightValue {
    #[serde(default)]
    value: serde_json::Value,
}

#[derive(Deserialize)]
struct RawComment {
    id: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    from: Option<CommentAuthor>,
}

#[derive(Deserialize)]
struct CommentAuthor {
    #[serde(default)]
    username: Option<String>,
}

#[derive(Deserialize)]
struct DebugTokenEnvelope {
    data: Option<TokenDebugInfo>,
}

/// Subset of the `debug_token` response used to classify a token
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TokenDebugInfo {
    /// Unix seconds; absent or 0 when the token never expires
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub data_access_expires_at: Option<i64>,
    #[serde(default)]
    pub is_valid: Option<bool>,
}

/// Graph API client. Access tokens are passed per call.
#[derive(Clone)]
pub struct GraphApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl Debug for GraphApiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GraphApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GraphApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for the Graph API")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        context: &str,
    ) -> Result<T, GraphApiError> {
        let response = self
            .http_client
            .get(format!("{}/{}", self.base_url, path))
            .query(query)
            .send()
            .await
            .map_err(|e| GraphApiError::Request(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GraphApiError::Request(e.without_url()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GraphErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("Failed to {}", context));
            return Err(GraphApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| GraphApiError::Decode(format!("{}: {}", context, e)))
    }

    /// Fetch the profile of an Instagram business account
    pub async fn fetch_account(
        &self,
        account_id: &str,
        access_token: &str,
    ) -> Result<AccountProfile, GraphApiError> {
        self.get_json(
            account_id,
            &[("fields", ACCOUNT_FIELDS), ("access_token", access_token)],
            "fetch account info",
        )
        .await
    }

    /// List the most recent media of an account
    pub async fn list_media(
        &self,
        account_id: &str,
        access_token: &str,
        limit: usize,
    ) -> Result<Vec<MediaItem>, GraphApiError> {
        let limit = limit.to_string();
        let envelope: DataEnvelope<MediaItem> = self
            .get_json(
                &format!("{}/media", account_id),
                &[
                    ("fields", MEDIA_FIELDS),
                    ("limit", limit.as_str()),
                    ("access_token", access_token),
                ],
                "fetch media",
            )
            .await?;

        Ok(envelope.data)
    }

    /// Fetch the requested insight metrics of a media item, keyed by metric name.
    /// Each metric takes the first reported value; non-numeric values count as 0.
    pub async fn fetch_media_insights(
        &self,
        media_id: &str,
        metrics: &str,
        access_token: &str,
    ) -> Result<HashMap<String, u64>, GraphApiError> {
        let envelope: DataEnvelope<InsightMetric> = self
            .get_json(
                &format!("{}/insights", media_id),
                &[("metric", metrics), ("access_token", access_token)],
                "fetch media insights",
            )
            .await?;

        Ok(envelope
            .data
            .into_iter()
            .map(|metric| {
                let value = metric
                    .values
                    .first()
                    .and_then(|v| v.value.as_f64())
                    .filter(|v| v.is_finite() && *v > 0.0)
                    .map(|v| v as u64)
                    .unwrap_or(0);
                (metric.name, value)
            })
            .collect())
    }

    /// Fetch up to `limit` top-level comments of a media item
    pub async fn fetch_comments(
        &self,
        media_id: &str,
        access_token: &str,
        limit: usize,
    ) -> Result<Vec<MediaComment>, GraphApiError> {
        let limit = limit.to_string();
        let envelope: DataEnvelope<RawComment> = self
            .get_json(
                &format!("{}/comments", media_id),
                &[
                    ("fields", COMMENT_FIELDS),
                    ("limit", limit.as_str()),
                    ("access_token", access_token),
                ],
                "fetch comments",
            )
            .await?;

        Ok(envelope
            .data
            .into_iter()
            .enumerate()
            .map(|(index, comment)| MediaComment {
                id: comment.id,
                text: comment.text.unwrap_or_default(),
                username: comment
                    .from
                    .and_then(|author| author.username)
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| format!("User {}", index + 1)),
                timestamp: comment.timestamp,
            })
            .collect())
    }

    /// Inspect a token with the `debug_token` endpoint, using the token itself as
    /// the inspecting credential
    pub async fn debug_token(&self, access_token: &str) -> Result<TokenDebugInfo, GraphApiError> {
        let envelope: DebugTokenEnvelope = self
            .get_json(
                "debug_token",
                &[("input_token", access_token), ("access_token", access_token)],
                "inspect token",
            )
            .await?;

        envelope
            .data
            .ok_or_else(|| GraphApiError::Decode("debug_token response has no data".to_string()))
    }
}
