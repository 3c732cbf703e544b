use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::{IntoParams, ToSchema};

use super::AccountSummary;

/// Instagram business/creator account profile as returned by the Graph API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct AccountProfile {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follows_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaKind {
    Image,
    Video,
    Reel,
    CarouselAlbum,
    /// Any media type this service does not know about yet
    #[default]
    #[serde(other)]
    Unknown,
}

impl MediaKind {
    /// Insight metrics the Graph API still serves for this kind.
    /// `None` means the metrics call is skipped and estimates are used.
    pub fn insight_metrics(&self) -> Option<&'static str> {
        match self {
            MediaKind::CarouselAlbum => None,
            MediaKind::Reel => Some("reach,saved,shares"),
            MediaKind::Image | MediaKind::Video | MediaKind::Unknown => Some("reach,saved"),
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaKind::Image => write!(f, "IMAGE"),
            MediaKind::Video => write!(f, "VIDEO"),
            MediaKind::Reel => write!(f, "REEL"),
            MediaKind::CarouselAlbum => write!(f, "CAROUSEL_ALBUM"),
            MediaKind::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// One entry of the account's media list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct MediaItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default)]
    pub media_type: MediaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comments_count: u64,
}

/// Whether an insight bundle came from the provider or was synthesized
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InsightSource {
    Provider,
    Estimated,
}

/// Engagement metrics for a single media item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct InsightBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impressions: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reach: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plays: Option<u64>,
    pub source: InsightSource,
}

impl InsightBundle {
    /// Heuristic metrics derived from the like count alone:
    /// reach 5x, impressions 10x, saved 0.1x (floored).
    pub fn estimated_from_likes(like_count: u64) -> Self {
        Self {
            impressions: Some(like_count.saturating_mul(10)),
            reach: Some(like_count.saturating_mul(5)),
            saved: Some(like_count / 10),
            shares: None,
            plays: None,
            source: InsightSource::Estimated,
        }
    }

    pub fn is_estimated(&self) -> bool {
        self.source == InsightSource::Estimated
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct MediaComment {
    pub id: String,
    #[serde(default)]
    pub text: String,
    /// Author username, or `User {n}` when the provider withholds it
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A media item enriched with insights and its most recent comments
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct MediaInsight {
    #[serde(flatten)]
    pub media: MediaItem,
    pub insights: InsightBundle,
    pub comments: Vec<MediaComment>,
}

/// Roll-up over all media items of a report
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct InsightTotals {
    pub impressions: u64,
    pub reach: u64,
    pub likes: u64,
    pub comments: u64,
    pub saves: u64,
}

impl InsightTotals {
    pub fn from_media(media: &[MediaInsight]) -> Self {
        media.iter().fold(Self::default(), |mut totals, item| {
            totals.impressions = totals
                .impressions
                .saturating_add(item.insights.impressions.unwrap_or(0));
            totals.reach = totals.reach.saturating_add(item.insights.reach.unwrap_or(0));
            totals.likes = totals.likes.saturating_add(item.media.like_count);
            totals.comments = totals.comments.saturating_add(item.media.comments_count);
            totals.saves = totals.saves.saturating_add(item.insights.saved.unwrap_or(0));
            totals
        })
    }
}

/// Result of one insights aggregation run
#[derive(Debug, Clone, PartialEq)]
pub struct InsightsReport {
    pub account: AccountProfile,
    pub media: Vec<MediaInsight>,
    pub totals: InsightTotals,
}

/// Query parameters for the insights endpoint
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct InsightsQuery {
    pub user_id: Option<String>,
    pub brand_id: Option<String>,
    pub instagram_user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub success: bool,
    pub account: AccountProfile,
    pub current_instagram_user_id: String,
    pub all_accounts: Vec<AccountSummary>,
    pub media_insights: Vec<MediaInsight>,
    pub insights: InsightTotals,
}
