//! Insights aggregation over an account's recent media
//!
//! The profile and media list are required; everything fetched per media item
//! is best effort. Metrics the provider refuses are replaced by estimates
//! derived from the like count, and a failed comment fetch yields no comments.

use futures::future::join_all;
use mayvn_core::models::{
    InsightBundle, InsightSource, InsightTotals, InsightsReport, MediaComment, MediaInsight,
    MediaItem,
};
use std::collections::HashMap;

use super::{GraphApiClient, GraphApiError};

/// Comments fetched per media item
pub const COMMENTS_PER_MEDIA: usize = 10;

/// Builds a provider bundle from raw metric values. When reach is known but
/// impressions is not, impressions is estimated as 1.5x reach.
pub fn bundle_from_metrics(metrics: &HashMap<String, u64>) -> InsightBundle {
    let get = |name: &str| metrics.get(name).copied();

    let reach = get("reach");
    let impressions = match (get("impressions"), reach) {
        (Some(impressions), _) if impressions > 0 => Some(impressions),
        (_, Some(reach)) if reach > 0 => Some(reach.saturating_mul(3) / 2),
        (impressions, _) => impressions,
    };

    InsightBundle {
        impressions,
        reach,
        saved: get("saved"),
        shares: get("shares"),
        plays: get("plays"),
        source: InsightSource::Provider,
    }
}

#[derive(Debug, Clone)]
pub struct InsightsAggregator {
    client: GraphApiClient,
}

impl InsightsAggregator {
    pub fn new(client: GraphApiClient) -> Self {
        Self { client }
    }

    /// Fetch the account profile and its `limit` most recent media items with
    /// insights, comments and totals
    #[tracing::instrument(skip(self, access_token))]
    pub async fn fetch_insights(
        &self,
        account_id: &str,
        access_token: &str,
        limit: usize,
    ) -> Result<InsightsReport, GraphApiError> {
        let (account, media) = tokio::try_join!(
            self.client.fetch_account(account_id, access_token),
            self.client.list_media(account_id, access_token, limit),
        )?;

        tracing::debug!(media_count = media.len(), "Fetched media list");

        let media = join_all(
            media
                .into_iter()
                .map(|item| self.enrich_media(item, access_token)),
        )
        .await;

        let totals = InsightTotals::from_media(&media);
        let estimated = media.iter().filter(|m| m.insights.is_estimated()).count();

        tracing::info!(
            media_count = media.len(),
            estimated_count = estimated,
            total_reach = totals.reach,
            "Insights aggregated"
        );

        Ok(InsightsReport {
            account,
            media,
            totals,
        })
    }

    async fn enrich_media(&self, media: MediaItem, access_token: &str) -> MediaInsight {
        let (insights, comments) = tokio::join!(
            self.media_insights(&media, access_token),
            self.media_comments(&media.id, access_token),
        );

        MediaInsight {
            media,
            insights,
            comments,
        }
    }

    async fn media_insights(&self, media: &MediaItem, access_token: &str) -> InsightBundle {
        let Some(metrics) = media.media_type.insight_metrics() else {
            tracing::debug!(
                media_id = %media.id,
                media_type = %media.media_type,
                "Skipping insights request, using estimates"
            );
            return InsightBundle::estimated_from_likes(media.like_count);
        };

        match self
            .client
            .fetch_media_insights(&media.id, metrics, access_token)
            .await
        {
            Ok(values) => bundle_from_metrics(&values),
            Err(e) => {
                tracing::debug!(
                    media_id = %media.id,
                    media_type = %media.media_type,
                    error = %e,
                    "No insights for media, using estimates"
                );
                InsightBundle::estimated_from_likes(media.like_count)
            }
        }
    }

    async fn media_comments(&self, media_id: &str, access_token: &str) -> Vec<MediaComment> {
        self.client
            .fetch_comments(media_id, access_token, COMMENTS_PER_MEDIA)
            .await
            .unwrap_or_else(|e| {
                tracing::debug!(media_id = %media_id, error = %e, "Comments unavailable");
                Vec::new()
            })
    }
}
