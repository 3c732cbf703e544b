//! Access-token classification from `debug_token` output

use chrono::{DateTime, Duration, TimeZone, Utc};
use mayvn_core::models::TokenType;

use super::TokenDebugInfo;

/// Tokens expiring later than this are long-lived
const LONG_LIVED_MIN_DAYS: i64 = 30;
/// Expiry assumed when the provider reports none or cannot be asked
const SAFETY_EXPIRY_DAYS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClassification {
    pub token_type: TokenType,
    pub expires_at: Option<DateTime<Utc>>,
    pub expires_in_days: i64,
}

fn days_until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (expires_at - now).num_seconds();
    (seconds as f64 / 86_400.0).ceil() as i64
}

fn timestamp(seconds: Option<i64>) -> Option<DateTime<Utc>> {
    seconds
        .filter(|s| *s > 0)
        .and_then(|s| Utc.timestamp_opt(s, 0).single())
}

/// Classify a token. `None` means the inspection failed.
pub fn classify_token(info: Option<&TokenDebugInfo>, now: DateTime<Utc>) -> TokenClassification {
    let Some(info) = info else {
        let expires_at = now + Duration::days(SAFETY_EXPIRY_DAYS);
        return TokenClassification {
            token_type: TokenType::Unknown,
            expires_at: Some(expires_at),
            expires_in_days: SAFETY_EXPIRY_DAYS,
        };
    };

    if let Some(expires_at) = timestamp(info.expires_at) {
        let days = days_until(expires_at, now);
        let token_type = if days > LONG_LIVED_MIN_DAYS {
            TokenType::LongLived
        } else if days > 0 {
            TokenType::ShortLived
        } else {
            TokenType::Unknown
        };
        return TokenClassification {
            token_type,
            expires_at: Some(expires_at),
            expires_in_days: days,
        };
    }

    if let Some(expires_at) = timestamp(info.data_access_expires_at) {
        return TokenClassification {
            token_type: TokenType::PageToken,
            expires_at: Some(expires_at),
            expires_in_days: days_until(expires_at, now),
        };
    }

    TokenClassification {
        token_type: TokenType::PageTokenPermanent,
        expires_at: Some(now + Duration::days(SAFETY_EXPIRY_DAYS)),
        expires_in_days: SAFETY_EXPIRY_DAYS,
    }
}
