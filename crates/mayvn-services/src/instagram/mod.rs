//! Instagram Graph API integration

pub mod client;
pub mod insights;
pub mod token;

pub use client::{GraphApiClient, GraphApiError, TokenDebugInfo};
pub use insights::InsightsAggregator;
pub use token::{classify_token, TokenClassification};
