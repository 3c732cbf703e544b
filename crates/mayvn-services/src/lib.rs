//! Mayvn Services Layer
//!
//! Business services behind the HTTP API: the Instagram Graph API client and
//! insights aggregation, connected-account management, and carousel idea
//! generation on a local language model. Keep thin HTTP handling in mayvn-api.

pub mod accounts;
pub mod ideas;
pub mod instagram;

pub use accounts::{AccountService, SelectedAccount};
pub use ideas::{
    build_prompt, fallback_ideas, parse_ideas, IdeaGenerationError, IdeaGenerator, LanguageModel,
    OllamaClient,
};
pub use instagram::{
    classify_token, GraphApiClient, GraphApiError, InsightsAggregator, TokenClassification,
    TokenDebugInfo,
};
