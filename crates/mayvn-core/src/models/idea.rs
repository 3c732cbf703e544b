use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Brand profile that drives content ideation. Every field is optional;
/// prompts and fallbacks substitute neutral wording for missing ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(default)]
pub struct BrandData {
    pub brand_name: Option<String>,
    pub tagline: Option<String>,
    pub business_overview: Option<String>,
    pub brand_values: Vec<String>,
    pub target_audience: Vec<String>,
    pub tone_of_voice: Vec<String>,
    pub colors: Vec<String>,
    pub fonts: Vec<String>,
}

impl BrandData {
    pub fn name(&self) -> Option<&str> {
        self.brand_name.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// A scored Instagram carousel concept
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Idea {
    pub idea: String,
    pub concept: String,
    pub visual_style: String,
    pub creativity_score: f64,
    pub brand_alignment_score: f64,
    pub engagement_score: f64,
    pub clarity_score: f64,
    pub total_score: f64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateIdeasRequest {
    #[serde(default)]
    pub brand_data: Option<BrandData>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateIdeasResponse {
    pub success: bool,
    pub ideas: Vec<Idea>,
    pub raw_response: String,
    /// Set when the ideas are the canned fallback list
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
