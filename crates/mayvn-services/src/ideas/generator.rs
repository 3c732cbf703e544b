use mayvn_core::models::{BrandData, GenerateIdeasResponse, Idea};
use std::sync::Arc;

use super::{build_prompt, fallback_ideas, parse_ideas, IdeaGenerationError, LanguageModel};

/// Runs the prompt → model → parse pipeline. Never fails: upstream and parse
/// errors produce the fallback payload.
#[derive(Clone)]
pub struct IdeaGenerator {
    model: Arc<dyn LanguageModel>,
}

impl IdeaGenerator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &Arc<dyn LanguageModel> {
        &self.model
    }

    async fn try_generate(
        &self,
        brand: &BrandData,
    ) -> Result<(Vec<Idea>, String), IdeaGenerationError> {
        let prompt = build_prompt(brand);
        let raw = self.model.generate(&prompt).await?;
        let ideas = parse_ideas(&raw)?;
        Ok((ideas, raw))
    }

    #[tracing::instrument(
        skip(self, brand),
        fields(brand_name = brand.name().unwrap_or_default(), model = self.model.model_name())
    )]
    pub async fn generate(&self, brand: &BrandData) -> GenerateIdeasResponse {
        match self.try_generate(brand).await {
            Ok((ideas, raw_response)) => {
                tracing::info!(count = ideas.len(), "Generated carousel ideas");
                GenerateIdeasResponse {
                    success: true,
                    ideas,
                    raw_response,
                    fallback: false,
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Idea generation failed, using fallback ideas");
                GenerateIdeasResponse {
                    success: true,
                    ideas: fallback_ideas(brand),
                    raw_response: String::new(),
                    fallback: true,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
