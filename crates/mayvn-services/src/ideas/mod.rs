//! Carousel idea generation on a local language model
//!
//! The model is prompted with the brand profile and asked for a JSON array of
//! scored concepts. Model output is repaired and validated by [`parse_ideas`];
//! any failure along the way degrades to [`fallback_ideas`].

pub mod fallback;
pub mod generator;
pub mod ollama;
pub mod parser;
pub mod prompt;

pub use fallback::fallback_ideas;
pub use generator::IdeaGenerator;
pub use ollama::OllamaClient;
pub use parser::parse_ideas;
pub use prompt::build_prompt;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum IdeaGenerationError {
    #[error("Model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("OLLAMA API error: {status}. Make sure OLLAMA is running and the model {model} is installed.")]
    Status { status: u16, model: String },

    #[error("Could not parse ideas from model output: {0}")]
    Parse(String),
}

/// Text-generation backend for idea generation
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier sent with each request
    fn model_name(&self) -> &str;

    /// Generate a completion for the prompt
    async fn generate(&self, prompt: &str) -> Result<String, IdeaGenerationError>;

    /// Check if the inference server is reachable
    async fn health_check(&self) -> bool;
}
