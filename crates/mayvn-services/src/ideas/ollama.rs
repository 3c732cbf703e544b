//! Ollama inference server client

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{IdeaGenerationError, LanguageModel};

const TEMPERATURE: f64 = 0.8;
const TOP_P: f64 = 0.9;
const HEALTH_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
    top_p: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Clone)]
pub struct OllamaClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// `timeout` bounds a whole generation request
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for Ollama")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, IdeaGenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        tracing::debug!(url = %url, model = %self.model, "Calling Ollama");

        let response = self
            .http_client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
                options: GenerateOptions {
                    temperature: TEMPERATURE,
                    top_p: TOP_P,
                },
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = %status, body = %error_text, "Ollama returned an error");
            return Err(IdeaGenerationError::Status {
                status: status.as_u16(),
                model: self.model.clone(),
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        tracing::debug!(response_len = parsed.response.len(), "Ollama response received");
        Ok(parsed.response)
    }

    async fn health_check(&self) -> bool {
        let result = self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "Ollama health check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn test_generate_posts_prompt_and_options() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(Matcher::PartialJson(json!({
                "model": "qwen2.5:1.5b",
                "prompt": "hello",
                "stream": false,
                "options": {"temperature": 0.8, "top_p": 0.9}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"model":"qwen2.5:1.5b","response":"[]","done":true}"#)
            .create_async()
            .await;

        let client =
            OllamaClient::new(&server.url(), "qwen2.5:1.5b", Duration::from_secs(5)).unwrap();
        assert_eq!(client.generate("hello").await.unwrap(), "[]");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate")
            .with_status(404)
            .with_body(r#"{"error":"model 'qwen2.5:1.5b' not found"}"#)
            .create_async()
            .await;

        let client =
            OllamaClient::new(&server.url(), "qwen2.5:1.5b", Duration::from_secs(5)).unwrap();
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, IdeaGenerationError::Status { status: 404, .. }));
        assert!(err.to_string().contains("qwen2.5:1.5b"));
    }

    #[tokio::test]
    async fn test_health_check() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/tags")
            .with_status(200)
            .with_body(r#"{"models":[]}"#)
            .create_async()
            .await;

        let client = OllamaClient::new(&server.url(), "m", Duration::from_secs(5)).unwrap();
        assert!(client.health_check().await);

        let unreachable =
            OllamaClient::new("http://127.0.0.1:9", "m", Duration::from_secs(1)).unwrap();
        assert!(!unreachable.health_check().await);
    }
}
