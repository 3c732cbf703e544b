//! Configuration module
//!
//! This module provides configuration structures for the API and services,
//! including the token store, the Instagram Graph API and the local LLM server.

use std::env;
use std::str::FromStr;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const GRAPH_API_BASE: &str = "https://graph.facebook.com/v18.0";
const GRAPH_API_TIMEOUT_SECS: u64 = 30;
const INSIGHTS_MEDIA_LIMIT: usize = 25;
const MAX_INSIGHTS_MEDIA_LIMIT: usize = 100;
const OLLAMA_URL: &str = "http://localhost:11434";
const OLLAMA_MODEL: &str = "qwen2.5:1.5b";
/// The local model can take minutes on CPU-only hosts.
const OLLAMA_TIMEOUT_SECS: u64 = 900;

/// Where connected-account tokens are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStoreBackend {
    Postgres,
    /// Process-local store, lost on restart. Development only.
    Memory,
}

impl FromStr for TokenStoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(TokenStoreBackend::Postgres),
            "memory" | "in-memory" => Ok(TokenStoreBackend::Memory),
            other => Err(anyhow::anyhow!(
                "TOKEN_STORE must be 'postgres' or 'memory', got '{}'",
                other
            )),
        }
    }
}

/// HTTP server settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub http_concurrency_limit: usize,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    // Token store
    pub token_store: TokenStoreBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Base64-encoded 32-byte key. Tokens are stored in plaintext when unset.
    pub encryption_key: Option<String>,
    // Instagram Graph API
    pub graph_api_base: String,
    pub graph_api_timeout_secs: u64,
    pub insights_media_limit: usize,
    // Local LLM inference server
    pub ollama_url: String,
    pub ollama_model: String,
    pub ollama_timeout_secs: u64,
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            http_concurrency_limit: parse_env("HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT)
                .max(1),
        };

        let token_store = match non_empty_env("TOKEN_STORE") {
            Some(value) => value.parse()?,
            None => TokenStoreBackend::Postgres,
        };

        let config = Config {
            base,
            token_store,
            database_url: non_empty_env("DATABASE_URL"),
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: parse_env("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            encryption_key: non_empty_env("ENCRYPTION_KEY"),
            graph_api_base: non_empty_env("GRAPH_API_BASE")
                .unwrap_or_else(|| GRAPH_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            graph_api_timeout_secs: parse_env("GRAPH_API_TIMEOUT_SECS", GRAPH_API_TIMEOUT_SECS),
            insights_media_limit: parse_env("INSIGHTS_MEDIA_LIMIT", INSIGHTS_MEDIA_LIMIT),
            ollama_url: non_empty_env("OLLAMA_URL")
                .unwrap_or_else(|| OLLAMA_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            ollama_model: non_empty_env("OLLAMA_MODEL").unwrap_or_else(|| OLLAMA_MODEL.to_string()),
            ollama_timeout_secs: parse_env("OLLAMA_TIMEOUT_SECS", OLLAMA_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        match self.token_store {
            TokenStoreBackend::Postgres => match self.database_url.as_deref() {
                None => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be set when TOKEN_STORE=postgres"
                    ))
                }
                Some(url)
                    if !(url.starts_with("postgresql://") || url.starts_with("postgres://")) =>
                {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ));
                }
                Some(_) => {}
            },
            TokenStoreBackend::Memory => {
                if self.is_production() {
                    return Err(anyhow::anyhow!(
                        "TOKEN_STORE=memory is not allowed in production"
                    ));
                }
            }
        }

        if self.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS cannot be 0"));
        }

        if self.insights_media_limit == 0 || self.insights_media_limit > MAX_INSIGHTS_MEDIA_LIMIT {
            return Err(anyhow::anyhow!(
                "INSIGHTS_MEDIA_LIMIT must be between 1 and {}",
                MAX_INSIGHTS_MEDIA_LIMIT
            ));
        }

        if self.graph_api_timeout_secs == 0 || self.ollama_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "GRAPH_API_TIMEOUT_SECS and OLLAMA_TIMEOUT_SECS must be greater than 0"
            ));
        }

        for (name, url) in [
            ("GRAPH_API_BASE", &self.graph_api_base),
            ("OLLAMA_URL", &self.ollama_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!("{} must be an http(s) URL", name));
            }
        }

        Ok(())
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.base.http_concurrency_limit
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }
}
