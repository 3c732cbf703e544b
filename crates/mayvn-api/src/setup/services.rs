//! Service initialization and application state setup

use crate::state::AppState;
use anyhow::{Context, Result};
use mayvn_core::{Config, EncryptionService};
use mayvn_db::create_account_store;
use mayvn_services::{
    AccountService, GraphApiClient, IdeaGenerator, InsightsAggregator, OllamaClient,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// Build the token store, upstream clients and services
pub fn initialize_services(config: &Config, pool: Option<PgPool>) -> Result<Arc<AppState>> {
    let store = create_account_store(config, pool).context("Failed to create token store")?;

    let encryption = config
        .encryption_key
        .as_deref()
        .map(EncryptionService::from_base64_key)
        .transpose()
        .context("Invalid ENCRYPTION_KEY")?;
    if encryption.is_none() {
        tracing::warn!("ENCRYPTION_KEY not set, access tokens will be stored unencrypted");
    }

    let graph = GraphApiClient::new(
        &config.graph_api_base,
        Duration::from_secs(config.graph_api_timeout_secs),
    )?;

    let ollama = OllamaClient::new(
        &config.ollama_url,
        &config.ollama_model,
        Duration::from_secs(config.ollama_timeout_secs),
    )?;

    tracing::info!(
        graph_api_base = %config.graph_api_base,
        ollama_model = %config.ollama_model,
        "Services initialized"
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        accounts: AccountService::new(store, encryption, graph.clone()),
        insights: InsightsAggregator::new(graph),
        ideas: IdeaGenerator::new(Arc::new(ollama)),
    }))
}
