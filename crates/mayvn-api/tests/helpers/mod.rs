//! Test helpers: build AppState and router for integration tests.
//!
//! The token store is in memory; the Graph API and Ollama are mockito servers.

pub mod fixtures;

use axum_test::TestServer;
use mayvn_api::constants;
use mayvn_api::setup::routes;
use mayvn_api::state::AppState;
use mayvn_core::{BaseConfig, Config, EncryptionService, TokenStoreBackend};
use mayvn_db::InMemoryConnectedAccountStore;
use mayvn_services::{
    AccountService, GraphApiClient, IdeaGenerator, InsightsAggregator, OllamaClient,
};
use mockito::{Server, ServerGuard};
use std::sync::Arc;
use std::time::Duration;

/// Base64 of a 32-byte test key
pub const TEST_ENCRYPTION_KEY: &str = "MDEyMzQ1Njc4OTAxMjM0NTY3ODkwMTIzNDU2Nzg5MDE=";

/// API path prefix for tests (e.g. `/api/instagram/insights`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server, upstream mocks and the backing store.
pub struct TestApp {
    pub server: TestServer,
    pub graph: ServerGuard,
    pub ollama: ServerGuard,
    pub store: Arc<InMemoryConnectedAccountStore>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn create_test_config(graph_url: &str, ollama_url: &str) -> Config {
    Config {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
            http_concurrency_limit: 100,
        },
        token_store: TokenStoreBackend::Memory,
        database_url: None,
        db_max_connections: 5,
        db_timeout_seconds: 5,
        encryption_key: Some(TEST_ENCRYPTION_KEY.to_string()),
        graph_api_base: graph_url.to_string(),
        graph_api_timeout_secs: 5,
        insights_media_limit: 25,
        ollama_url: ollama_url.to_string(),
        ollama_model: "qwen2.5:1.5b".to_string(),
        ollama_timeout_secs: 5,
    }
}

/// Setup test app with an empty in-memory store and fresh upstream mocks.
pub async fn setup_test_app() -> TestApp {
    let graph = Server::new_async().await;
    let ollama = Server::new_async().await;
    let config = create_test_config(&graph.url(), &ollama.url());

    let store = Arc::new(InMemoryConnectedAccountStore::new());
    let encryption =
        EncryptionService::from_base64_key(TEST_ENCRYPTION_KEY).expect("valid test key");
    let graph_client = GraphApiClient::new(&config.graph_api_base, Duration::from_secs(5))
        .expect("Failed to create Graph API client");
    let ollama_client = OllamaClient::new(
        &config.ollama_url,
        &config.ollama_model,
        Duration::from_secs(5),
    )
    .expect("Failed to create Ollama client");

    let state = Arc::new(AppState {
        config: config.clone(),
        accounts: AccountService::new(store.clone(), Some(encryption), graph_client.clone()),
        insights: InsightsAggregator::new(graph_client),
        ideas: IdeaGenerator::new(Arc::new(ollama_client)),
    });

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        graph,
        ollama,
        store,
    }
}
