//! Repositories for the connected-account token store
//!
//! `ConnectedAccountStore` abstracts the backend; `create_account_store` picks
//! one from configuration.

pub mod account;
pub mod memory;

pub use account::{ConnectedAccountStore, PostgresConnectedAccountRepository};
pub use memory::InMemoryConnectedAccountStore;

use mayvn_core::{AppError, Config, TokenStoreBackend};
use sqlx::PgPool;
use std::sync::Arc;

/// Factory function to create the token store selected by `TOKEN_STORE`
pub fn create_account_store(
    config: &Config,
    postgres_pool: Option<PgPool>,
) -> Result<Arc<dyn ConnectedAccountStore>, AppError> {
    match (config.token_store, postgres_pool) {
        (TokenStoreBackend::Postgres, Some(pool)) => {
            tracing::info!("Initializing PostgreSQL connected-account store");
            Ok(Arc::new(PostgresConnectedAccountRepository::new(pool)))
        }
        (TokenStoreBackend::Postgres, None) => Err(anyhow::anyhow!(
            "TOKEN_STORE=postgres requires a database connection pool"
        )
        .into()),
        (TokenStoreBackend::Memory, _) => {
            tracing::warn!("Using in-memory connected-account store; tokens are lost on restart");
            Ok(Arc::new(InMemoryConnectedAccountStore::new()))
        }
    }
}
