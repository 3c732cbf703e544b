//! Mayvn database layer
//!
//! Token store for connected Instagram accounts, backed by PostgreSQL or by a
//! process-local map for development and tests.

pub mod db;

pub use db::{
    create_account_store, ConnectedAccountStore, InMemoryConnectedAccountStore,
    PostgresConnectedAccountRepository,
};
