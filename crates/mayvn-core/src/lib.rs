//! Mayvn Core Library
//!
//! This crate provides core domain models, error types, configuration, and token
//! encryption that are shared across all Mayvn components.

pub mod config;
pub mod encryption;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, TokenStoreBackend};
pub use encryption::EncryptionService;
pub use error::{AppError, ErrorMetadata, LogLevel};
