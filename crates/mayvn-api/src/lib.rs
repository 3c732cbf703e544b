//! Mayvn API Library
//!
//! HTTP handlers, middleware and application setup for the insights and
//! idea-generation endpoints.

mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
pub mod setup;
mod telemetry;

pub mod error;
pub mod state;

pub use error::ErrorResponse;
