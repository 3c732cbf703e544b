//! API constants

/// Prefix shared by every API route
pub const API_PREFIX: &str = "/api";
