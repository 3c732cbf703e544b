//! Data models for the application
//!
//! Organized by domain: Instagram Graph API shapes, connected accounts held in
//! the token store, and carousel ideas produced by the language model.

mod account;
mod idea;
mod instagram;

pub use account::*;
pub use idea::*;
pub use instagram::*;
