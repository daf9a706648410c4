//! TechnoVE Core Library
//!
//! Shared types, models, and errors for TechnoVE charging stations.
//! This crate is used by both the async client library and the CLI.

pub mod api;
pub mod error;
pub mod station;

// Re-export commonly used types
pub use api::*;
pub use error::*;
pub use station::*;
