//! TechnoVE CLI Library
//!
//! This library provides the core functionality for the technovectl tool.
//! The station client itself lives in the [`technove`] crate; this crate
//! adds argument parsing, configuration handling, and output formatting
//! on top of it.
//!
//! # Public API
//!
//! Configuration types are available via [`config::CliConfig`] and
//! [`config::ConfigBuilder`]. Everything else is CLI plumbing.

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// Configuration types for the CLI tool.
pub mod config;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;
