//! Appfile Core Library
//!
//! This crate provides the pieces shared by the Appfile adapter and CLI:
//! the adapter settings and their loader, and the top-level error type.

pub mod config;
pub mod error;

pub use config::{AdapterConfig, ConfigLoader};
pub use error::{Error, Result};

/// Appfile version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
