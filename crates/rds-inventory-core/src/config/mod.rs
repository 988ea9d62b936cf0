//! Configuration for inventory runs
//!
// Allow nested config module - this is intentional for the config subsystem

#![allow(clippy::module_inception)]
//!
//! The config file lists the accounts (AWS credential profile plus a
//! human-readable fallback alias) and the regions to scan. It is stored as
//! TOML at a platform-specific location, with `${VAR}` expansion.

pub mod config;
pub mod error;

// Re-export main types for convenience
pub use config::{AccountDescriptor, Config, DEFAULT_REGIONS};
pub use error::{ConfigError, Result};
