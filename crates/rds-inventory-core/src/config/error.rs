//! Error types for configuration operations

use thiserror::Error;

/// Errors that can occur during configuration operations
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config from {path}: {source}")]
    LoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("No accounts configured. {suggestion}")]
    NoAccounts { suggestion: String },

    #[error("No regions configured")]
    NoRegions,

    #[error("Account entry #{index} has an empty profile")]
    EmptyProfile { index: usize },

    #[error("Region entry #{index} is empty")]
    EmptyRegion { index: usize },

    #[error("Profile '{profile}' is configured more than once")]
    DuplicateProfile { profile: String },

    #[error("Profile '{name}' is not configured")]
    ProfileNotFound { name: String },

    #[error("Failed to determine config directory")]
    ConfigDirError,
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
