//! Unified error handling for rds-inventory-core
//!
//! Every variant here is fatal for the run. The one best-effort call (the
//! IAM alias lookup) never produces a `CoreError`; see
//! [`lookup_alias_best_effort`](crate::account::lookup_alias_best_effort).

use crate::config::ConfigError;
use crate::provider::ApiError;
use thiserror::Error;

/// Core error type for inventory runs
#[derive(Error, Debug)]
pub enum CoreError {
    /// STS GetCallerIdentity failed (missing/expired credentials, network)
    #[error("Failed to get caller identity for profile '{profile}': {source}")]
    Identity {
        profile: String,
        #[source]
        source: ApiError,
    },

    /// STS answered but without an account ID
    #[error("No account ID returned from STS GetCallerIdentity for profile '{profile}'")]
    MissingAccountId { profile: String },

    /// An RDS listing call failed
    #[error("{operation} failed in region {region}: {source}")]
    Listing {
        operation: &'static str,
        region: String,
        #[source]
        source: ApiError,
    },

    /// The provider handed back the marker it was just given
    #[error("{operation} in region {region} returned marker '{marker}' twice")]
    PaginationLoop {
        operation: &'static str,
        region: String,
        marker: String,
    },

    /// CSV encoding or writing failed
    #[error("Failed to write report to {path}: {source}")]
    Report {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// File-system error around the report file
    #[error("IO error for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Returns true if the error came from the RDS control plane
    #[must_use]
    pub fn is_listing(&self) -> bool {
        matches!(
            self,
            CoreError::Listing { .. } | CoreError::PaginationLoop { .. }
        )
    }

    /// The region being scanned when the error happened, if any
    pub fn region(&self) -> Option<&str> {
        match self {
            CoreError::Listing { region, .. } | CoreError::PaginationLoop { region, .. } => {
                Some(region)
            }
            _ => None,
        }
    }
}
