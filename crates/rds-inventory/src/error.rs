//! Error types for rds-inventory
//!
//! Wraps the core errors with user-facing suggestions and prints them as
//! cargo-style diagnostics.

use colored::Colorize;
use rds_inventory_core::{ConfigError, CoreError};
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: Failed to get caller identity for profile 'account-dev': ...
///
///   tip: refresh the session for the profile:
///       aws sso login --profile account-dev
/// ```
pub struct CliDiagnostic {
    message: String,
    tips: Vec<(String, Vec<String>)>,
}

impl CliDiagnostic {
    /// Start a new error diagnostic with the given message.
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            tips: Vec::new(),
        }
    }

    /// Add a tip with optional example commands.
    pub fn tip(mut self, description: &str, commands: &[String]) -> Self {
        self.tips.push((description.to_string(), commands.to_vec()));
        self
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        for (description, commands) in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", description);
            for cmd in commands {
                eprintln!("      {}", cmd);
            }
        }
    }
}

/// Main error type for the rds-inventory binary
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(CoreError),

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for rds-inventory commands
pub type Result<T> = std::result::Result<T, InventoryError>;

/// A suggestion line plus the commands that act on it
pub type Suggestion = (String, Vec<String>);

impl InventoryError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<Suggestion> {
        match self {
            InventoryError::Config(err) | InventoryError::Core(CoreError::Config(err)) => {
                config_suggestions(err)
            }
            InventoryError::Core(err) => core_suggestions(err),
            InventoryError::OutputError { .. } => vec![(
                "Retry with another output format".to_string(),
                vec!["rds-inventory -o table".to_string()],
            )],
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&self.to_string());

        for (suggestion, commands) in self.suggestions() {
            diag = diag.tip(&suggestion, &commands);
        }

        diag.print();
    }
}

fn config_suggestions(err: &ConfigError) -> Vec<Suggestion> {
    match err {
        ConfigError::NoAccounts { .. } => vec![
            (
                "Find the config file to edit:".to_string(),
                vec!["rds-inventory config-path".to_string()],
            ),
            (
                "Or point at another config file:".to_string(),
                vec!["rds-inventory --config-file ./accounts.toml".to_string()],
            ),
        ],
        ConfigError::NoRegions | ConfigError::EmptyRegion { .. } => vec![(
            "Set regions in the config file or pass them on the command line:".to_string(),
            vec!["rds-inventory scan --region us-east-1 --region sa-east-1".to_string()],
        )],
        ConfigError::ProfileNotFound { .. } => vec![(
            "List the configured accounts:".to_string(),
            vec!["rds-inventory accounts".to_string()],
        )],
        ConfigError::ParseError(_)
        | ConfigError::EmptyProfile { .. }
        | ConfigError::DuplicateProfile { .. } => vec![(
            "Check the config file syntax and account entries".to_string(),
            vec!["rds-inventory config-path".to_string()],
        )],
        ConfigError::LoadError { path, .. } => vec![(
            format!("Check that {} is readable", path),
            Vec::new(),
        )],
        ConfigError::ConfigDirError => vec![(
            "Pass the config file explicitly with --config-file".to_string(),
            Vec::new(),
        )],
    }
}

fn core_suggestions(err: &CoreError) -> Vec<Suggestion> {
    match err {
        CoreError::Identity { profile, .. } => vec![
            (
                "Check that the profile has working credentials:".to_string(),
                vec![format!("aws sts get-caller-identity --profile {}", profile)],
            ),
            (
                "For SSO profiles, refresh the session:".to_string(),
                vec![format!("aws sso login --profile {}", profile)],
            ),
        ],
        CoreError::MissingAccountId { profile } => vec![(
            "Check the profile's role configuration".to_string(),
            vec![format!("aws configure list --profile {}", profile)],
        )],
        CoreError::Report { path, .. } | CoreError::Io { path, .. } => vec![(
            format!("Check that {} is writable", path),
            vec!["rds-inventory scan --output <path>".to_string()],
        )],
        CoreError::Config(err) => config_suggestions(err),
        _ if err.is_listing() => listing_suggestions(err),
        _ => Vec::new(),
    }
}

fn listing_suggestions(err: &CoreError) -> Vec<Suggestion> {
    let region = err.region().unwrap_or("the region");
    let mut tips = Vec::new();
    if matches!(err, CoreError::PaginationLoop { .. }) {
        tips.push((
            "Retry the scan; the listing returned a repeated page marker".to_string(),
            Vec::new(),
        ));
    }
    tips.push((
        "Make sure the credentials allow rds:DescribeDBInstances and rds:DescribeDBClusters"
            .to_string(),
        Vec::new(),
    ));
    tips.push((
        format!("Skip {} if it is not enabled for the account:", region),
        vec!["rds-inventory scan --region <region> ...".to_string()],
    ));
    tips
}

impl From<CoreError> for InventoryError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config(config) => InventoryError::Config(config),
            other => InventoryError::Core(other),
        }
    }
}

impl From<serde_json::Error> for InventoryError {
    fn from(err: serde_json::Error) -> Self {
        InventoryError::OutputError {
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<serde_yaml::Error> for InventoryError {
    fn from(err: serde_yaml::Error) -> Self {
        InventoryError::OutputError {
            message: format!("YAML error: {}", err),
        }
    }
}
