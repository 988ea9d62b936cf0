//! Configuration management for rds-inventory
//!
//! Handles configuration loading from files and environment variables.
//! Configuration is stored in TOML format:
//!
//! ```toml
//! regions = ["us-east-1", "sa-east-1"]
//! output_dir = "reports"
//!
//! [[accounts]]
//! profile = "account-dev"
//! alias = "dev"
//! ```

#[cfg(target_os = "macos")]
use directories::BaseDirs;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::{ConfigError, Result};

/// Regions scanned when the config file does not name any
pub const DEFAULT_REGIONS: &[&str] = &["us-east-1", "sa-east-1"];

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Accounts to scan, in report order
    #[serde(default)]
    pub accounts: Vec<AccountDescriptor>,
    /// Regions to scan within every account, in report order
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,
    /// Directory the timestamped report is written into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

/// One account to scan: an AWS credential profile plus a fallback alias
///
/// The alias is only used when the account has no alias registered in IAM.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccountDescriptor {
    /// Named profile from the shared AWS config/credentials files
    pub profile: String,
    /// Human-readable label for the account
    #[serde(default)]
    pub alias: String,
}

impl AccountDescriptor {
    pub fn new(profile: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            alias: alias.into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            regions: default_regions(),
            output_dir: None,
        }
    }
}

fn default_regions() -> Vec<String> {
    DEFAULT_REGIONS.iter().map(|r| r.to_string()).collect()
}

impl Config {
    /// Check that the config describes a runnable scan.
    ///
    /// Runs before any network call so that a typo in the config file never
    /// costs a partial scan.
    pub fn validate(&self) -> Result<()> {
        if self.accounts.is_empty() {
            return Err(ConfigError::NoAccounts {
                suggestion: format!(
                    "Add an [[accounts]] entry with a profile and alias to {}",
                    Self::config_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|_| "the config file".to_string())
                ),
            });
        }
        if self.regions.is_empty() {
            return Err(ConfigError::NoRegions);
        }

        let mut seen = HashSet::new();
        for (index, account) in self.accounts.iter().enumerate() {
            if account.profile.trim().is_empty() {
                return Err(ConfigError::EmptyProfile { index });
            }
            if !seen.insert(account.profile.as_str()) {
                return Err(ConfigError::DuplicateProfile {
                    profile: account.profile.clone(),
                });
            }
        }

        for (index, region) in self.regions.iter().enumerate() {
            if region.trim().is_empty() {
                return Err(ConfigError::EmptyRegion { index });
            }
        }

        Ok(())
    }

    /// Restrict the configured accounts to the named profiles.
    ///
    /// Configured order is kept regardless of the order of `profiles`. An
    /// empty filter keeps every account.
    pub fn retain_profiles(&mut self, profiles: &[String]) -> Result<()> {
        if profiles.is_empty() {
            return Ok(());
        }
        for name in profiles {
            if !self.accounts.iter().any(|a| &a.profile == name) {
                return Err(ConfigError::ProfileNotFound { name: name.clone() });
            }
        }
        self.accounts.retain(|a| profiles.contains(&a.profile));
        Ok(())
    }

    /// Replace the configured regions, unless `regions` is empty
    pub fn override_regions(&mut self, regions: &[String]) {
        if !regions.is_empty() {
            self.regions = regions.to_vec();
        }
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        // Expand environment variables in the config content
        let expanded_content = Self::expand_env_vars(&content);

        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    /// Get the path to the configuration file
    ///
    /// On macOS, this supports both the standard macOS path and Linux-style ~/.config path:
    /// 1. Check ~/.config/rds-inventory/config.toml (Linux-style, preferred for consistency)
    /// 2. Fall back to ~/Library/Application Support/io.rds-inventory.rds-inventory/config.toml
    ///
    /// On Linux: ~/.config/rds-inventory/config.toml
    /// On Windows: %APPDATA%\rds-inventory\rds-inventory\config\config.toml
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if let Some(base_dirs) = BaseDirs::new() {
                let linux_style_path = base_dirs
                    .home_dir()
                    .join(".config")
                    .join("rds-inventory")
                    .join("config.toml");

                if linux_style_path
                    .parent()
                    .map(|p| p.exists())
                    .unwrap_or(false)
                {
                    return Ok(linux_style_path);
                }
            }
        }

        let proj_dirs = ProjectDirs::from("io", "rds-inventory", "rds-inventory")
            .ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand environment variables in configuration content
    ///
    /// Supports ${VAR} and ${VAR:-default} syntax. Unset variables without a
    /// default are left as-is.
    ///
    /// Example:
    /// ```toml
    /// [[accounts]]
    /// profile = "${PROD_PROFILE:-account-prod}"
    /// alias = "prod"
    /// ```
    fn expand_env_vars(content: &str) -> String {
        let expanded =
            shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok());
        expanded.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_config() -> Config {
        Config {
            accounts: vec![
                AccountDescriptor::new("account-dev", "dev"),
                AccountDescriptor::new("account-staging", "staging"),
                AccountDescriptor::new("account-prod", "prod"),
            ],
            regions: vec!["us-east-1".to_string(), "sa-east-1".to_string()],
            output_dir: None,
        }
    }

    #[test]
    fn test_config_serialization() {
        let config = sample_config();

        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_parse_account_table_array() {
        let content = r#"
regions = ["eu-west-1"]
output_dir = "reports"

[[accounts]]
profile = "account-dev"
alias = "dev"

[[accounts]]
profile = "account-prod"
alias = "prod"
"#;
        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.regions, vec!["eu-west-1"]);
        assert_eq!(config.output_dir, Some(PathBuf::from("reports")));
        assert_eq!(
            config.accounts,
            vec![
                AccountDescriptor::new("account-dev", "dev"),
                AccountDescriptor::new("account-prod", "prod"),
            ]
        );
    }

    #[test]
    fn test_regions_default_when_omitted() {
        let content = r#"
[[accounts]]
profile = "account-dev"
alias = "dev"
"#;
        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.regions, vec!["us-east-1", "sa-east-1"]);
    }

    #[test]
    fn test_alias_defaults_to_empty() {
        let content = r#"
[[accounts]]
profile = "account-dev"
"#;
        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.accounts[0].alias, "");
    }

    #[test]
    #[serial_test::serial]
    fn test_env_var_expansion() {
        unsafe {
            std::env::set_var("TEST_RDS_PROFILE", "account-from-env");
        }

        let content = r#"
[[accounts]]
profile = "${TEST_RDS_PROFILE}"
alias = "dev"
"#;

        let expanded = Config::expand_env_vars(content);
        assert!(expanded.contains("account-from-env"));

        unsafe {
            std::env::remove_var("TEST_RDS_PROFILE");
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_env_var_expansion_with_defaults() {
        unsafe {
            std::env::remove_var("NONEXISTENT_RDS_PROFILE");
        }

        let content = r#"
[[accounts]]
profile = "${NONEXISTENT_RDS_PROFILE:-account-prod}"
alias = "prod"
"#;

        let expanded = Config::expand_env_vars(content);
        assert!(expanded.contains("account-prod"));
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_accounts() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NoAccounts { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_regions() {
        let mut config = sample_config();
        config.regions.clear();
        assert!(matches!(config.validate(), Err(ConfigError::NoRegions)));
    }

    #[test]
    fn test_validate_rejects_blank_profile() {
        let mut config = sample_config();
        config.accounts[1].profile = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyProfile { index: 1 })
        ));
    }

    #[test]
    fn test_validate_rejects_blank_region() {
        let mut config = sample_config();
        config.regions.push(String::new());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyRegion { index: 2 })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_profile() {
        let mut config = sample_config();
        config
            .accounts
            .push(AccountDescriptor::new("account-dev", "dev-again"));
        match config.validate() {
            Err(ConfigError::DuplicateProfile { profile }) => assert_eq!(profile, "account-dev"),
            other => panic!("expected duplicate profile error, got {:?}", other),
        }
    }

    #[test]
    fn test_retain_profiles_keeps_configured_order() {
        let mut config = sample_config();
        config
            .retain_profiles(&["account-prod".to_string(), "account-dev".to_string()])
            .unwrap();
        let profiles: Vec<_> = config.accounts.iter().map(|a| a.profile.as_str()).collect();
        assert_eq!(profiles, vec!["account-dev", "account-prod"]);
    }

    #[test]
    fn test_retain_profiles_unknown_profile() {
        let mut config = sample_config();
        let err = config
            .retain_profiles(&["account-qa".to_string()])
            .unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound { name } if name == "account-qa"));
        assert_eq!(config.accounts.len(), 3);
    }

    #[test]
    fn test_retain_profiles_empty_filter_is_noop() {
        let mut config = sample_config();
        config.retain_profiles(&[]).unwrap();
        assert_eq!(config, sample_config());
    }

    #[test]
    fn test_override_regions() {
        let mut config = sample_config();
        config.override_regions(&[]);
        assert_eq!(config.regions, vec!["us-east-1", "sa-east-1"]);

        config.override_regions(&["ap-southeast-2".to_string()]);
        assert_eq!(config.regions, vec!["ap-southeast-2"]);
    }
}
