//! `accounts` and `config-path`: local config inspection, no AWS calls

use rds_inventory_core::Config;
use serde::Serialize;
use std::path::Path;

use crate::error::Result;
use crate::output::{self, OutputFormat};

#[derive(Serialize)]
struct AccountsView<'a> {
    accounts: &'a [rds_inventory_core::AccountDescriptor],
    regions: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    output_dir: Option<&'a Path>,
}

pub fn handle_accounts(config: &Config, output_format: OutputFormat) -> Result<()> {
    if output_format.is_table() {
        output::print_output(&config.accounts, OutputFormat::Table)?;
        println!("Regions: {}", config.regions.join(", "));
        if let Some(dir) = &config.output_dir {
            println!("Output directory: {}", dir.display());
        }
        return Ok(());
    }

    output::print_output(
        AccountsView {
            accounts: &config.accounts,
            regions: &config.regions,
            output_dir: config.output_dir.as_deref(),
        },
        output_format,
    )
}

pub fn handle_config_path(explicit: Option<&Path>, output_format: OutputFormat) -> Result<()> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => Config::config_path()?,
    };

    match output_format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let output_data = serde_json::json!({
                "config_path": config_path.to_str(),
                "exists": config_path.exists(),
            });
            output::print_output(&output_data, output_format)?;
        }
        OutputFormat::Table => {
            println!("{}", config_path.display());
        }
    }
    Ok(())
}

/// Load the config from `explicit` or the default location
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    let config = match explicit {
        Some(path) => {
            tracing::debug!("Loading config from explicit path: {:?}", path);
            if !path.exists() {
                tracing::warn!("Config file {} does not exist", path.display());
            }
            Config::load_from_path(path)?
        }
        None => {
            tracing::debug!("Loading config from default location");
            Config::load()?
        }
    };
    Ok(config)
}
