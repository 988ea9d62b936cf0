//! CLI structure and command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Inventory of RDS instances and clusters across AWS accounts and regions
#[derive(Parser, Debug)]
#[command(name = "rds-inventory")]
#[command(
    version,
    about = "Inventory RDS instances and clusters across AWS accounts and regions"
)]
#[command(long_about = "
Inventory RDS instances and clusters across AWS accounts and regions

Every configured account (an AWS credential profile) is scanned in every
configured region. The result is one CSV file with a row per DB instance,
per cluster writer endpoint and per cluster reader endpoint.

EXAMPLES:
    # Scan everything in the config file
    rds-inventory

    # Scan only two regions, writing to a fixed path
    rds-inventory scan --region us-east-1 --region eu-west-1 --output rds.csv

    # Scan one account and print the summary as JSON
    rds-inventory scan --profile account-dev -o json

    # Show what would be scanned
    rds-inventory accounts

CONFIGURATION:
    accounts and regions are read from a TOML file, see `rds-inventory config-path`:

    regions = [\"us-east-1\", \"sa-east-1\"]

    [[accounts]]
    profile = \"account-dev\"
    alias = \"dev\"
")]
pub struct Cli {
    /// Path to alternate configuration file
    #[arg(long, global = true, env = "RDS_INVENTORY_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Output format for summaries and listings
    #[arg(
        long = "output-format",
        short = 'o',
        global = true,
        value_enum,
        default_value = "table"
    )]
    pub output_format: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan all configured accounts and regions and write the CSV report (default)
    #[command(after_help = "EXAMPLES:
    # Write rds_inventory_<timestamp>.csv into ./reports
    rds-inventory scan --output-dir reports

    # Override the configured regions
    rds-inventory scan --region us-east-1 --region sa-east-1

    # Restrict to some of the configured accounts
    rds-inventory scan --profile account-dev --profile account-prod
")]
    Scan(ScanArgs),

    /// List configured accounts and regions without calling AWS
    Accounts,

    /// Print the path of the configuration file
    #[command(name = "config-path")]
    ConfigPath,
}

/// Arguments for `scan`
#[derive(Args, Debug, Default, Clone)]
pub struct ScanArgs {
    /// Write the report to this exact path
    #[arg(long, conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Directory for the timestamped report (overrides `output_dir` in the config)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Region to scan; repeat to scan several (overrides the configured regions)
    #[arg(long = "region", value_name = "REGION")]
    pub regions: Vec<String>,

    /// Configured profile to scan; repeat to scan several (default: all)
    #[arg(long = "profile", value_name = "PROFILE")]
    pub profiles: Vec<String>,
}

impl Commands {
    /// Short command name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Scan(_) => "scan",
            Commands::Accounts => "accounts",
            Commands::ConfigPath => "config-path",
        }
    }
}
