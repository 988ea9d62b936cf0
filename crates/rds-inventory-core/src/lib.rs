//! # rds-inventory-core
//!
//! Enumerates RDS database instances and Aurora/RDS clusters across a list of
//! AWS accounts (credential profiles) and regions, and writes them as one
//! flat CSV report.
//!
//! A run has three stages, strictly in sequence:
//!
//! 1. **Account resolution** ([`account`]) - STS caller identity (fatal on
//!    failure) and the IAM account alias (best-effort).
//! 2. **Resource listing** ([`resources`]) - paginated DescribeDBInstances and
//!    DescribeDBClusters per region, normalized into [`ResourceRecord`]s.
//! 3. **Report writing** ([`report`]) - fixed ten-column CSV.
//!
//! [`run::run_inventory`] drives stages 1 and 2 over the config; the caller
//! writes the result with [`report::write_report`].
//!
//! ```rust,ignore
//! use rds_inventory_core::{aws::AwsProvider, report, run_inventory, Config};
//!
//! let config = Config::load()?;
//! let provider = AwsProvider::new(&config.regions[0]);
//! let inventory = run_inventory(&provider, &config, None).await?;
//! report::write_report(&path, &inventory.rows)?;
//! ```
//!
//! The cloud API sits behind the traits in [`provider`], with the AWS SDK
//! implementation in [`aws`].

pub mod account;
pub mod aws;
pub mod config;
pub mod error;
pub mod progress;
pub mod provider;
pub mod report;
pub mod resources;
pub mod run;

pub use account::{AccountIdentity, lookup_alias_best_effort, resolve_account};
pub use config::{AccountDescriptor, Config, ConfigError};
pub use error::{CoreError, Result};
pub use progress::{ProgressCallback, ProgressEvent};
pub use report::{COLUMNS, ReportRow, write_report};
pub use resources::{ResourceKind, ResourceRecord, list_resources};
pub use run::{Inventory, RegionTally, run_inventory};
