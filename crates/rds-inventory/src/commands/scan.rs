//! `scan`: walk every account and region, then write the CSV report

use chrono::{DateTime, Utc};
use comfy_table::Table;
use rds_inventory_core::aws::AwsProvider;
use rds_inventory_core::report::{self, report_path};
use rds_inventory_core::{Config, Inventory, ProgressCallback, ProgressEvent, RegionTally};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::ScanArgs;
use crate::error::Result;
use crate::output::{self, OutputFormat};

/// Machine-readable result of a scan
#[derive(Debug, Serialize)]
pub struct ScanSummary {
    pub report: PathBuf,
    pub started_at: DateTime<Utc>,
    pub rows: usize,
    pub regions: Vec<RegionTally>,
}

pub async fn handle_scan(
    mut config: Config,
    args: &ScanArgs,
    output_format: OutputFormat,
) -> Result<()> {
    config.retain_profiles(&args.profiles)?;
    config.override_regions(&args.regions);
    config.validate()?;

    let started = Utc::now();
    let destination = report_destination(args, &config, started);

    let provider = AwsProvider::default();

    let inventory = rds_inventory_core::run_inventory(
        &provider,
        &config,
        Some(console_progress(output_format)),
    )
    .await?;

    report::write_report(&destination, &inventory.rows)?;
    info!(path = %destination.display(), rows = inventory.len(), "Scan complete");

    let summary = ScanSummary {
        report: destination,
        started_at: started,
        rows: inventory.len(),
        regions: inventory.tallies(),
    };

    if output_format.is_table() {
        print_summary_table(&summary, &inventory);
        Ok(())
    } else {
        output::print_output(&summary, output_format)
    }
}

/// `--output`, else the timestamped name inside `--output-dir`, the
/// configured `output_dir`, or the working directory
pub fn report_destination(args: &ScanArgs, config: &Config, started: DateTime<Utc>) -> PathBuf {
    if let Some(path) = &args.output {
        return path.clone();
    }
    let dir = args
        .output_dir
        .as_deref()
        .or(config.output_dir.as_deref())
        .unwrap_or(Path::new("."));
    report_path(dir, started)
}

/// Progress lines go to stdout for table output and to stderr otherwise,
/// keeping stdout parseable for json/yaml.
fn console_progress(output_format: OutputFormat) -> ProgressCallback {
    let to_stdout = output_format.is_table();
    Box::new(move |event| {
        let line = match event {
            ProgressEvent::AccountStarted { profile } => {
                format!("Collecting RDS data from profile: {}", profile)
            }
            ProgressEvent::RegionStarted { region, .. } => format!("  - Region: {}", region),
            ProgressEvent::AccountResolved { .. } | ProgressEvent::RegionCompleted { .. } => {
                return;
            }
        };
        if to_stdout {
            println!("{}", line);
        } else {
            eprintln!("{}", line);
        }
    })
}

fn print_summary_table(summary: &ScanSummary, inventory: &Inventory) {
    println!();
    println!("Inventory written to: {}", summary.report.display());

    if inventory.is_empty() {
        println!("No RDS instances or clusters found");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Profile",
        "Alias",
        "Account",
        "Region",
        "Instances",
        "Cluster writers",
        "Cluster readers",
    ]);
    for tally in &summary.regions {
        table.add_row(vec![
            tally.account_profile.clone(),
            tally.account_alias.clone(),
            tally.account_id.clone(),
            tally.region.clone(),
            tally.instances.to_string(),
            tally.cluster_writers.to_string(),
            tally.cluster_readers.to_string(),
        ]);
    }
    println!("{}", table);
    println!("{} rows", summary.rows);
}
