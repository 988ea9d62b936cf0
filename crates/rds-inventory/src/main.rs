use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, trace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands, ScanArgs};
use error::InventoryError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level
    init_tracing(cli.verbose)?;

    // Execute command
    if let Err(e) = execute_command(&cli).await {
        e.print_diagnostic();
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: u8) -> Result<()> {
    // Check for RUST_LOG env var first, then fall back to verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "rds_inventory=warn,rds_inventory_core=warn",
            1 => "rds_inventory=info,rds_inventory_core=info",
            2 => "rds_inventory=debug,rds_inventory_core=debug",
            _ => "rds_inventory=trace,rds_inventory_core=trace,aws_config=debug",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    debug!("Tracing initialized with verbosity level: {}", verbose);
    Ok(())
}

async fn execute_command(cli: &Cli) -> Result<(), InventoryError> {
    trace!("Executing command: {:?}", cli.command);
    info!(
        "Command: {}",
        cli.command.as_ref().map(Commands::name).unwrap_or("scan")
    );

    let start = std::time::Instant::now();
    let config_file = cli.config_file.as_deref();
    let result = match &cli.command {
        None => {
            let config = commands::config::load(config_file)?;
            commands::scan::handle_scan(config, &ScanArgs::default(), cli.output_format).await
        }
        Some(Commands::Scan(args)) => {
            let config = commands::config::load(config_file)?;
            commands::scan::handle_scan(config, args, cli.output_format).await
        }
        Some(Commands::Accounts) => {
            let config = commands::config::load(config_file)?;
            commands::config::handle_accounts(&config, cli.output_format)
        }
        Some(Commands::ConfigPath) => {
            commands::config::handle_config_path(config_file, cli.output_format)
        }
    };

    debug!("Command finished in {:?}", start.elapsed());
    result
}
