mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "polycal")]
#[command(about = "Aggregate events from many calendars into one, transforming them on the way")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync all sources into the target calendar
    Sync {
        /// Config file (defaults to .polycal/polycal.toml, then ~/.polycal/polycal.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Month to sync, as YYYY-MM (defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Show what would change without writing to the target calendar
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate the config and show each source's transforms
    Check {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List the available transform types
    Transforms,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Sync {
            config,
            month,
            dry_run,
        } => commands::sync::run(config.as_deref(), month.as_deref(), dry_run).await,
        Commands::Check { config } => commands::check::run(config.as_deref()),
        Commands::Transforms => {
            commands::transforms::run();
            Ok(())
        }
    }
}

/// `RUST_LOG` wins; otherwise the level follows `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
