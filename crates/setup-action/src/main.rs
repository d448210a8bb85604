//! GitHub Actions entry point for the SurrealDB release installer.
//!
//! Reads the action inputs from the runner environment (optionally overridden
//! on the command line), runs the installation, and reports the outcome
//! through the runner's output files. Every failure is caught here and
//! reported as a single `::error::` workflow command with a non-zero exit.

use anyhow::Result;
use clap::Parser;
use surrealdb_setup::{HttpDownloader, HttpTransport, Installer, SetupConfig};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "surrealdb-setup-action")]
#[command(about = "Install a SurrealDB release and expose it to the workflow")]
struct Args {
    /// Requested version; overrides the `version` input (default "latest")
    #[arg(long)]
    version: Option<String>,

    /// Retry budget for a rate-limited release index; overrides the
    /// `retry-count` input
    #[arg(long)]
    retry_count: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let mut config = SetupConfig::from_env();
    if let Some(version) = args.version {
        config.version = version;
    }
    if args.retry_count.is_some() {
        config.retry_count = args.retry_count;
    }

    if let Err(error) = run(config).await {
        println!("::error::{error}");
        std::process::exit(1);
    }
}

async fn run(config: SetupConfig) -> Result<()> {
    let transport = HttpTransport::new()?;
    let downloader = HttpDownloader::new()?;

    let result = Installer::new(config, transport, downloader)
        .install()
        .await?;

    info!(
        "SurrealDB {} available at {} (cache hit: {})",
        result.version,
        result.path.display(),
        result.cache_hit
    );
    Ok(())
}
