//! # Hashledger Binary
//!
//! Reads JSON-lines invocations from stdin and writes one JSON reply per
//! line to stdout. Logs go to stderr.

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use hashledger_bin::{initialization, shim};
use hashledger_observe::{init_logging, LogConfig, LogFormat};
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(name = "hashledger")]
#[command(
    about = "Hash, setting and template records over an ordered key-value store",
    long_about = None
)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Log output format: pretty, compact or json (overrides config)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logging is not up yet; a load failure is reported after init_logging.
    let loaded = initialization::load_config(&args.config);
    let config = &loaded.config;

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        std::process::exit(1);
    }

    let format = match args.log_format {
        Some(format) => format,
        None => config.log_format.parse()?,
    };
    init_logging(LogConfig {
        format,
        filter: Some(config.logging.clone()),
        ..LogConfig::default()
    })?;

    loaded.report_fallback(Path::new(&args.config));
    tracing::info!(config = %args.config, "Starting hashledger");

    let dispatcher = initialization::build_dispatcher(&config.storage);

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    shim::serve(&dispatcher, stdin, stdout).await?;

    let metrics = dispatcher.metrics().snapshot();
    tracing::info!(
        reads = metrics.read_count,
        writes = metrics.write_count,
        read_errors = metrics.read_errors,
        write_errors = metrics.write_errors,
        rejected = metrics.rejected_count,
        "Shutting down"
    );

    Ok(())
}
