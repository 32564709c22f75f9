// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use tracing::error;

use warren::config::Config;

#[derive(Debug, Parser)]
#[command(name = "warren", about = "Controller for a fleet of block-world mining agents")]
struct CliArgs {
    /// Path to the YAML config file.
    #[arg(short, long, default_value = "config.yml", env = "WARREN_CONFIG")]
    config: std::path::PathBuf,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load config: {e:#}");
            std::process::exit(1);
        }
    };

    let default_filter = if args.verbose || config.debug.enabled { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    tracing::info!(
        name = %config.info.name,
        author = %config.info.author,
        "starting controller"
    );

    if let Err(e) = warren::run(config).await {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}
