//! PennyPlan command-line entry point.

mod cli;
mod commands;
mod logging;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use cli::{Cli, Commands};
use pennyplan_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load_from(&cli.config_dir)
        .with_context(|| format!("failed to load configuration from {}", cli.config_dir.display()))?;

    logging::init(&config.log).context("failed to initialize logging")?;
    debug!(config_dir = %cli.config_dir.display(), "configuration loaded");

    let output = match cli.command {
        Commands::Plan(args) => commands::plan::run(&args, &config)?,
        Commands::Report(args) => commands::report::run(&args, &config).await?,
    };

    println!("{output}");
    Ok(())
}
