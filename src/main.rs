//! Opportunity scanner CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, LogLevel};
use scout_config::load_config;
use scout_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("configuration rejected")?;

    // CLI flags override the logging section
    let log_level = match cli.log_level {
        Some(LogLevel::Trace) => "trace",
        Some(LogLevel::Debug) => "debug",
        Some(LogLevel::Info) => "info",
        Some(LogLevel::Warn) => "warn",
        Some(LogLevel::Error) => "error",
        None => config.logging.level.as_str(),
    };
    let json_logs = cli.json_logs || config.logging.format == "json";
    // The guard flushes buffered file lines when main returns
    let _guard = setup_logging(log_level, json_logs, config.logging.file.as_deref());

    // Execute command
    match cli.command {
        Commands::Scan(args) => cli::commands::scan::run(args, config).await,
        Commands::Track => cli::commands::track::run(config).await,
        Commands::Backtest(args) => cli::commands::backtest::run(args, config).await,
        Commands::Optimize(args) => cli::commands::optimize::run(args, config).await,
        Commands::Validate(args) => cli::commands::validate::run(args, config).await,
    }
}
