//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scout")]
#[command(author, version, about = "Crypto market opportunity scanner with forward testing")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (overrides the configured level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the market for opportunities
    Scan(ScanArgs),
    /// Resolve open forward-test trades once
    Track,
    /// Backtest the strategy over historical candles
    Backtest(BacktestArgs),
    /// Search the strategy parameter grid
    Optimize(OptimizeArgs),
    /// Validate configuration and print the effective snapshot
    Validate(ValidateArgs),
}

#[derive(clap::Args)]
pub struct ScanArgs {
    /// Keep scanning on the configured interval instead of exiting
    /// after one cycle
    #[arg(long)]
    pub watch: bool,

    /// Skip the forward-test tracking pass
    #[arg(long)]
    pub no_track: bool,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    /// Symbols to test (top-volume pairs when omitted)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Historical days to replay
    #[arg(long)]
    pub days: Option<i64>,

    /// Number of top-volume pairs when no symbols are given
    #[arg(long)]
    pub limit: Option<usize>,

    /// CSV candle directory to run against instead of the live venue
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,

    /// Save the JSON report to a file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct OptimizeArgs {
    /// CSV candle directory to run against instead of the live venue
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Save the ranked grid as JSON to a file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Print the full effective configuration as TOML
    #[arg(long)]
    pub toml: bool,
}
