//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scanner")]
#[command(author, version, about = "Autonomous market-scanning decision engine")]
pub struct Cli {
    /// Configuration file path (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

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
    /// Run the scan loop until interrupted
    Run(RunArgs),
    /// Run a single scan tick and print the signals
    Scan(ScanArgs),
    /// List the available voters and their default weights
    Voters,
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Symbols to scan (comma-separated; overrides config)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Initial capital (overrides config)
    #[arg(long)]
    pub capital: Option<f64>,
}

#[derive(clap::Args)]
pub struct ScanArgs {
    /// Symbols to scan (comma-separated; overrides config)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Print signals as JSON
    #[arg(long)]
    pub json: bool,
}
