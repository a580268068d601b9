//! Market scanner CLI application.

mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use logging::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level {
        cli::LogLevel::Trace => "trace",
        cli::LogLevel::Debug => "debug",
        cli::LogLevel::Info => "info",
        cli::LogLevel::Warn => "warn",
        cli::LogLevel::Error => "error",
    };
    setup_logging(log_level, cli.json_logs);

    match cli.command {
        Commands::Run(args) => cli::commands::run::run(args, cli.config.as_deref()).await,
        Commands::Scan(args) => cli::commands::scan::run(args, cli.config.as_deref()).await,
        Commands::Voters => cli::commands::voters::run().await,
        Commands::ValidateConfig => cli::commands::validate::run(cli.config.as_deref()).await,
    }
}
