//! Validate configuration command.

use anyhow::Result;
use std::path::Path;

use scanner_config::load_config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    match config_path {
        Some(path) => println!("Validating configuration: {}", path.display()),
        None => println!("Validating defaults plus SCANNER__ environment overrides"),
    }

    match load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Symbols: {}", config.engine.symbols.join(", "));
            println!("Initial capital: {}", config.engine.initial_capital);
            println!("Risk per trade: {}", config.money.risk_per_trade);
            println!("Max daily loss: {}", config.money.max_daily_loss);
            println!("Max daily trades: {}", config.money.max_daily_trades);
            println!(
                "Live data: {}",
                if config.live.api_key().is_some() {
                    "enabled"
                } else {
                    "disabled (simulated)"
                }
            );
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
