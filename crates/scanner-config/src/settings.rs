//! Configuration structures.

use rust_decimal::Decimal;
use scanner_risk::MoneyConfig;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub money: MoneyConfig,
    #[serde(default)]
    pub live: LiveApiConfig,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "scanner".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Scan loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Symbol universe scanned each tick
    pub symbols: Vec<String>,
    /// Starting capital
    pub initial_capital: Decimal,
    /// Candle window fetched per symbol
    pub candle_count: usize,
    /// Seconds between scans during market hours
    pub active_scan_secs: u64,
    /// Seconds between checks while the market is closed
    pub closed_check_secs: u64,
    /// Signal ring buffer capacity
    pub signal_log_capacity: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        use rust_decimal_macros::dec;
        Self {
            symbols: vec![
                "RELIANCE".to_string(),
                "TCS".to_string(),
                "HDFCBANK".to_string(),
                "INFY".to_string(),
                "ICICIBANK".to_string(),
                "HINDUNILVR".to_string(),
                "ITC".to_string(),
                "SBIN".to_string(),
                "BHARTIARTL".to_string(),
                "KOTAKBANK".to_string(),
            ],
            initial_capital: dec!(100000),
            candle_count: 100,
            active_scan_secs: 5,
            closed_check_secs: 60,
            signal_log_capacity: 500,
        }
    }
}

/// Live brokerage API settings.
///
/// The engine runs against live data only when the environment variable
/// named by `api_key_env` is set; otherwise it simulates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveApiConfig {
    pub api_key_env: String,
    pub base_url: String,
    pub interval: String,
}

impl Default for LiveApiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "SCANNER_API_KEY".to_string(),
            base_url: "https://api.groww.in".to_string(),
            interval: "5minute".to_string(),
        }
    }
}

impl LiveApiConfig {
    /// The live API key, when configured in the environment.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok().filter(|k| !k.is_empty())
    }
}
