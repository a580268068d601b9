//! CLI command implementations.

pub mod run;
pub mod scan;
pub mod validate;
pub mod voters;

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use scanner_config::AppConfig;
use scanner_core::traits::MarketDataSource;
use scanner_core::types::EngineMode;
use scanner_data::{LiveConfig, LiveDataSource, SimulatedDataSource};
use scanner_engine::{Engine, EngineConfig};
use scanner_ledger::{MemoryStrategyStore, MemoryTradeStore};
use scanner_risk::MoneyManager;

/// Build an engine from configuration plus CLI overrides.
///
/// Live data is used when the configured API key env var is set;
/// otherwise the simulated source.
pub fn build_engine(
    config: &AppConfig,
    symbols_override: &[String],
    capital_override: Option<f64>,
) -> anyhow::Result<Engine> {
    let symbols = if symbols_override.is_empty() {
        config.engine.symbols.clone()
    } else {
        symbols_override.to_vec()
    };

    let initial_capital = match capital_override {
        Some(capital) => Decimal::from_f64(capital)
            .ok_or_else(|| anyhow::anyhow!("invalid capital: {capital}"))?,
        None => config.engine.initial_capital,
    };

    let (data, mode): (Arc<dyn MarketDataSource>, EngineMode) = match config.live.api_key() {
        Some(api_key) => {
            let live = LiveConfig {
                base_url: config.live.base_url.clone(),
                api_key,
                interval: config.live.interval.clone(),
            };
            (Arc::new(LiveDataSource::new(live)?), EngineMode::Live)
        }
        None => (Arc::new(SimulatedDataSource::new()), EngineMode::Simulation),
    };

    let engine_config = EngineConfig {
        symbols,
        initial_capital,
        candle_count: config.engine.candle_count,
        active_scan_interval: Duration::from_secs(config.engine.active_scan_secs),
        closed_check_interval: Duration::from_secs(config.engine.closed_check_secs),
        signal_log_capacity: config.engine.signal_log_capacity,
        mode,
    };

    Ok(Engine::new(
        engine_config,
        data,
        Arc::new(MemoryStrategyStore::default()),
        Arc::new(MemoryTradeStore::new()),
        MoneyManager::new(config.money.clone()),
    ))
}
