//! Seam traits between the engine and its external collaborators.

mod market_data;
mod strategy_store;
mod trade_store;

pub use market_data::MarketDataSource;
pub use strategy_store::{StrategyEntry, StrategyStore};
pub use trade_store::TradeStore;
