//! Market data sources.
//!
//! Two `MarketDataSource` implementations: a deterministic per-symbol
//! random walk for simulation runs, and a brokerage HTTP client for live
//! candles. The engine picks one at start based on credential presence.

mod live;
mod simulated;

pub use live::{LiveConfig, LiveDataSource};
pub use simulated::SimulatedDataSource;
