//! Engine orchestration.
//!
//! One background task drives the scan loop: during market hours every
//! symbol is scanned concurrently each tick; outside them the loop sleeps
//! on a slower cadence. All decisions flow through the ledger, and each
//! scanned symbol appends one weighted signal per tick to a bounded FIFO
//! log, Hold outcomes and exits included.

pub mod market_hours;
mod orchestrator;
mod signal_log;

pub use market_hours::is_market_open;
pub use orchestrator::{Engine, EngineConfig};
pub use signal_log::SignalLog;
