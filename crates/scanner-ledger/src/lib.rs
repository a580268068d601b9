//! Position and trade ledger.
//!
//! The ledger is the single owner of open positions and the trade history.
//! Every mutation happens under one async mutex, so the one-open-position-
//! per-symbol invariant holds across concurrent symbol scans. Executed
//! trades are written through to a `TradeStore` with at-least-once
//! semantics; a store failure never blocks the in-memory decision.

mod ledger;
mod store;

pub use ledger::{ClosedPosition, Ledger};
pub use store::{MemoryStrategyStore, MemoryTradeStore};
