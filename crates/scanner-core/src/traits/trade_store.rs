//! Trade persistence trait.

use crate::error::PersistenceError;
use crate::types::{Position, Trade};
use async_trait::async_trait;

/// Durable storage for trades and open positions.
///
/// The ledger writes through to this store with at-least-once semantics:
/// a write failure is reported but never blocks the in-memory decision
/// for the tick.
#[async_trait]
pub trait TradeStore: Send + Sync {
    /// Persist a trade record.
    async fn record_trade(&self, trade: &Trade) -> Result<(), PersistenceError>;

    /// List the open positions known to durable storage.
    async fn list_open_positions(&self) -> Result<Vec<Position>, PersistenceError>;
}
