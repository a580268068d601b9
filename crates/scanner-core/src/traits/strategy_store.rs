//! Strategy store trait.

use crate::error::PersistenceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One enabled strategy row from the external store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyEntry {
    /// Store-assigned id
    pub id: String,
    /// Which voter this strategy maps to (e.g. "sma_crossover")
    pub voter_kind: String,
    /// Voter parameters as JSON; empty object means defaults
    #[serde(default)]
    pub params: serde_json::Value,
    /// Optional weight override for the aggregator
    #[serde(default)]
    pub weight: Option<f64>,
}

/// External store of strategy metadata. Read once per tick.
#[async_trait]
pub trait StrategyStore: Send + Sync {
    /// List the currently-enabled strategies.
    async fn list_enabled(&self) -> Result<Vec<StrategyEntry>, PersistenceError>;
}
