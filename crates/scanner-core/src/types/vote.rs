//! Votes, decisions, and weighted signals.

use serde::{Deserialize, Serialize};

/// A single voter's opinion on one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl Vote {
    /// Numeric value used for weighted aggregation.
    #[inline]
    pub fn value(&self) -> f64 {
        match self {
            Vote::Buy => 1.0,
            Vote::Sell => -1.0,
            Vote::Hold => 0.0,
        }
    }

    /// Whether this vote expresses a direction.
    #[inline]
    pub fn is_directional(&self) -> bool {
        !matches!(self, Vote::Hold)
    }
}

/// Final trade decision after aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl Decision {
    /// Sign of the decision (+1 buy, -1 sell, 0 hold).
    #[inline]
    pub fn sign(&self) -> f64 {
        match self {
            Decision::Buy => 1.0,
            Decision::Sell => -1.0,
            Decision::Hold => 0.0,
        }
    }
}

/// One voter's attributed vote inside a weighted signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRecord {
    /// Voter name (e.g. "sma_crossover")
    pub voter: String,
    /// The vote cast
    pub vote: Vote,
    /// Weight the vote carried in the aggregate
    pub weight: f64,
}

/// The aggregated outcome of one scan of one symbol.
///
/// Created once per scan per symbol, immutable, appended to the signal log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedSignal {
    /// Symbol scanned
    pub symbol: String,
    /// Scan timestamp (unix milliseconds)
    pub timestamp: i64,
    /// Close price at scan time
    pub price: f64,
    /// Per-voter votes
    pub votes: Vec<VoteRecord>,
    /// Normalized weighted score in [-1, 1]
    pub score: f64,
    /// Final decision
    pub decision: Decision,
    /// Fraction of active voters agreeing with the decision's sign
    pub confidence: f64,
    /// What the engine did with the signal (e.g. "trade_executed", "blocked")
    pub action: String,
}
