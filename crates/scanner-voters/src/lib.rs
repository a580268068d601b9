//! Strategy voters and signal aggregation.
//!
//! Eight independent voters each map a view of a symbol's recent candles to
//! a discrete Buy/Sell/Hold vote; the aggregator combines votes into one
//! decision via fixed weights and a threshold. Voters are a closed set of
//! tagged variants dispatched through a single `match`, which keeps the
//! weight and threshold logic in one place and each voter trivially
//! testable in isolation.

pub mod aggregator;
pub mod voter;

pub use aggregator::{AggregateOutcome, Aggregator, EnabledVoter};
pub use voter::{
    BollingerParams, CrossoverParams, MacdParams, RsiParams, StochRsiParams, SuperTrendParams,
    Voter, VwapParams,
};
