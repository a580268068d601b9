//! Weighted vote aggregation.

use scanner_core::traits::StrategyEntry;
use scanner_core::types::{CandleSeries, Decision, Vote, VoteRecord};

use crate::voter::Voter;

/// A voter activated for scanning, with its resolved weight.
#[derive(Debug, Clone)]
pub struct EnabledVoter {
    pub strategy_id: String,
    pub voter: Voter,
    pub weight: f64,
}

impl EnabledVoter {
    /// Resolve a strategy-store entry into an enabled voter.
    /// Returns None when the entry names an unknown voter kind.
    pub fn from_entry(entry: &StrategyEntry) -> Option<EnabledVoter> {
        let voter = Voter::from_kind(&entry.voter_kind, &entry.params)?;
        let weight = entry.weight.unwrap_or_else(|| voter.default_weight());
        Some(EnabledVoter {
            strategy_id: entry.id.clone(),
            voter,
            weight,
        })
    }

    /// The full default panel, one voter per kind, store weights absent.
    pub fn default_panel() -> Vec<EnabledVoter> {
        Voter::all_defaults()
            .into_iter()
            .map(|voter| EnabledVoter {
                strategy_id: voter.kind().to_string(),
                weight: voter.default_weight(),
                voter,
            })
            .collect()
    }
}

/// The aggregated result of one voting round for one symbol.
#[derive(Debug, Clone)]
pub struct AggregateOutcome {
    pub votes: Vec<VoteRecord>,
    /// Weighted score in [-1, 1], normalized by the sum of enabled weights
    pub score: f64,
    pub decision: Decision,
    /// Fraction of enabled voters agreeing with the decision; 0 on Hold
    pub confidence: f64,
}

impl AggregateOutcome {
    fn hold() -> Self {
        Self {
            votes: Vec::new(),
            score: 0.0,
            decision: Decision::Hold,
            confidence: 0.0,
        }
    }
}

/// Combines voter outputs into a single decision.
#[derive(Debug, Clone)]
pub struct Aggregator {
    threshold: f64,
}

impl Aggregator {
    /// Score magnitude required before a directional decision is made.
    pub const DEFAULT_THRESHOLD: f64 = 0.3;

    pub fn new() -> Self {
        Self::with_threshold(Self::DEFAULT_THRESHOLD)
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Run every enabled voter over the series and aggregate.
    ///
    /// An empty panel yields Hold with zero score and confidence.
    pub fn aggregate(&self, voters: &[EnabledVoter], series: &CandleSeries) -> AggregateOutcome {
        if voters.is_empty() {
            return AggregateOutcome::hold();
        }

        let mut votes = Vec::with_capacity(voters.len());
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;

        for enabled in voters {
            let vote = enabled.voter.evaluate(series);
            weighted_sum += vote.value() * enabled.weight;
            weight_total += enabled.weight;
            votes.push(VoteRecord {
                voter: enabled.strategy_id.clone(),
                vote,
                weight: enabled.weight,
            });
        }

        if weight_total <= 0.0 {
            return AggregateOutcome::hold();
        }

        // Strictly beyond the threshold; landing exactly on it is a Hold
        let score = weighted_sum / weight_total;
        let decision = if score > self.threshold {
            Decision::Buy
        } else if score < -self.threshold {
            Decision::Sell
        } else {
            Decision::Hold
        };

        let confidence = match decision {
            Decision::Hold => 0.0,
            Decision::Buy => {
                votes.iter().filter(|v| v.vote == Vote::Buy).count() as f64 / votes.len() as f64
            }
            Decision::Sell => {
                votes.iter().filter(|v| v.vote == Vote::Sell).count() as f64 / votes.len() as f64
            }
        };

        AggregateOutcome {
            votes,
            score,
            decision,
            confidence,
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}
