//! Bounded FIFO log of emitted signals.

use std::collections::VecDeque;

use scanner_core::types::WeightedSignal;

/// Ring buffer of the most recent signals.
///
/// Pushing beyond capacity evicts the oldest entry.
#[derive(Debug)]
pub struct SignalLog {
    entries: VecDeque<WeightedSignal>,
    capacity: usize,
}

impl SignalLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, signal: WeightedSignal) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(signal);
    }

    /// The most recent `count` signals, newest last.
    pub fn recent(&self, count: usize) -> Vec<WeightedSignal> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
