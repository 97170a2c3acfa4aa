//! Majority-vote label smoothing.
//!
//! Per-frame detector output jitters: a plate read as "123" on most frames
//! may come back "128" on a blurry one. The stabilizer keeps a bounded FIFO
//! window of recently accepted labels and reports the most frequent value,
//! so a single bad read never flips the reported label.

use std::collections::{HashMap, VecDeque};

/// Sliding-window majority vote over accepted raw labels.
///
/// The window holds at most `capacity` labels; inserting into a full window
/// evicts the oldest entry. Ties in the vote go to whichever label is reached
/// first in a left-to-right scan of the window.
#[derive(Clone, Debug)]
pub struct LabelStabilizer {
    history: VecDeque<String>,
    capacity: usize,
    stabilized: String,
}

impl LabelStabilizer {
    /// Window capacity is fixed for the stabilizer's lifetime.
    pub fn new(capacity: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
            stabilized: String::new(),
        }
    }

    /// Append an accepted label, evict past capacity, and return the fresh
    /// majority. The result is also cached for [`Self::stabilized`].
    pub fn record_and_get_majority(&mut self, label: &str) -> String {
        self.history.push_back(label.to_string());
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
        self.stabilized = self.majority();
        self.stabilized.clone()
    }

    /// Majority over the current window without mutating it.
    /// Empty window yields an empty string.
    pub fn get_majority(&self) -> String {
        self.majority()
    }

    /// Last cached majority, empty until a label has been recorded.
    pub fn stabilized(&self) -> &str {
        &self.stabilized
    }

    /// Drop all history and the cached majority. Called when the tracked
    /// subject changes and the accumulated window would bias the vote.
    pub fn reset(&mut self) {
        self.history.clear();
        self.stabilized.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    fn majority(&self) -> String {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for label in &self.history {
            *counts.entry(label.as_str()).or_default() += 1;
        }

        // Strictly-greater comparison keeps the first label to reach the
        // winning count in a left-to-right scan.
        let mut best = "";
        let mut best_count = 0usize;
        for label in &self.history {
            let count = counts[label.as_str()];
            if count > best_count {
                best = label;
                best_count = count;
            }
        }
        best.to_string()
    }
}
