//! First-order Markov prediction over recorded screen transitions.

use std::collections::{BTreeMap, HashMap};

use tracing::trace;

use super::history::{NavigationEntry, NavigationHistory};

/// Transition counts keyed by origin screen.
///
/// Each row maps next-screen to the number of times that transition was
/// observed. Rows are `BTreeMap`s so iteration order is lexicographic, which
/// gives predictions a deterministic tiebreak for equal probabilities.
/// Counts only ever grow until an explicit [`TransitionTable::clear`];
/// history eviction does not decrement them.
#[derive(Debug, Default)]
pub struct TransitionTable {
    counts: HashMap<String, BTreeMap<String, u64>>,
}

impl TransitionTable {
    /// Record one observation of `from → to`.
    pub fn record(&mut self, from: &str, to: &str) {
        *self
            .counts
            .entry(from.to_string())
            .or_default()
            .entry(to.to_string())
            .or_insert(0) += 1;
    }

    /// Raw count for a single transition.
    pub fn count(&self, from: &str, to: &str) -> u64 {
        self.counts
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(0)
    }

    /// Total outgoing observations from a screen.
    pub fn row_total(&self, from: &str) -> u64 {
        self.counts
            .get(from)
            .map(|row| row.values().sum())
            .unwrap_or(0)
    }

    /// Normalized probabilities for a screen's outgoing transitions.
    ///
    /// Returns an empty vector when the screen has no recorded transitions.
    /// Probabilities over a non-empty row sum to 1.0; ordering is
    /// lexicographic by screen name (callers sort by probability).
    pub fn probabilities(&self, from: &str) -> Vec<(String, f64)> {
        let Some(row) = self.counts.get(from) else {
            return Vec::new();
        };
        let total: u64 = row.values().sum();
        if total == 0 {
            return Vec::new();
        }
        row.iter()
            .map(|(screen, count)| (screen.clone(), *count as f64 / total as f64))
            .collect()
    }

    /// Drop all recorded counts.
    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

/// A ranked next-screen candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenPrediction {
    /// Screen identifier.
    pub screen: String,
    /// Estimated transition probability from the current screen.
    pub probability: f64,
}

/// Predicts the screens a user is most likely to visit next.
///
/// Maintains a bounded FIFO history of navigation events and a transition
/// count table built incrementally from consecutive pairs. Nothing is
/// persisted; the table lives for the process lifetime.
#[derive(Debug, Default)]
pub struct NavigationPredictor {
    history: NavigationHistory,
    table: TransitionTable,
}

impl NavigationPredictor {
    /// Create a predictor with the default history bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a predictor with a custom history bound.
    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            history: NavigationHistory::with_capacity(capacity),
            table: TransitionTable::default(),
        }
    }

    /// Record a navigation event.
    ///
    /// Appends to the history and, when a previous entry exists, bumps the
    /// `(previous → screen)` transition count.
    pub fn record_navigation(&mut self, screen: &str, context: HashMap<String, String>) {
        if let Some(previous) = self.history.latest() {
            let from = previous.screen.clone();
            self.table.record(&from, screen);
            trace!(from = %from, to = %screen, "Recorded screen transition");
        }
        self.history.push(NavigationEntry::new(screen, context));
    }

    /// Rank the most likely next screens from the current one.
    ///
    /// Returns at most `count` candidates, highest probability first; ties
    /// fall back to lexicographic screen order. Empty when no navigation has
    /// been recorded yet or the current screen has no outgoing transitions.
    pub fn predict_next_screens(&self, count: usize) -> Vec<ScreenPrediction> {
        let Some(current) = self.history.latest() else {
            return Vec::new();
        };

        let mut candidates = self.table.probabilities(&current.screen);
        // Stable sort keeps the lexicographic row order for equal probabilities.
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        candidates
            .into_iter()
            .take(count)
            .map(|(screen, probability)| ScreenPrediction {
                screen,
                probability,
            })
            .collect()
    }

    /// The screen the user is currently on, if any navigation was recorded.
    pub fn current_screen(&self) -> Option<&str> {
        self.history.latest().map(|e| e.screen.as_str())
    }

    /// Number of retained history entries.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Access the transition table for diagnostics.
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Clear both history and transition counts.
    pub fn reset(&mut self) {
        self.history.clear();
        self.table.clear();
    }
}
