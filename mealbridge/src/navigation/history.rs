//! Bounded history of screen transitions.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

/// Maximum number of navigation entries retained by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// A single recorded navigation event.
#[derive(Debug, Clone)]
pub struct NavigationEntry {
    /// Screen identifier as reported by the shell (e.g. `"feed"`).
    pub screen: String,
    /// When the navigation happened.
    pub timestamp: Instant,
    /// Free-form context captured with the event (deep-link args, tab, ...).
    pub context: HashMap<String, String>,
}

impl NavigationEntry {
    /// Create an entry stamped with the current time.
    pub fn new(screen: impl Into<String>, context: HashMap<String, String>) -> Self {
        Self {
            screen: screen.into(),
            timestamp: Instant::now(),
            context,
        }
    }
}

/// Bounded ring of navigation entries.
///
/// Eviction is FIFO, not LRU: temporal ordering is what matters for
/// transition counting, so the oldest entry always goes first. Evicting an
/// entry never touches counts already recorded in the transition table.
#[derive(Debug)]
pub struct NavigationHistory {
    entries: VecDeque<NavigationEntry>,
    capacity: usize,
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl NavigationHistory {
    /// Create a history bounded to `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest when at capacity.
    pub fn push(&mut self, entry: NavigationEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// The most recently recorded entry.
    pub fn latest(&self) -> Option<&NavigationEntry> {
        self.entries.back()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether any navigation has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over retained entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &NavigationEntry> {
        self.entries.iter()
    }

    /// Drop all retained entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
