//! Shared queue status for observers.
//!
//! The queue republishes a whole snapshot after every state change; observers
//! only ever read complete values, never a half-updated struct.

use std::sync::{Arc, RwLock};

use super::stats::PrefetchStatsSnapshot;

/// Point-in-time view of the queue for dashboards and diagnostics.
#[derive(Debug, Clone, Default)]
pub struct QueueStatusSnapshot {
    /// Requests currently queued and not yet dispatched.
    pub queue_len: usize,
    /// Whether admission is paused.
    pub paused: bool,
    /// Counter snapshot at publication time.
    pub stats: PrefetchStatsSnapshot,
}

/// Thread-safe holder of the latest queue status.
#[derive(Debug, Default)]
pub struct SharedQueueStatus {
    inner: RwLock<QueueStatusSnapshot>,
}

impl SharedQueueStatus {
    /// Create a new shared status.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Replace the published snapshot.
    pub fn publish(&self, snapshot: QueueStatusSnapshot) {
        if let Ok(mut inner) = self.inner.write() {
            *inner = snapshot;
        }
    }

    /// Get the latest published snapshot.
    pub fn snapshot(&self) -> QueueStatusSnapshot {
        self.inner.read().map(|s| s.clone()).unwrap_or_default()
    }
}
