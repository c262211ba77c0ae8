//! Prefetch bookkeeping counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Aggregate prefetch counters.
///
/// `total_requests` counts admissions; success/failure/cache-hit are reported
/// back by the external dispatcher after it performs the actual fetch.
/// Expired counts requests that aged out of the queue before dispatch.
#[derive(Debug, Default)]
pub struct PrefetchQueueStats {
    /// Requests admitted into the queue.
    pub total_requests: AtomicU64,
    /// Dispatches the loader reported successful.
    pub successful: AtomicU64,
    /// Dispatches the loader reported failed.
    pub failed: AtomicU64,
    /// Dispatches satisfied from cache without a network fetch.
    pub cache_hits: AtomicU64,
    /// Requests dropped at dispatch time because their TTL had passed.
    pub expired: AtomicU64,
    /// Total payload bytes fetched by successful dispatches.
    pub total_bytes: AtomicU64,
}

impl PrefetchQueueStats {
    /// Get a snapshot of current statistics.
    ///
    /// Rates are recomputed from the raw counters on every call so a snapshot
    /// is always total-consistent with itself.
    pub fn snapshot(&self) -> PrefetchStatsSnapshot {
        let total_requests = self.total_requests.load(Ordering::Relaxed);
        let successful = self.successful.load(Ordering::Relaxed);
        let cache_hits = self.cache_hits.load(Ordering::Relaxed);
        PrefetchStatsSnapshot {
            total_requests,
            successful,
            failed: self.failed.load(Ordering::Relaxed),
            cache_hits,
            expired: self.expired.load(Ordering::Relaxed),
            total_bytes: self.total_bytes.load(Ordering::Relaxed),
            success_rate: rate(successful, total_requests),
            cache_hit_rate: rate(cache_hits, total_requests),
        }
    }

    /// Zero all counters.
    pub fn reset(&self) {
        self.total_requests.store(0, Ordering::Relaxed);
        self.successful.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.expired.store(0, Ordering::Relaxed);
        self.total_bytes.store(0, Ordering::Relaxed);
    }
}

fn rate(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Point-in-time view of the prefetch counters with derived rates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrefetchStatsSnapshot {
    pub total_requests: u64,
    pub successful: u64,
    pub failed: u64,
    pub cache_hits: u64,
    pub expired: u64,
    pub total_bytes: u64,
    pub success_rate: f64,
    pub cache_hit_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_has_zero_rates() {
        let stats = PrefetchQueueStats::default();
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_requests, 0);
        assert_eq!(snapshot.success_rate, 0.0);
        assert_eq!(snapshot.cache_hit_rate, 0.0);
    }

    #[test]
    fn test_rates_derive_from_counters() {
        let stats = PrefetchQueueStats::default();
        stats.total_requests.store(10, Ordering::Relaxed);
        stats.successful.store(6, Ordering::Relaxed);
        stats.cache_hits.store(2, Ordering::Relaxed);

        let snapshot = stats.snapshot();
        assert!((snapshot.success_rate - 0.6).abs() < 1e-9);
        assert!((snapshot.cache_hit_rate - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_rates_follow_counter_updates() {
        let stats = PrefetchQueueStats::default();
        stats.total_requests.store(4, Ordering::Relaxed);
        stats.successful.store(4, Ordering::Relaxed);
        assert!((stats.snapshot().success_rate - 1.0).abs() < 1e-9);

        stats.total_requests.fetch_add(4, Ordering::Relaxed);
        assert!((stats.snapshot().success_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let stats = PrefetchQueueStats::default();
        stats.total_requests.store(7, Ordering::Relaxed);
        stats.total_bytes.store(1024, Ordering::Relaxed);
        stats.reset();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot, PrefetchStatsSnapshot::default());
    }
}
