//! Prefetch configuration presets.
//!
//! All tuning lives in a handful of numeric knobs. Three named profiles ship
//! with the crate; shells pick one at composition time and the knobs are
//! never mutated afterwards.

use std::time::Duration;

/// Default maximum concurrent dispatches per batch.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 4;

/// Default bound on queued, not-yet-dispatched requests.
pub const DEFAULT_MAX_QUEUE_SIZE: usize = 50;

/// Default request TTL when the producer does not supply one.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default per-session byte budget for prefetched payloads.
pub const DEFAULT_MAX_BYTES_PER_SESSION: u64 = 50 * 1024 * 1024;

/// Default cap on URLs accepted by a single `prefetch_images` call.
pub const DEFAULT_IMAGE_PREFETCH_LIMIT: usize = 10;

/// Number of items past the last visible index that scroll anticipation
/// warms. The window is `[last_visible + 1, last_visible + SCROLL_LOOKAHEAD]`
/// clamped to the list bounds.
pub const SCROLL_LOOKAHEAD: usize = 6;

/// Numeric knobs for the prefetch subsystem.
#[derive(Debug, Clone)]
pub struct PrefetchConfig {
    /// Maximum requests dispatched concurrently per worker batch.
    pub max_concurrent_requests: usize,
    /// Maximum queued requests; enqueue beyond this drops the newest.
    pub max_queue_size: usize,
    /// TTL applied when a producer does not supply one.
    pub default_ttl: Duration,
    /// Session byte budget; admission stops once spent.
    pub max_bytes_per_session: u64,
    /// Cap on URLs accepted per `prefetch_images` call.
    pub image_prefetch_limit: usize,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl PrefetchConfig {
    /// Balanced profile for typical devices.
    pub fn standard() -> Self {
        Self {
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            max_queue_size: DEFAULT_MAX_QUEUE_SIZE,
            default_ttl: DEFAULT_TTL,
            max_bytes_per_session: DEFAULT_MAX_BYTES_PER_SESSION,
            image_prefetch_limit: DEFAULT_IMAGE_PREFETCH_LIMIT,
        }
    }

    /// Profile for strong devices on unmetered connections.
    pub fn aggressive() -> Self {
        Self {
            max_concurrent_requests: 8,
            max_queue_size: 100,
            default_ttl: Duration::from_secs(600),
            max_bytes_per_session: 200 * 1024 * 1024,
            image_prefetch_limit: 25,
        }
    }

    /// Profile for constrained devices or data-saver users.
    pub fn conservative() -> Self {
        Self {
            max_concurrent_requests: 2,
            max_queue_size: 20,
            default_ttl: Duration::from_secs(120),
            max_bytes_per_session: 10 * 1024 * 1024,
            image_prefetch_limit: 4,
        }
    }
}
