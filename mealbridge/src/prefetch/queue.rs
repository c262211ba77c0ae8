//! Bounded prefetch queue and admission controller.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, trace};

use crate::device::{DeviceState, DeviceStateProvider};

use super::config::{PrefetchConfig, SCROLL_LOOKAHEAD};
use super::stats::{PrefetchQueueStats, PrefetchStatsSnapshot};
use super::status::{QueueStatusSnapshot, SharedQueueStatus};
use super::types::{ContentType, PrefetchReason, PrefetchRequest, Priority};

/// Bounded FIFO of admitted prefetch requests.
///
/// Admission applies, in order: the pause gate, queue backpressure
/// (drop-newest), the session byte budget, then the device gates against a
/// snapshot captured for this call. Every rejection is silent; producers
/// fire and forget.
///
/// Enqueue is safe under concurrent producers. Draining is expected to
/// happen from a single background worker context.
pub struct PrefetchQueue {
    config: PrefetchConfig,
    provider: Arc<dyn DeviceStateProvider>,
    pending: Mutex<VecDeque<PrefetchRequest>>,
    paused: AtomicBool,
    stats: Arc<PrefetchQueueStats>,
    status: Arc<SharedQueueStatus>,
}

impl PrefetchQueue {
    /// Create a queue with the given configuration and device provider.
    pub fn new(config: PrefetchConfig, provider: Arc<dyn DeviceStateProvider>) -> Self {
        Self {
            config,
            provider,
            pending: Mutex::new(VecDeque::new()),
            paused: AtomicBool::new(false),
            stats: Arc::new(PrefetchQueueStats::default()),
            status: SharedQueueStatus::new(),
        }
    }

    /// Access the configuration.
    pub fn config(&self) -> &PrefetchConfig {
        &self.config
    }

    /// Get access to the raw counters for monitoring.
    pub fn stats(&self) -> Arc<PrefetchQueueStats> {
        Arc::clone(&self.stats)
    }

    /// Current stats snapshot; rates recomputed from counters at read time.
    pub fn stats_snapshot(&self) -> PrefetchStatsSnapshot {
        self.stats.snapshot()
    }

    /// Zero all counters and republish.
    pub fn reset_stats(&self) {
        self.stats.reset();
        self.publish_status();
    }

    /// Shared status handle for observers.
    pub fn status(&self) -> Arc<SharedQueueStatus> {
        Arc::clone(&self.status)
    }

    /// Number of queued, not-yet-dispatched requests.
    pub fn len(&self) -> usize {
        self.pending.lock().map(|q| q.len()).unwrap_or(0)
    }

    /// Check whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop admitting new requests.
    ///
    /// Only the admission gate toggles; requests already handed to the
    /// dispatcher are unaffected, since cancelling in-flight work is the
    /// dispatcher's responsibility.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
        debug!("Prefetch queue paused");
        self.publish_status();
    }

    /// Resume admitting requests.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
        debug!("Prefetch queue resumed");
        self.publish_status();
    }

    /// Check whether admission is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    /// Drop all queued requests without touching any counter.
    pub fn clear(&self) {
        if let Ok(mut pending) = self.pending.lock() {
            let dropped = pending.len();
            pending.clear();
            debug!(dropped, "Prefetch queue cleared");
        }
        self.publish_status();
    }

    /// Submit a prefetch request.
    ///
    /// All rejections are silent: while paused nothing is counted, a
    /// full queue drops the newest request, and the device gates apply in
    /// order (offline, battery, memory, metered), each a hard reject. On
    /// admission the TTL defaults from configuration and `total_requests`
    /// is bumped.
    pub fn enqueue(
        &self,
        content_type: ContentType,
        content_id: Option<String>,
        url: Option<String>,
        priority: Priority,
        reason: PrefetchReason,
        ttl: Option<Duration>,
    ) {
        if self.is_paused() {
            trace!(%content_type, "Prefetch rejected: paused");
            return;
        }

        let device = self.provider.snapshot();
        {
            let Ok(mut pending) = self.pending.lock() else {
                return;
            };
            if pending.len() >= self.config.max_queue_size {
                trace!(
                    %content_type,
                    queue_len = pending.len(),
                    "Prefetch rejected: queue full"
                );
                return;
            }
            if self.stats.total_bytes.load(Ordering::Relaxed) >= self.config.max_bytes_per_session
            {
                trace!(%content_type, "Prefetch rejected: session byte budget spent");
                return;
            }
            if !gates_admit(&device, priority) {
                trace!(
                    %content_type,
                    %priority,
                    network = %device.network,
                    metered = device.metered,
                    "Prefetch rejected: device gates"
                );
                return;
            }

            let request = PrefetchRequest::new(
                content_type,
                content_id,
                url,
                priority,
                reason,
                ttl.unwrap_or(self.config.default_ttl),
            );
            trace!(%content_type, %priority, %reason, "Prefetch admitted");
            pending.push_back(request);
        }

        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);
        self.publish_status();
    }

    /// Pop the next dispatchable request, discarding expired entries.
    pub fn next_request(&self) -> Option<PrefetchRequest> {
        let next = {
            let mut pending = self.pending.lock().ok()?;
            loop {
                match pending.pop_front() {
                    Some(request) if request.is_expired() => {
                        self.stats.expired.fetch_add(1, Ordering::Relaxed);
                        trace!(content_type = %request.content_type, "Dropped expired request");
                    }
                    other => break other,
                }
            }
        };
        if next.is_some() {
            self.publish_status();
        }
        next
    }

    /// Pop up to `max` dispatchable requests.
    pub fn take_batch(&self, max: usize) -> Vec<PrefetchRequest> {
        let mut batch = Vec::new();
        while batch.len() < max {
            match self.next_request() {
                Some(request) => batch.push(request),
                None => break,
            }
        }
        batch
    }

    // ==================== Loader-reported bookkeeping ====================

    /// Record a successful dispatch of `bytes` payload bytes.
    pub fn record_success(&self, bytes: u64) {
        self.stats.successful.fetch_add(1, Ordering::Relaxed);
        self.stats.total_bytes.fetch_add(bytes, Ordering::Relaxed);
        self.publish_status();
    }

    /// Record a failed dispatch. Never retried here.
    pub fn record_failure(&self) {
        self.stats.failed.fetch_add(1, Ordering::Relaxed);
        self.publish_status();
    }

    /// Record a dispatch satisfied from cache.
    pub fn record_cache_hit(&self) {
        self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
        self.publish_status();
    }

    // ==================== Convenience wrappers ====================

    /// Warm the detail view of a listing.
    pub fn prefetch_listing_detail(&self, listing_id: impl Into<String>) {
        self.enqueue(
            ContentType::ListingDetail,
            Some(listing_id.into()),
            None,
            Priority::Normal,
            PrefetchReason::UserIntent,
            None,
        );
    }

    /// Warm a neighbor's profile.
    pub fn prefetch_user_profile(&self, user_id: impl Into<String>) {
        self.enqueue(
            ContentType::UserProfile,
            Some(user_id.into()),
            None,
            Priority::Normal,
            PrefetchReason::UserIntent,
            None,
        );
    }

    /// Warm the messages of a chat room.
    pub fn prefetch_chat_messages(&self, room_id: impl Into<String>) {
        self.enqueue(
            ContentType::ChatMessages,
            Some(room_id.into()),
            None,
            Priority::Normal,
            PrefetchReason::UserIntent,
            None,
        );
    }

    /// Warm a set of images, truncated to the configured per-call limit.
    pub fn prefetch_images(&self, urls: &[String]) {
        for url in urls.iter().take(self.config.image_prefetch_limit) {
            self.enqueue(
                ContentType::Image,
                None,
                Some(url.clone()),
                Priority::Low,
                PrefetchReason::UserIntent,
                None,
            );
        }
    }

    /// Warm the items just past the visible end of a scrolled list.
    ///
    /// The lookahead window is `[last_visible_index + 1,
    /// min(last_visible_index + SCROLL_LOOKAHEAD, total_items - 1)]`; one
    /// low-priority request per item id with a valid index in that window.
    pub fn prefetch_for_scroll(
        &self,
        last_visible_index: usize,
        total_items: usize,
        item_ids: &[String],
    ) {
        if total_items == 0 {
            return;
        }
        let start = last_visible_index + 1;
        let end = (last_visible_index + SCROLL_LOOKAHEAD).min(total_items - 1);
        if start > end {
            return;
        }
        for index in start..=end {
            if let Some(id) = item_ids.get(index) {
                self.enqueue(
                    ContentType::ListingDetail,
                    Some(id.clone()),
                    None,
                    Priority::Low,
                    PrefetchReason::ScrollAnticipation,
                    None,
                );
            }
        }
    }

    fn publish_status(&self) {
        self.status.publish(QueueStatusSnapshot {
            queue_len: self.len(),
            paused: self.is_paused(),
            stats: self.stats.snapshot(),
        });
    }
}

/// Apply the device gates in order; each is a hard reject.
///
/// Priorities compare strictly, so a gate written as `priority < Normal`
/// admits `Normal` itself.
fn gates_admit(device: &DeviceState, priority: Priority) -> bool {
    // Offline blocks everything regardless of priority.
    if device.is_offline() {
        return false;
    }
    // Device-health gates: battery and memory.
    if device.low_battery && !device.charging && priority < Priority::High {
        return false;
    }
    if device.low_memory && priority < Priority::Critical {
        return false;
    }
    // Cost gate: metered networks only block the lowest tier.
    if device.metered && priority < Priority::Normal {
        return false;
    }
    true
}
