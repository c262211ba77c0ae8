//! Composition-root facade over the prefetch subsystem.
//!
//! One [`PrefetchService`] is constructed at app startup and handed to every
//! consumer; it is an explicitly injected instance, not ambient global
//! state, so tests build a fresh one per case.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::device::{DeviceState, DeviceStateProvider};
use crate::navigation::{NavigationPredictor, ScreenPrediction};
use crate::prefetch::{
    ContentType, PrefetchConfig, PrefetchQueue, PrefetchReason, PrefetchStatsSnapshot, Priority,
};
use crate::scheduler::LifecycleEvent;

/// How many predicted screens a navigation event warms.
const PREDICTED_SCREEN_COUNT: usize = 3;

/// Single logical prefetch instance for a running app.
///
/// Owns the queue, the navigation predictor, and the device provider, and
/// exposes the fixed-parameter lifecycle recipes that wire platform events
/// into them.
pub struct PrefetchService {
    config: PrefetchConfig,
    queue: Arc<PrefetchQueue>,
    predictor: Mutex<NavigationPredictor>,
    provider: Arc<dyn DeviceStateProvider>,
}

impl PrefetchService {
    /// Create a service with the given configuration and device provider.
    pub fn new(config: PrefetchConfig, provider: Arc<dyn DeviceStateProvider>) -> Arc<Self> {
        let queue = Arc::new(PrefetchQueue::new(config.clone(), Arc::clone(&provider)));
        Arc::new(Self {
            config,
            queue,
            predictor: Mutex::new(NavigationPredictor::new()),
            provider,
        })
    }

    /// The prefetch queue.
    pub fn queue(&self) -> Arc<PrefetchQueue> {
        Arc::clone(&self.queue)
    }

    /// The active configuration.
    pub fn config(&self) -> &PrefetchConfig {
        &self.config
    }

    /// Fresh device snapshot from the provider.
    pub fn device_state(&self) -> DeviceState {
        self.provider.snapshot()
    }

    /// Current stats snapshot.
    pub fn stats(&self) -> PrefetchStatsSnapshot {
        self.queue.stats_snapshot()
    }

    /// Zero the stats counters.
    pub fn reset_stats(&self) {
        self.queue.reset_stats();
    }

    /// Record a screen transition for the predictor.
    pub fn record_navigation(&self, screen: &str, context: HashMap<String, String>) {
        if let Ok(mut predictor) = self.predictor.lock() {
            predictor.record_navigation(screen, context);
        }
    }

    /// Rank the most likely next screens.
    pub fn predict_next_screens(&self, count: usize) -> Vec<ScreenPrediction> {
        self.predictor
            .lock()
            .map(|p| p.predict_next_screens(count))
            .unwrap_or_default()
    }

    /// Forget recorded navigation history and counts.
    pub fn reset_predictor(&self) {
        if let Ok(mut predictor) = self.predictor.lock() {
            predictor.reset();
        }
    }

    // ==================== Convenience prefetch surface ====================

    /// Warm the detail view of a listing.
    pub fn prefetch_listing_detail(&self, listing_id: impl Into<String>) {
        self.queue.prefetch_listing_detail(listing_id);
    }

    /// Warm a neighbor's profile.
    pub fn prefetch_user_profile(&self, user_id: impl Into<String>) {
        self.queue.prefetch_user_profile(user_id);
    }

    /// Warm the messages of a chat room.
    pub fn prefetch_chat_messages(&self, room_id: impl Into<String>) {
        self.queue.prefetch_chat_messages(room_id);
    }

    /// Warm a set of images.
    pub fn prefetch_images(&self, urls: &[String]) {
        self.queue.prefetch_images(urls);
    }

    /// Warm items just past the visible end of a scrolled list.
    pub fn prefetch_for_scroll(
        &self,
        last_visible_index: usize,
        total_items: usize,
        item_ids: &[String],
    ) {
        self.queue
            .prefetch_for_scroll(last_visible_index, total_items, item_ids);
    }

    // ==================== Lifecycle recipes ====================

    /// Route a platform lifecycle event to its fixed recipe.
    pub fn handle_event(&self, event: LifecycleEvent) {
        debug!(?event, "Handling lifecycle event");
        match event {
            LifecycleEvent::Foreground => self.on_foreground(),
            LifecycleEvent::Background => self.queue.pause(),
            LifecycleEvent::NetworkRestored => self.on_network_restored(),
            LifecycleEvent::PowerSaveChanged(enabled) => {
                if enabled {
                    self.queue.pause();
                } else {
                    self.queue.resume();
                }
            }
            LifecycleEvent::UserIntent(screen) => self.on_user_intent(&screen),
            LifecycleEvent::PushNotification { kind, content_id } => {
                self.on_push_notification(&kind, content_id);
            }
        }
    }

    /// Resume admission and warm the surfaces a returning user sees first.
    fn on_foreground(&self) {
        self.queue.resume();
        self.queue.enqueue(
            ContentType::FeedPage,
            None,
            None,
            Priority::High,
            PrefetchReason::Foreground,
            None,
        );
        self.queue.enqueue(
            ContentType::Notifications,
            None,
            None,
            Priority::Normal,
            PrefetchReason::Foreground,
            None,
        );
    }

    /// Resume admission and refresh the feed after an offline period.
    fn on_network_restored(&self) {
        self.queue.resume();
        self.queue.enqueue(
            ContentType::FeedPage,
            None,
            None,
            Priority::Normal,
            PrefetchReason::NetworkRestored,
            None,
        );
    }

    /// Record the navigation and warm content for the likely next screens.
    fn on_user_intent(&self, screen: &str) {
        self.record_navigation(screen, HashMap::new());
        for prediction in self.predict_next_screens(PREDICTED_SCREEN_COUNT) {
            if let Some(content_type) = content_type_for_screen(&prediction.screen) {
                self.queue.enqueue(
                    content_type,
                    None,
                    None,
                    Priority::Normal,
                    PrefetchReason::NavigationPrediction,
                    None,
                );
            }
        }
    }

    /// Warm the content a push notification points at.
    fn on_push_notification(&self, kind: &str, content_id: String) {
        let content_type = content_type_for_push(kind);
        self.queue.enqueue(
            content_type,
            Some(content_id),
            None,
            Priority::High,
            PrefetchReason::PushNotification,
            None,
        );
    }
}

/// Content warmed when the predictor expects a screen next.
///
/// Only screens whose content is fetchable without an item id map to a
/// content type; detail-style screens need the id the user will pick.
pub fn content_type_for_screen(screen: &str) -> Option<ContentType> {
    match screen {
        "feed" => Some(ContentType::FeedPage),
        "search" => Some(ContentType::SearchResults),
        "notifications" => Some(ContentType::Notifications),
        "forum" => Some(ContentType::ForumPost),
        "chats" => Some(ContentType::ChatRoom),
        _ => None,
    }
}

/// Content referenced by a push notification kind.
pub fn content_type_for_push(kind: &str) -> ContentType {
    match kind {
        "chat_message" => ContentType::ChatMessages,
        "listing" => ContentType::ListingDetail,
        "forum_reply" => ContentType::ForumPost,
        _ => ContentType::Notifications,
    }
}
