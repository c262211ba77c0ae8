//! Lifecycle events and the dispatch contract.

use std::future::Future;

use crate::prefetch::PrefetchRequest;

/// Platform lifecycle signal forwarded by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The app moved to the foreground.
    Foreground,
    /// The app moved to the background.
    Background,
    /// Connectivity came back after an offline period.
    NetworkRestored,
    /// The platform power-save mode toggled.
    PowerSaveChanged(bool),
    /// The user navigated to a screen.
    UserIntent(String),
    /// A push notification arrived referencing content.
    PushNotification {
        /// Notification kind (e.g. `"chat_message"`).
        kind: String,
        /// Identifier of the referenced content.
        content_id: String,
    },
}

/// Result of dispatching one prefetch request, reported by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Fetched over the network; `bytes` counts the payload.
    Fetched { bytes: u64 },
    /// Already cached; no network fetch happened.
    CacheHit,
    /// The fetch failed. Never retried here.
    Failed,
}

/// External loader that performs the actual fetch for admitted requests.
///
/// The dispatcher owns its own timeout, retry, and cancellation policy;
/// the worker only folds the reported outcome into the stats.
///
/// Implemented for any `Fn(PrefetchRequest) -> Future` closure.
pub trait PrefetchDispatcher: Send + Sync {
    /// Fetch the content described by `request`.
    fn dispatch(&self, request: PrefetchRequest) -> impl Future<Output = DispatchOutcome> + Send;
}

impl<F, Fut> PrefetchDispatcher for F
where
    F: Fn(PrefetchRequest) -> Fut + Send + Sync,
    Fut: Future<Output = DispatchOutcome> + Send,
{
    fn dispatch(&self, request: PrefetchRequest) -> impl Future<Output = DispatchOutcome> + Send {
        (self)(request)
    }
}
