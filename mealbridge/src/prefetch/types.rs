//! Request types for the prefetch queue.

use std::time::{Duration, Instant};

/// Kind of content a prefetch request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// A listing summary card.
    Listing,
    /// Full detail for a single listing.
    ListingDetail,
    /// A neighbor's profile.
    UserProfile,
    /// Chat room metadata.
    ChatRoom,
    /// Messages within a chat room.
    ChatMessages,
    /// A page of the main feed.
    FeedPage,
    /// Results for a saved or predicted search.
    SearchResults,
    /// Full-size image.
    Image,
    /// Image thumbnail.
    Thumbnail,
    /// A community forum post.
    ForumPost,
    /// The notifications list.
    Notifications,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Listing => "listing",
            Self::ListingDetail => "listing-detail",
            Self::UserProfile => "user-profile",
            Self::ChatRoom => "chat-room",
            Self::ChatMessages => "chat-messages",
            Self::FeedPage => "feed-page",
            Self::SearchResults => "search-results",
            Self::Image => "image",
            Self::Thumbnail => "thumbnail",
            Self::ForumPost => "forum-post",
            Self::Notifications => "notifications",
        };
        write!(f, "{name}")
    }
}

/// Request priority, ordered lowest to highest.
///
/// Admission gates compare priorities strictly: a gate written as
/// "priority < Normal" rejects `Low` but admits `Normal` itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    Normal,
    High,
    Critical,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Critical => "critical",
        };
        write!(f, "{name}")
    }
}

/// What triggered a prefetch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefetchReason {
    /// The user is looking at something adjacent to this content.
    UserIntent,
    /// The navigation predictor ranked this content's screen as likely next.
    NavigationPrediction,
    /// Scroll position is approaching this item.
    ScrollAnticipation,
    /// App came to the foreground.
    Foreground,
    /// Connectivity was restored.
    NetworkRestored,
    /// A push notification referenced this content.
    PushNotification,
    /// Recurring background sync.
    PeriodicSync,
    /// Explicit caller request with no inferred trigger.
    Manual,
}

impl std::fmt::Display for PrefetchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::UserIntent => "user-intent",
            Self::NavigationPrediction => "navigation-prediction",
            Self::ScrollAnticipation => "scroll-anticipation",
            Self::Foreground => "foreground",
            Self::NetworkRestored => "network-restored",
            Self::PushNotification => "push-notification",
            Self::PeriodicSync => "periodic-sync",
            Self::Manual => "manual",
        };
        write!(f, "{name}")
    }
}

/// An admitted prefetch request.
///
/// Immutable once constructed. The queue discards it after TTL expiry or
/// hands it to the dispatcher exactly once.
#[derive(Debug, Clone)]
pub struct PrefetchRequest {
    /// Kind of content to warm.
    pub content_type: ContentType,
    /// Identifier of the content, when the type is id-addressed.
    pub content_id: Option<String>,
    /// Direct URL, for image/thumbnail requests.
    pub url: Option<String>,
    /// Request priority.
    pub priority: Priority,
    /// Trigger source.
    pub reason: PrefetchReason,
    /// How long the request stays dispatchable.
    pub ttl: Duration,
    /// When the request was admitted.
    pub enqueued_at: Instant,
}

impl PrefetchRequest {
    /// Construct a request stamped with the current time.
    pub fn new(
        content_type: ContentType,
        content_id: Option<String>,
        url: Option<String>,
        priority: Priority,
        reason: PrefetchReason,
        ttl: Duration,
    ) -> Self {
        Self {
            content_type,
            content_id,
            url,
            priority,
            reason,
            ttl,
            enqueued_at: Instant::now(),
        }
    }

    /// Whether the request has outlived its TTL.
    pub fn is_expired(&self) -> bool {
        self.enqueued_at.elapsed() >= self.ttl
    }
}
