//! Speculative content prefetching with device-aware admission control.
//!
//! This module decides *whether and when* to warm content ahead of the user;
//! actually fetching it is delegated to an external dispatcher. Producers
//! enqueue requests (directly or through convenience wrappers), the admission
//! controller gates them against a fresh device snapshot, and the background
//! worker drains admitted requests to the dispatcher:
//!
//! ```text
//! UI / navigation / lifecycle events
//!         ↓ enqueue(content, priority, reason)
//!   PrefetchQueue
//!         ├─ paused? queue full? byte budget spent?  → drop silently
//!         ├─ device gates (offline/battery/memory/metered)
//!         └─ admitted → bounded FIFO
//!                 ↓ take_batch()
//!         PrefetchWorker → dispatcher (external loader)
//!                 ↓ record_success / record_failure / record_cache_hit
//!         PrefetchQueueStats → SharedQueueStatus (observers)
//! ```
//!
//! Admission rejection is deliberately silent: prefetch is best-effort, and
//! surfacing a rejection to the UI would add noise without recourse. The
//! on-demand fetch path owned by the app shell remains the source of truth.

mod config;
mod queue;
mod stats;
mod status;
mod types;

pub use config::{PrefetchConfig, SCROLL_LOOKAHEAD};
pub use queue::PrefetchQueue;
pub use stats::{PrefetchQueueStats, PrefetchStatsSnapshot};
pub use status::{QueueStatusSnapshot, SharedQueueStatus};
pub use types::{ContentType, PrefetchReason, PrefetchRequest, Priority};
