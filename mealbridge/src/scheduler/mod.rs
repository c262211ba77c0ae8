//! Lifecycle glue and the background prefetch worker.
//!
//! The app shell forwards platform lifecycle signals (foreground/background,
//! connectivity, power-save) into one event channel. The worker reacts to
//! those events, runs periodic idle batches under device constraints, and
//! drains admitted requests to the external dispatcher:
//!
//! ```text
//! platform shell ── LifecycleEvent ──→ PrefetchWorker
//!                                         ├─ recipes via PrefetchService
//!                                         ├─ periodic tick (constraints gated)
//!                                         └─ take_batch → PrefetchDispatcher
//! ```
//!
//! How the periodic cadence is realized on a given platform (job queue,
//! cron-like scheduler) is the shell's concern; this module only expresses
//! the constraint contract and the idempotent batch.

mod events;
mod worker;

pub use events::{DispatchOutcome, LifecycleEvent, PrefetchDispatcher};
pub use worker::{PrefetchWorker, WorkerConfig};
