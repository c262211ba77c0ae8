//! Pagination state managers for scrolling lists.
//!
//! Two variants cover the app's list surfaces:
//!
//! - [`CursorPaginator`]: cursor-based, for feeds and anything ordered by
//!   time. Supports bidirectional scroll (load more at the tail, load
//!   previous at the head) and realtime prepend/append of pushed items.
//! - [`OffsetPaginator`]: page-number based, for sources without a natural
//!   ordering cursor such as arbitrary search result sets.
//!
//! Both publish an immutable [`PaginationUiState`] snapshot through a
//! `tokio::sync::watch` channel; every mutation replaces the whole snapshot,
//! so observers never see a half-updated value. Each instance has a single
//! logical owner: operations are serialized by an in-flight guard, and a
//! second call racing a matching operation becomes a no-op rather than a
//! double fetch.
//!
//! The caller-supplied [`PageLoader`] performs the actual I/O and owns its
//! own timeout and retry policy; no retry happens at this level.

mod cursor;
mod error;
mod loader;
mod offset;
mod state;

pub use cursor::CursorPaginator;
pub use error::LoadError;
pub use loader::{PageDirection, PageLoader, PageRequest, PageStart};
pub use offset::OffsetPaginator;
pub use state::PaginationUiState;
