//! Error type for page loads.

use thiserror::Error;

/// Failure raised by a [`PageLoader`](super::PageLoader).
///
/// Cloneable so the pagination snapshot can carry the latest error to every
/// observer. Loaders map their transport errors into these variants; the
/// pagination managers never retry, they only record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The backend rejected or failed the request.
    #[error("page request failed: {0}")]
    Request(String),

    /// The loader's own deadline elapsed.
    #[error("page request timed out")]
    Timeout,

    /// The enclosing scope tore down the load.
    #[error("page request cancelled")]
    Cancelled,
}
