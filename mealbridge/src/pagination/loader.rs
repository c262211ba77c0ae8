//! Loader contract consumed by the pagination managers.

use std::future::Future;

use super::error::LoadError;

/// Which end of the ordered result set a fetch extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    /// Older items (past the tail of the current window).
    Backward,
    /// Newer items (before the head of the current window).
    Forward,
}

/// Where a page fetch starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStart {
    /// Cursor-based: an opaque column label plus the boundary value, `None`
    /// for the first page.
    Cursor {
        column: String,
        value: Option<String>,
    },
    /// Offset-based: absolute item offset.
    Offset(usize),
}

/// Parameters handed to a [`PageLoader`] for one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum items to return.
    pub limit: usize,
    /// Fetch direction. Only meaningful for cursor-based starts.
    pub direction: PageDirection,
    /// Starting point of the page.
    pub start: PageStart,
}

/// Asynchronous source of pages.
///
/// The loader performs the actual network or database fetch and must be
/// idempotent enough that a caller-level retry is safe. Failures are
/// reported through `Err`, never a sentinel value.
///
/// Implemented for any `Fn(PageRequest) -> Future` closure:
///
/// ```ignore
/// let loader = |request: PageRequest| async move {
///     backend.fetch_listings(request.limit).await
/// };
/// paginator.load_initial(&loader).await;
/// ```
pub trait PageLoader<T>: Send + Sync {
    /// Fetch one page described by `request`.
    fn load_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<Vec<T>, LoadError>> + Send;
}

impl<T, F, Fut> PageLoader<T> for F
where
    F: Fn(PageRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>, LoadError>> + Send,
{
    fn load_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<Vec<T>, LoadError>> + Send {
        (self)(request)
    }
}
