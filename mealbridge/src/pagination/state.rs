//! Immutable UI snapshot published by the pagination managers.

use super::error::LoadError;

/// Snapshot of a paginated list for UI binding.
///
/// Item order is the server/query order, not insertion order. The snapshot
/// is replaced wholesale on every mutation; fields are never updated in
/// place under an observer.
#[derive(Debug, Clone)]
pub struct PaginationUiState<T> {
    /// Accumulated items in server order.
    pub items: Vec<T>,
    /// An initial load or refresh is in flight.
    pub is_loading: bool,
    /// An incremental load (more or previous) is in flight.
    pub is_loading_more: bool,
    /// The last backward fetch returned a full page.
    pub has_more_pages: bool,
    /// The last forward fetch returned a full page (cursor variant only).
    pub has_previous_pages: bool,
    /// Error from the most recent initial load or refresh, if any.
    pub error: Option<LoadError>,
}

impl<T> Default for PaginationUiState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            is_loading_more: false,
            has_more_pages: false,
            has_previous_pages: false,
            error: None,
        }
    }
}

impl<T> PaginationUiState<T> {
    /// True once loading settled with nothing to show.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && !self.is_loading
    }

    /// Whether a `load_more` call would fetch right now.
    pub fn can_load_more(&self) -> bool {
        self.has_more_pages && !self.is_loading_more && !self.is_loading
    }

    /// Whether a `load_previous` call would fetch right now.
    pub fn can_load_previous(&self) -> bool {
        self.has_previous_pages && !self.is_loading_more && !self.is_loading
    }
}
