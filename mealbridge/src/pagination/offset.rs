//! Offset-based pagination state manager.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tokio::sync::watch;
use tracing::{trace, warn};

use super::loader::{PageDirection, PageLoader, PageRequest, PageStart};
use super::state::PaginationUiState;

/// Pagination state manager for page-number driven data.
///
/// The simpler sibling of [`CursorPaginator`](super::CursorPaginator) for
/// sources without a natural ordering cursor, such as arbitrary search
/// result sets. Tracks only the next page number (`offset = page *
/// page_size`), always appends on `load_more`, and has no previous-page
/// support.
pub struct OffsetPaginator<T> {
    page_size: usize,
    state_tx: watch::Sender<PaginationUiState<T>>,
    /// Next page number to fetch.
    page: Mutex<usize>,
    in_flight: AtomicBool,
}

impl<T: Clone + Send + Sync> OffsetPaginator<T> {
    /// Create a paginator fetching `page_size` items per page.
    pub fn new(page_size: usize) -> Self {
        let (state_tx, _) = watch::channel(PaginationUiState::default());
        Self {
            page_size,
            state_tx,
            page: Mutex::new(0),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Latest published state.
    pub fn state(&self) -> PaginationUiState<T> {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<PaginationUiState<T>> {
        self.state_tx.subscribe()
    }

    /// Configured page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Load the first page, replacing any current items.
    pub async fn load_initial<L: PageLoader<T>>(&self, loader: &L) {
        if !self.begin() {
            trace!("load_initial skipped: another load in flight");
            return;
        }
        self.run_initial(loader).await;
        self.finish();
    }

    /// Fetch the next page and append it.
    ///
    /// No-op unless the state reports `can_load_more`. A failure clears the
    /// loading flag, keeps the items, and surfaces no error.
    pub async fn load_more<L: PageLoader<T>>(&self, loader: &L) {
        if !self.begin() {
            trace!("load_more skipped: another load in flight");
            return;
        }
        if !self.state().can_load_more() {
            self.finish();
            return;
        }

        let offset = self.current_page() * self.page_size;
        self.mutate(|s| s.is_loading_more = true);

        let request = PageRequest {
            limit: self.page_size,
            direction: PageDirection::Backward,
            start: PageStart::Offset(offset),
        };
        match loader.load_page(request).await {
            Ok(new_items) => {
                self.advance_page();
                let has_more = new_items.len() >= self.page_size;
                self.mutate(|s| {
                    s.is_loading_more = false;
                    s.has_more_pages = has_more;
                    s.items.extend(new_items);
                });
            }
            Err(err) => {
                warn!(error = %err, "load_more failed; keeping current items");
                self.mutate(|s| s.is_loading_more = false);
            }
        }
        self.finish();
    }

    /// Discard everything and reload the first page.
    pub async fn refresh<L: PageLoader<T>>(&self, loader: &L) {
        if !self.begin() {
            trace!("refresh skipped: another load in flight");
            return;
        }
        self.reset_inner();
        self.run_initial(loader).await;
        self.finish();
    }

    /// Drop items, page counter, flags, and error.
    pub fn reset(&self) {
        self.reset_inner();
    }

    async fn run_initial<L: PageLoader<T>>(&self, loader: &L) {
        self.set_page(0);
        self.mutate(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let request = PageRequest {
            limit: self.page_size,
            direction: PageDirection::Backward,
            start: PageStart::Offset(0),
        };
        match loader.load_page(request).await {
            Ok(items) => {
                self.set_page(1);
                let has_more = items.len() >= self.page_size;
                self.mutate(|s| {
                    s.is_loading = false;
                    s.items = items;
                    s.has_more_pages = has_more;
                });
            }
            Err(err) => {
                warn!(error = %err, "initial load failed");
                self.mutate(|s| {
                    s.is_loading = false;
                    s.error = Some(err);
                });
            }
        }
    }

    fn reset_inner(&self) {
        self.set_page(0);
        self.state_tx.send_replace(PaginationUiState::default());
    }

    fn current_page(&self) -> usize {
        self.page.lock().map(|p| *p).unwrap_or(0)
    }

    fn set_page(&self, page: usize) {
        if let Ok(mut guard) = self.page.lock() {
            *guard = page;
        }
    }

    fn advance_page(&self) {
        if let Ok(mut guard) = self.page.lock() {
            *guard += 1;
        }
    }

    fn begin(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn finish(&self) {
        self.in_flight.store(false, Ordering::Release);
    }

    fn mutate(&self, f: impl FnOnce(&mut PaginationUiState<T>)) {
        let mut next = self.state_tx.borrow().clone();
        f(&mut next);
        self.state_tx.send_replace(next);
    }
}
