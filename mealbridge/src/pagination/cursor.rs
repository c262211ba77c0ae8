//! Cursor-based pagination state manager.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tokio::sync::watch;
use tracing::{trace, warn};

use super::error::LoadError;
use super::loader::{PageDirection, PageLoader, PageRequest, PageStart};
use super::state::PaginationUiState;

/// Cursor bookkeeping for bidirectional scroll.
///
/// Cursors are always recomputed from the edges of the page that was just
/// merged in, never from the accumulated item list.
#[derive(Debug, Default)]
struct Cursors {
    /// Cursor of the last item of the most recent backward page.
    next: Option<String>,
    /// Cursor of the first item of the most recent forward page.
    previous: Option<String>,
}

/// Pagination state manager for cursor-ordered data (feeds, messages).
///
/// Generic over the item type; parameterized by page size, the cursor column
/// label forwarded opaquely to the loader, and a function extracting an
/// item's cursor value.
///
/// State is published through a `watch` channel as whole-snapshot
/// replacements. A single in-flight guard serializes `load_initial`,
/// `load_more`, `load_previous`, and `refresh`: a call racing another
/// operation is a no-op, so concurrent callers cannot double-fetch.
pub struct CursorPaginator<T> {
    page_size: usize,
    cursor_column: String,
    extract_cursor: Box<dyn Fn(&T) -> String + Send + Sync>,
    state_tx: watch::Sender<PaginationUiState<T>>,
    cursors: Mutex<Cursors>,
    in_flight: AtomicBool,
}

impl<T: Clone + Send + Sync> CursorPaginator<T> {
    /// Create a paginator.
    ///
    /// # Arguments
    ///
    /// * `page_size` - Items requested per page
    /// * `cursor_column` - Opaque column label passed through to the loader
    /// * `extract_cursor` - Maps an item to its cursor value
    pub fn new(
        page_size: usize,
        cursor_column: impl Into<String>,
        extract_cursor: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        let (state_tx, _) = watch::channel(PaginationUiState::default());
        Self {
            page_size,
            cursor_column: cursor_column.into(),
            extract_cursor: Box::new(extract_cursor),
            state_tx,
            cursors: Mutex::new(Cursors::default()),
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

    /// Cursor that the next backward fetch would start from.
    pub fn next_cursor(&self) -> Option<String> {
        self.cursors.lock().ok().and_then(|c| c.next.clone())
    }

    /// Cursor that the next forward fetch would start from.
    pub fn previous_cursor(&self) -> Option<String> {
        self.cursors.lock().ok().and_then(|c| c.previous.clone())
    }

    /// Load the first page, replacing any current items.
    ///
    /// No-op while another load is in flight. On failure the previous items
    /// are preserved and the error lands in the state.
    pub async fn load_initial<L: PageLoader<T>>(&self, loader: &L) {
        if !self.begin() {
            trace!("load_initial skipped: another load in flight");
            return;
        }
        self.run_initial(loader).await;
        self.finish();
    }

    /// Fetch the next (older) page and append it.
    ///
    /// No-op unless the state reports `can_load_more`. `has_more_pages` is
    /// recomputed from the size of the new page alone. A failure clears the
    /// loading flag but keeps the items and does not surface an error; the
    /// next scroll retriggers naturally.
    pub async fn load_more<L: PageLoader<T>>(&self, loader: &L) {
        if !self.begin() {
            trace!("load_more skipped: another load in flight");
            return;
        }
        if !self.state().can_load_more() {
            self.finish();
            return;
        }

        let cursor = self.next_cursor();
        self.mutate(|s| s.is_loading_more = true);

        let request = PageRequest {
            limit: self.page_size,
            direction: PageDirection::Backward,
            start: PageStart::Cursor {
                column: self.cursor_column.clone(),
                value: cursor,
            },
        };
        match loader.load_page(request).await {
            Ok(new_items) => {
                if let Some(last) = new_items.last() {
                    if let Ok(mut cursors) = self.cursors.lock() {
                        cursors.next = Some((self.extract_cursor)(last));
                    }
                }
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

    /// Fetch the previous (newer) page and prepend it.
    ///
    /// Symmetric to [`load_more`](Self::load_more): forward direction,
    /// prepend at the head, `previous_cursor` and `has_previous_pages`
    /// recomputed from the new page. No-op until a loaded page has
    /// established the forward boundary; newer items can appear at any
    /// time, so unlike `load_more` there is no full-page gate.
    pub async fn load_previous<L: PageLoader<T>>(&self, loader: &L) {
        if !self.begin() {
            trace!("load_previous skipped: another load in flight");
            return;
        }
        let Some(cursor) = self.previous_cursor() else {
            self.finish();
            return;
        };
        self.mutate(|s| s.is_loading_more = true);

        let request = PageRequest {
            limit: self.page_size,
            direction: PageDirection::Forward,
            start: PageStart::Cursor {
                column: self.cursor_column.clone(),
                value: Some(cursor),
            },
        };
        match loader.load_page(request).await {
            Ok(new_items) => {
                if let Some(first) = new_items.first() {
                    if let Ok(mut cursors) = self.cursors.lock() {
                        cursors.previous = Some((self.extract_cursor)(first));
                    }
                }
                let has_previous = new_items.len() >= self.page_size;
                self.mutate(|s| {
                    s.is_loading_more = false;
                    s.has_previous_pages = has_previous;
                    s.items.splice(0..0, new_items);
                });
            }
            Err(err) => {
                warn!(error = %err, "load_previous failed; keeping current items");
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

    /// Drop items, cursors, flags, and error.
    pub fn reset(&self) {
        self.reset_inner();
    }

    // ==================== Local mutation helpers ====================

    /// Insert a pushed item at the head, adopting its cursor as the new
    /// forward boundary. For realtime inserts outside the loader path.
    pub fn prepend(&self, item: T) {
        if let Ok(mut cursors) = self.cursors.lock() {
            cursors.previous = Some((self.extract_cursor)(&item));
        }
        self.mutate(|s| s.items.insert(0, item));
    }

    /// Insert an item at the tail, adopting its cursor as the new backward
    /// boundary.
    pub fn append(&self, item: T) {
        if let Ok(mut cursors) = self.cursors.lock() {
            cursors.next = Some((self.extract_cursor)(&item));
        }
        self.mutate(|s| s.items.push(item));
    }

    /// Remove every item matching the predicate.
    pub fn remove(&self, predicate: impl Fn(&T) -> bool) {
        self.mutate(|s| s.items.retain(|item| !predicate(item)));
    }

    /// Replace the first item whose extracted id matches `item`'s.
    pub fn update(&self, item: T, id_extractor: impl Fn(&T) -> String) {
        let id = id_extractor(&item);
        self.mutate(|s| {
            if let Some(slot) = s.items.iter_mut().find(|i| id_extractor(i) == id) {
                *slot = item;
            }
        });
    }

    /// Check whether `item` is the current last element.
    ///
    /// UI code calls this near the end of a scroll to trigger
    /// [`load_more`](Self::load_more).
    pub fn is_last_item(&self, item: &T, id_extractor: impl Fn(&T) -> String) -> bool {
        let state = self.state_tx.borrow();
        state
            .items
            .last()
            .map(|last| id_extractor(last) == id_extractor(item))
            .unwrap_or(false)
    }

    // ==================== Internals ====================

    async fn run_initial<L: PageLoader<T>>(&self, loader: &L) {
        self.mutate(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let request = PageRequest {
            limit: self.page_size,
            direction: PageDirection::Backward,
            start: PageStart::Cursor {
                column: self.cursor_column.clone(),
                value: None,
            },
        };
        match loader.load_page(request).await {
            Ok(items) => {
                if let Ok(mut cursors) = self.cursors.lock() {
                    cursors.next = items.last().map(|i| (self.extract_cursor)(i));
                    cursors.previous = items.first().map(|i| (self.extract_cursor)(i));
                }
                let has_more = items.len() >= self.page_size;
                self.mutate(|s| {
                    s.is_loading = false;
                    s.items = items;
                    s.has_more_pages = has_more;
                    s.has_previous_pages = false;
                });
            }
            Err(err) => {
                self.record_initial_error(err);
            }
        }
    }

    fn record_initial_error(&self, err: LoadError) {
        warn!(error = %err, "initial load failed");
        self.mutate(|s| {
            s.is_loading = false;
            s.error = Some(err);
        });
    }

    fn reset_inner(&self) {
        if let Ok(mut cursors) = self.cursors.lock() {
            *cursors = Cursors::default();
        }
        self.state_tx.send_replace(PaginationUiState::default());
    }

    /// Acquire the single-flight gate.
    fn begin(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn finish(&self) {
        self.in_flight.store(false, Ordering::Release);
    }

    /// Apply `f` to a copy of the current state and publish the result as a
    /// whole-snapshot replacement.
    fn mutate(&self, f: impl FnOnce(&mut PaginationUiState<T>)) {
        let mut next = self.state_tx.borrow().clone();
        f(&mut next);
        self.state_tx.send_replace(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
    }

    fn rows(range: std::ops::RangeInclusive<u32>) -> Vec<Row> {
        range.map(|id| Row { id }).collect()
    }

    fn paginator(page_size: usize) -> CursorPaginator<Row> {
        CursorPaginator::new(page_size, "created_at", |row: &Row| row.id.to_string())
    }

    /// Loader returning fixed pages in sequence, counting invocations.
    fn scripted_loader(
        pages: Vec<Result<Vec<Row>, LoadError>>,
    ) -> (
        impl Fn(PageRequest) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<Row>, LoadError>> + Send>>,
        Arc<AtomicUsize>,
    ) {
        let calls = Arc::new(AtomicUsize::new(0));
        let pages = Arc::new(pages);
        let counter = Arc::clone(&calls);
        let loader = move |_request: PageRequest| {
            let call = counter.fetch_add(1, Ordering::SeqCst);
            let pages = Arc::clone(&pages);
            Box::pin(async move {
                pages
                    .get(call)
                    .cloned()
                    .unwrap_or_else(|| Ok(Vec::new()))
            })
                as std::pin::Pin<
                    Box<dyn std::future::Future<Output = Result<Vec<Row>, LoadError>> + Send>,
                >
        };
        (loader, calls)
    }

    #[tokio::test]
    async fn test_load_initial_full_page() {
        let paginator = paginator(20);
        let (loader, _) = scripted_loader(vec![Ok(rows(1..=20))]);

        paginator.load_initial(&loader).await;

        let state = paginator.state();
        assert_eq!(state.items.len(), 20);
        assert!(state.has_more_pages);
        assert!(!state.is_loading);
        assert_eq!(paginator.next_cursor().as_deref(), Some("20"));
        assert_eq!(paginator.previous_cursor().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_load_more_partial_page_ends_pagination() {
        // A full page of 20 then a short page of 15 ends the walk at 35.
        let paginator = paginator(20);
        let (loader, _) = scripted_loader(vec![Ok(rows(1..=20)), Ok(rows(21..=35))]);

        paginator.load_initial(&loader).await;
        paginator.load_more(&loader).await;

        let state = paginator.state();
        assert_eq!(state.items.len(), 35);
        assert!(!state.has_more_pages);
        assert_eq!(paginator.next_cursor().as_deref(), Some("35"));
    }

    #[tokio::test]
    async fn test_three_full_pages_then_empty() {
        let paginator = paginator(10);
        let (loader, _) = scripted_loader(vec![
            Ok(rows(1..=10)),
            Ok(rows(11..=20)),
            Ok(rows(21..=30)),
            Ok(Vec::new()),
        ]);

        paginator.load_initial(&loader).await;
        paginator.load_more(&loader).await;
        paginator.load_more(&loader).await;

        let state = paginator.state();
        assert_eq!(state.items.len(), 30);
        assert!(state.has_more_pages);

        paginator.load_more(&loader).await;
        let state = paginator.state();
        assert_eq!(state.items.len(), 30);
        assert!(!state.has_more_pages);
    }

    #[tokio::test]
    async fn test_load_more_requests_next_cursor() {
        let paginator = paginator(3);
        let requests: Arc<Mutex<Vec<PageRequest>>> = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let loader = move |request: PageRequest| {
            seen.lock().unwrap().push(request.clone());
            async move { Ok(rows(1..=3)) }
        };

        paginator.load_initial(&loader).await;
        paginator.load_more(&loader).await;

        let requests = requests.lock().unwrap();
        assert_eq!(
            requests[0].start,
            PageStart::Cursor {
                column: "created_at".into(),
                value: None,
            }
        );
        assert_eq!(
            requests[1].start,
            PageStart::Cursor {
                column: "created_at".into(),
                value: Some("3".into()),
            }
        );
        assert_eq!(requests[1].direction, PageDirection::Backward);
    }

    #[tokio::test]
    async fn test_load_previous_prepends() {
        let paginator = paginator(3);
        let (loader, _) = scripted_loader(vec![Ok(rows(4..=6)), Ok(rows(1..=3))]);

        paginator.load_initial(&loader).await;
        paginator.load_previous(&loader).await;

        let state = paginator.state();
        let ids: Vec<u32> = state.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(paginator.previous_cursor().as_deref(), Some("1"));
        assert!(state.has_previous_pages);
    }

    #[tokio::test]
    async fn test_load_previous_before_initial_is_noop() {
        let paginator = paginator(3);
        let (loader, calls) = scripted_loader(vec![Ok(rows(1..=3))]);

        paginator.load_previous(&loader).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(paginator.state().items.is_empty());
    }

    #[tokio::test]
    async fn test_initial_failure_records_error() {
        let paginator = paginator(10);
        let (loader, _) = scripted_loader(vec![Err(LoadError::Request("supabase 500".into()))]);

        paginator.load_initial(&loader).await;

        let state = paginator.state();
        assert!(state.items.is_empty());
        assert!(!state.is_loading);
        assert_eq!(state.error, Some(LoadError::Request("supabase 500".into())));
    }

    #[tokio::test]
    async fn test_load_more_failure_is_swallowed() {
        let paginator = paginator(3);
        let (loader, _) = scripted_loader(vec![Ok(rows(1..=3)), Err(LoadError::Timeout)]);

        paginator.load_initial(&loader).await;
        paginator.load_more(&loader).await;

        let state = paginator.state();
        assert_eq!(state.items.len(), 3);
        assert!(!state.is_loading_more);
        assert!(state.error.is_none(), "incremental failures stay silent");
        assert!(state.has_more_pages, "a failed fetch proves nothing about the tail");
    }

    #[tokio::test]
    async fn test_concurrent_load_more_fetches_once() {
        let paginator = paginator(2);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let loader = move |request: PageRequest| {
            let calls = Arc::clone(&counter);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                let start = match request.start {
                    PageStart::Cursor {
                        value: Some(v), ..
                    } => v.parse::<u32>().unwrap() + 1,
                    _ => 1,
                };
                Ok(rows(start..=start + 1))
            }
        };

        paginator.load_initial(&loader).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::join!(
            paginator.load_more(&loader),
            paginator.load_more(&loader),
        );
        assert_eq!(
            calls.load(Ordering::SeqCst),
            2,
            "racing load_more must fetch exactly once"
        );
    }

    #[tokio::test]
    async fn test_load_more_without_more_pages_is_noop() {
        let paginator = paginator(10);
        let (loader, calls) = scripted_loader(vec![Ok(rows(1..=4))]);

        paginator.load_initial(&loader).await;
        assert!(!paginator.state().has_more_pages);

        paginator.load_more(&loader).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_discards_and_reloads() {
        let paginator = paginator(3);
        let (loader, calls) = scripted_loader(vec![Ok(rows(1..=3)), Ok(rows(7..=9))]);

        paginator.load_initial(&loader).await;
        paginator.refresh(&loader).await;

        let state = paginator.state();
        let ids: Vec<u32> = state.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![7, 8, 9]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(paginator.next_cursor().as_deref(), Some("9"));
    }

    #[tokio::test]
    async fn test_prepend_sets_previous_cursor() {
        let paginator = paginator(3);
        let (loader, _) = scripted_loader(vec![Ok(rows(2..=4))]);
        paginator.load_initial(&loader).await;

        paginator.prepend(Row { id: 1 });

        let state = paginator.state();
        assert_eq!(state.items[0].id, 1);
        assert_eq!(paginator.previous_cursor().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_append_sets_next_cursor() {
        let paginator = paginator(3);
        let (loader, _) = scripted_loader(vec![Ok(rows(1..=3))]);
        paginator.load_initial(&loader).await;

        paginator.append(Row { id: 4 });

        let state = paginator.state();
        assert_eq!(state.items.last().unwrap().id, 4);
        assert_eq!(paginator.next_cursor().as_deref(), Some("4"));
    }

    #[tokio::test]
    async fn test_remove_and_update() {
        let paginator = paginator(5);
        let (loader, _) = scripted_loader(vec![Ok(rows(1..=5))]);
        paginator.load_initial(&loader).await;

        paginator.remove(|row| row.id == 3);
        let ids: Vec<u32> = paginator.state().items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5]);

        paginator.update(Row { id: 4 }, |row| row.id.to_string());
        assert_eq!(paginator.state().items.len(), 4);
    }

    #[tokio::test]
    async fn test_is_last_item() {
        let paginator = paginator(3);
        let (loader, _) = scripted_loader(vec![Ok(rows(1..=3))]);
        paginator.load_initial(&loader).await;

        let id = |row: &Row| row.id.to_string();
        assert!(paginator.is_last_item(&Row { id: 3 }, id));
        assert!(!paginator.is_last_item(&Row { id: 1 }, id));
    }

    #[tokio::test]
    async fn test_watch_observers_see_snapshots() {
        let paginator = paginator(2);
        let mut rx = paginator.subscribe();
        let (loader, _) = scripted_loader(vec![Ok(rows(1..=2))]);

        paginator.load_initial(&loader).await;

        rx.changed().await.unwrap();
        let state = rx.borrow_and_update().clone();
        assert!(!state.is_loading);
        assert_eq!(state.items.len(), 2);
    }
}
