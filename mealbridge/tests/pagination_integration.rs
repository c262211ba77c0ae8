//! Integration tests for the pagination state managers.
//!
//! Drives the cursor and offset paginators against an in-memory backend that
//! honors the loader contract (cursor filtering, offset windows), the way
//! the hosted-database wrapper does in the app shell.
//!
//! Run with: `cargo test --test pagination_integration`

#![allow(clippy::type_complexity)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mealbridge::pagination::{
    CursorPaginator, LoadError, OffsetPaginator, PageDirection, PageRequest, PageStart,
};

#[derive(Debug, Clone, PartialEq)]
struct Listing {
    id: u32,
    title: String,
}

fn listings(total: u32) -> Arc<Vec<Listing>> {
    Arc::new(
        (1..=total)
            .map(|id| Listing {
                id,
                title: format!("Surplus box #{id}"),
            })
            .collect(),
    )
}

/// Loader over an id-ordered table: backward pages return ids after the
/// cursor, forward pages return the ids just before it.
fn feed_loader(
    backend: Arc<Vec<Listing>>,
    calls: Arc<AtomicUsize>,
) -> impl Fn(
    PageRequest,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<Listing>, LoadError>> + Send>>
       + Send
       + Sync {
    move |request: PageRequest| {
        calls.fetch_add(1, Ordering::SeqCst);
        let backend = Arc::clone(&backend);
        Box::pin(async move {
            let PageStart::Cursor { value, column } = request.start else {
                return Err(LoadError::Request("expected cursor start".into()));
            };
            assert_eq!(column, "created_at");
            let page = match request.direction {
                PageDirection::Backward => {
                    let after = value.map(|v| v.parse::<u32>().unwrap()).unwrap_or(0);
                    backend
                        .iter()
                        .filter(|l| l.id > after)
                        .take(request.limit)
                        .cloned()
                        .collect()
                }
                PageDirection::Forward => {
                    let before = value.map(|v| v.parse::<u32>().unwrap()).unwrap_or(u32::MAX);
                    let earlier: Vec<Listing> = backend
                        .iter()
                        .filter(|l| l.id < before)
                        .cloned()
                        .collect();
                    let start = earlier.len().saturating_sub(request.limit);
                    earlier[start..].to_vec()
                }
            };
            Ok(page)
        })
    }
}

fn search_loader(
    backend: Arc<Vec<Listing>>,
) -> impl Fn(
    PageRequest,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<Listing>, LoadError>> + Send>>
       + Send
       + Sync {
    move |request: PageRequest| {
        let backend = Arc::clone(&backend);
        Box::pin(async move {
            let PageStart::Offset(offset) = request.start else {
                return Err(LoadError::Request("expected offset start".into()));
            };
            Ok(backend
                .iter()
                .skip(offset)
                .take(request.limit)
                .cloned()
                .collect())
        })
    }
}

fn cursor_paginator(page_size: usize) -> CursorPaginator<Listing> {
    CursorPaginator::new(page_size, "created_at", |l: &Listing| l.id.to_string())
}

// ============================================================================
// Cursor pagination
// ============================================================================

#[tokio::test]
async fn cursor_walk_through_a_35_item_feed() {
    // Page size 20 over 35 items: a full page, then a short one.
    let backend = listings(35);
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = feed_loader(backend, Arc::clone(&calls));
    let paginator = cursor_paginator(20);

    paginator.load_initial(&loader).await;
    let state = paginator.state();
    assert_eq!(state.items.len(), 20);
    assert!(state.has_more_pages);
    assert_eq!(paginator.next_cursor().as_deref(), Some("20"));
    assert_eq!(paginator.previous_cursor().as_deref(), Some("1"));

    paginator.load_more(&loader).await;
    let state = paginator.state();
    assert_eq!(state.items.len(), 35);
    assert!(!state.has_more_pages);
    assert_eq!(paginator.next_cursor().as_deref(), Some("35"));

    // Nothing left; the guard stops further fetches.
    paginator.load_more(&loader).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn three_full_pages_accumulate_in_order() {
    let backend = listings(100);
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = feed_loader(backend, Arc::clone(&calls));
    let paginator = cursor_paginator(10);

    paginator.load_initial(&loader).await;
    paginator.load_more(&loader).await;
    paginator.load_more(&loader).await;

    let state = paginator.state();
    assert_eq!(state.items.len(), 30);
    assert!(state.has_more_pages);
    let ids: Vec<u32> = state.items.iter().map(|l| l.id).collect();
    let expected: Vec<u32> = (1..=30).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn load_previous_backfills_newer_items() {
    // Deep-link style: land mid-feed, then pull newer items in above.
    let backend = listings(30);
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = feed_loader(Arc::clone(&backend), Arc::clone(&calls));
    let paginator = cursor_paginator(10);

    paginator.load_initial(&loader).await;
    // Simulate realtime inserts that raised the head boundary to id 11.
    paginator.remove(|l| l.id <= 10);
    paginator.prepend(Listing {
        id: 11,
        title: "Surplus box #11".into(),
    });
    paginator.remove(|l| l.id == 11);

    paginator.load_previous(&loader).await;
    let state = paginator.state();
    let ids: Vec<u32> = state.items.iter().map(|l| l.id).collect();
    // Forward page of 10 before id 11, prepended in order.
    assert_eq!(ids[..10], (1..=10).collect::<Vec<u32>>()[..]);
    assert!(state.has_previous_pages);
}

#[tokio::test]
async fn refresh_after_backend_change_discards_stale_window() {
    let calls = Arc::new(AtomicUsize::new(0));
    let paginator = cursor_paginator(5);

    let loader = feed_loader(listings(5), Arc::clone(&calls));
    paginator.load_initial(&loader).await;
    assert_eq!(paginator.state().items.len(), 5);

    // Backend grew; refresh discards and reloads from the top.
    let loader = feed_loader(listings(12), Arc::clone(&calls));
    paginator.refresh(&loader).await;

    let state = paginator.state();
    assert_eq!(state.items.len(), 5);
    assert_eq!(state.items[0].id, 1);
    assert!(state.has_more_pages);
}

#[tokio::test]
async fn realtime_push_then_scroll_continues_cleanly() {
    let backend = listings(8);
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = feed_loader(backend, Arc::clone(&calls));
    let paginator = cursor_paginator(4);

    paginator.load_initial(&loader).await;

    // A neighbor posts a new listing; realtime pushes it to the head.
    paginator.prepend(Listing {
        id: 99,
        title: "Surplus box #99".into(),
    });
    assert_eq!(paginator.previous_cursor().as_deref(), Some("99"));

    // Scrolling down still continues from the tail cursor.
    paginator.load_more(&loader).await;
    let ids: Vec<u32> = paginator.state().items.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![99, 1, 2, 3, 4, 5, 6, 7, 8]);
}

#[tokio::test]
async fn failing_backend_keeps_ui_state_usable() {
    let flaky = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let toggle = Arc::clone(&flaky);
    let backend = listings(20);
    let loader = move |request: PageRequest| {
        let backend = Arc::clone(&backend);
        let flaky = Arc::clone(&toggle);
        async move {
            if flaky.load(Ordering::SeqCst) {
                return Err(LoadError::Request("connection reset".into()));
            }
            let PageStart::Cursor { value, .. } = request.start else {
                return Err(LoadError::Request("expected cursor start".into()));
            };
            let after = value.map(|v| v.parse::<u32>().unwrap()).unwrap_or(0);
            Ok(backend
                .iter()
                .filter(|l| l.id > after)
                .take(request.limit)
                .cloned()
                .collect::<Vec<Listing>>())
        }
    };
    let paginator = cursor_paginator(5);

    paginator.load_initial(&loader).await;
    assert_eq!(paginator.state().items.len(), 5);

    // Incremental failure: items survive, no error surfaces.
    flaky.store(true, Ordering::SeqCst);
    paginator.load_more(&loader).await;
    let state = paginator.state();
    assert_eq!(state.items.len(), 5);
    assert!(state.error.is_none());

    // Recovery: the same cursor is retried and the walk continues.
    flaky.store(false, Ordering::SeqCst);
    paginator.load_more(&loader).await;
    assert_eq!(paginator.state().items.len(), 10);
}

// ============================================================================
// Offset pagination
// ============================================================================

#[tokio::test]
async fn offset_walk_through_search_results() {
    let backend = listings(23);
    let loader = search_loader(backend);
    let paginator = OffsetPaginator::<Listing>::new(10);

    paginator.load_initial(&loader).await;
    paginator.load_more(&loader).await;
    paginator.load_more(&loader).await;

    let state = paginator.state();
    assert_eq!(state.items.len(), 23);
    assert!(!state.has_more_pages, "a 3-item page ends the walk");

    let ids: Vec<u32> = state.items.iter().map(|l| l.id).collect();
    let expected: Vec<u32> = (1..=23).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn offset_refresh_restarts_the_walk() {
    let backend = listings(30);
    let loader = search_loader(backend);
    let paginator = OffsetPaginator::<Listing>::new(10);

    paginator.load_initial(&loader).await;
    paginator.load_more(&loader).await;
    assert_eq!(paginator.state().items.len(), 20);

    paginator.refresh(&loader).await;
    let state = paginator.state();
    assert_eq!(state.items.len(), 10);
    assert_eq!(state.items[0].id, 1);
    assert!(state.has_more_pages);
}

#[tokio::test]
async fn empty_search_settles_into_empty_state() {
    let loader = search_loader(listings(0));
    let paginator = OffsetPaginator::<Listing>::new(10);

    paginator.load_initial(&loader).await;

    let state = paginator.state();
    assert!(state.is_empty());
    assert!(!state.has_more_pages);
    assert!(state.error.is_none());
}
