//! MealBridge client data-loading core.
//!
//! This library is the speculative-fetch and pagination engine behind the
//! MealBridge mobile shells: a prefetch queue with device-aware admission
//! control, a navigation predictor that feeds it priority hints, and
//! cursor/offset pagination state managers for scrolling lists.
//!
//! The crate performs no I/O of its own. Network fetches are delegated to a
//! caller-supplied [`scheduler::PrefetchDispatcher`] and page loads to a
//! [`pagination::PageLoader`]; this core decides *whether and when* to fetch
//! and owns the bookkeeping either way.
//!
//! # High-Level API
//!
//! The [`service`] module provides the composition-root facade most shells
//! should wire up once at startup:
//!
//! ```ignore
//! use std::sync::Arc;
//! use mealbridge::device::StaticDeviceState;
//! use mealbridge::prefetch::PrefetchConfig;
//! use mealbridge::service::PrefetchService;
//!
//! let provider = Arc::new(StaticDeviceState::wifi());
//! let service = PrefetchService::new(PrefetchConfig::standard(), provider);
//!
//! service.prefetch_listing_detail("listing-42");
//! ```

pub mod device;
pub mod logging;
pub mod navigation;
pub mod pagination;
pub mod prefetch;
pub mod scheduler;
pub mod service;

/// Version of the MealBridge core library.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
