//! # Tangguh Dashboard Client
//!
//! The consumer side of the dashboard API.
//!
//! ## Architectural Principles
//!
//! - **One Shared Filter State:** `FilterStore` holds the filter bar's state. Charts
//!   subscribe to it instead of being handed filters by their parent.
//! - **Charts Pick Their Filters:** each `ChartView` declares the filter keys it reacts
//!   to, and only those reach its query string.
//! - **Trait-Based Access:** feeds talk to a `DashboardApi`, so the HTTP client can be
//!   swapped for a scripted one in tests.
//!
//! ## Public API
//!
//! - `DashboardApi` / `HttpDashboardClient`: typed access to every `/api/bp` route.
//! - `ChartView`, `ChartData`: the views and their decoded payloads.
//! - `FilterStore`: the observable filter state.
//! - `ChartFeed`, `ChartUpdate`, `ChartState`: per-chart fetch loops.

pub mod api;
pub mod data;
pub mod error;
pub mod feed;
pub mod store;
pub mod view;

pub use api::{DashboardApi, HttpDashboardClient};
pub use data::ChartData;
pub use error::ClientError;
pub use feed::{ChartFeed, ChartState, ChartUpdate};
pub use store::FilterStore;
pub use view::{ChartView, EVENT_KEYS, encode_query};
