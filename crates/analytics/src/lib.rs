//! # Tangguh Analytics
//!
//! Turns database rows into the JSON-ready reports behind each dashboard view.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of the database
//!   or of HTTP. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` takes rows as input and produces
//!   report structs as output. Grouping, pivoting and unit conversion all happen here,
//!   which keeps the arithmetic testable against fixture rows.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: one method per dashboard view.
//! - `report`: the serializable report structs (the wire shapes).
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

pub mod engine;
pub mod error;
pub mod report;

pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{
    CategoryClaim, ContractEvolutionPoint, CostBreakdown, CostSplit, DisciplineChoice,
    DisciplineClaim, DisciplineScatterPoint, EventMarker, FilterOptions, IdCode, IdName,
    MonthlyCostPoint, PamfAnalysis, PobPoint, ProgressPoint, ProgressSeries, SummaryReport,
    VariationOrderItem, VariationOrderStats,
};
