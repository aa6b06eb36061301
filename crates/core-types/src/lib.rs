//! # Tangguh Core Types
//!
//! Layer 0 of the dashboard workspace. Every other crate speaks in these types:
//! the database rows, the shared filter state the charts subscribe to, and the
//! small numeric helpers used when shaping money for charts.
//!
//! This crate has no knowledge of HTTP or of how rows are fetched.

pub mod enums;
pub mod error;
pub mod filters;
pub mod palette;
pub mod structs;
pub mod units;

// Re-export the core types to provide a clean public API.
pub use enums::{CostType, FilterKey};
pub use error::CoreError;
pub use filters::{DashboardFilter, DashboardQuery, DateRange, FilterState, PeriodFilter, YearMonth};
pub use structs::{
    Amendment, AmendmentOption, ContractValue, DisciplineOption, MonthlyCost, MonthlyPob,
    PamfCategoryTotal, PamfDisciplineTotal, Project, ProjectEvent, ProjectProgress,
    SubcontractorOption, SummarySnapshot, VariationOrder,
};
