//! # Tangguh Database Crate
//!
//! This crate is the dashboard's only door to PostgreSQL.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** All SQL lives here. The rest of the workspace asks for rows
//!   through `DbRepository` and never sees a query string.
//! - **Parameterized Filters:** Request filters become `WHERE` clauses through
//!   `sqlx::QueryBuilder`, so every user-supplied value is a bound parameter.
//! - **Asynchronous & Pooled:** All operations are asynchronous and share one `PgPool`.
//!
//! ## Public API
//!
//! - `connect` / `connect_lazy`: build the connection pool.
//! - `run_migrations`: apply the embedded schema migrations.
//! - `DbRepository`: one read method per dashboard data set.
//! - `DbError`: the specific error types that can be returned from this crate.

pub mod connection;
pub mod error;
pub mod queries;
pub mod repository;

pub use connection::{connect, connect_lazy, run_migrations, ConnectionOptions};
pub use error::DbError;
pub use repository::{DbRepository, FilterOptionRows};
