//! # Tangguh Web Server
//!
//! The read-only JSON API behind the dashboard. Every chart view has one `GET`
//! route under `/api/bp`; filters arrive as query parameters.

use analytics::AnalyticsEngine;
use axum::{Router, routing::get};
use database::DbRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

pub use error::AppError;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub db_repo: DbRepository,
    pub engine: AnalyticsEngine,
}

impl AppState {
    pub fn new(db_repo: DbRepository) -> Self {
        Self { db_repo, engine: AnalyticsEngine::new() }
    }
}

/// Builds the application router with its middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    let api = Router::new()
        .route("/summary", get(handlers::get_summary))
        .route("/filter-options", get(handlers::get_filter_options))
        .route("/contract-evolution", get(handlers::get_contract_evolution))
        .route("/monthly-cost", get(handlers::get_monthly_cost))
        .route("/cost-breakdown", get(handlers::get_cost_breakdown))
        .route("/pamf-analysis", get(handlers::get_pamf_analysis))
        .route("/pob-timeline", get(handlers::get_pob_timeline))
        .route("/project-progress", get(handlers::get_project_progress))
        .route("/variation-orders", get(handlers::get_variation_orders))
        .route("/events", get(handlers::get_events));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/bp", api)
        .with_state(state)
        .layer(cors)
        // Logs every incoming request and its latency.
        .layer(TraceLayer::new_for_http())
}

/// Binds `addr` and serves the API until Ctrl-C.
pub async fn run_server(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
    }
}
