use crate::{AppState, error::AppError};
use analytics::engine::TOP_CATEGORY_LIMIT;
use analytics::{
    ContractEvolutionPoint, CostBreakdown, EventMarker, FilterOptions, MonthlyCostPoint, PamfAnalysis, PobPoint,
    ProgressSeries, SummaryReport, VariationOrderItem,
};
use axum::{
    Json,
    extract::{RawQuery, State},
};
use core_types::{DashboardFilter, DashboardQuery};
use std::sync::Arc;
use url::form_urlencoded;

/// Reads the filter parameters from the raw query string.
///
/// Decoding itself never fails, so every malformed value reaches `DashboardFilter`
/// and comes back as a JSON 400.
fn parse(raw: Option<String>) -> Result<DashboardFilter, AppError> {
    let query = DashboardQuery::from_pairs(form_urlencoded::parse(raw.unwrap_or_default().as_bytes()));
    let filter = DashboardFilter::try_from(&query)?;
    tracing::debug!(?filter, "Parsed dashboard filters.");
    Ok(filter)
}

/// # GET /api/bp/summary
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Result<Json<SummaryReport>, AppError> {
    let snapshot = state
        .db_repo
        .summary_snapshot()
        .await
        .map_err(AppError::fetch("summary data"))?;
    Ok(Json(state.engine.summary(&snapshot)))
}

/// # GET /api/bp/filter-options
pub async fn get_filter_options(State(state): State<Arc<AppState>>) -> Result<Json<FilterOptions>, AppError> {
    let rows = state
        .db_repo
        .filter_option_rows()
        .await
        .map_err(AppError::fetch("filter options"))?;
    Ok(Json(state.engine.filter_options(
        rows.years,
        rows.amendments,
        rows.disciplines,
        rows.subcontractors,
    )))
}

/// # GET /api/bp/contract-evolution
/// Honors `amendmentIds` and a `startDate`/`endDate` window on the effective date.
pub async fn get_contract_evolution(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<ContractEvolutionPoint>>, AppError> {
    let filter = parse(query)?;
    let (amendments, values) = state
        .db_repo
        .contract_evolution(&filter)
        .await
        .map_err(AppError::fetch("contract evolution data"))?;
    Ok(Json(state.engine.contract_evolution(&amendments, &values)))
}

/// # GET /api/bp/monthly-cost
pub async fn get_monthly_cost(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<MonthlyCostPoint>>, AppError> {
    const RESOURCE: &str = "monthly cost data";
    let filter = parse(query)?;
    let rows = state
        .db_repo
        .monthly_costs(&filter.period())
        .await
        .map_err(AppError::fetch(RESOURCE))?;
    let points = state.engine.monthly_cost(&rows).map_err(AppError::analytics(RESOURCE))?;
    Ok(Json(points))
}

/// # GET /api/bp/cost-breakdown
pub async fn get_cost_breakdown(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<CostBreakdown>, AppError> {
    const RESOURCE: &str = "cost breakdown";
    let filter = parse(query)?;
    let (latest, claims) = tokio::try_join!(
        state.db_repo.latest_amendment(),
        state.db_repo.pamf_by_discipline(&filter.discipline_ids),
    )
    .map_err(AppError::fetch(RESOURCE))?;
    Ok(Json(state.engine.cost_breakdown(latest.as_ref(), &claims)))
}

/// # GET /api/bp/pamf-analysis
pub async fn get_pamf_analysis(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<PamfAnalysis>, AppError> {
    let filter = parse(query)?;
    let (categories, disciplines) = tokio::try_join!(
        state.db_repo.pamf_top_categories(&filter.discipline_ids, TOP_CATEGORY_LIMIT),
        state.db_repo.pamf_by_discipline(&filter.discipline_ids),
    )
    .map_err(AppError::fetch("PAMF analysis"))?;
    Ok(Json(state.engine.pamf_analysis(&categories, &disciplines)))
}

/// # GET /api/bp/pob-timeline
pub async fn get_pob_timeline(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<PobPoint>>, AppError> {
    const RESOURCE: &str = "POB data";
    let filter = parse(query)?;
    let rows = state
        .db_repo
        .monthly_pob(&filter.period())
        .await
        .map_err(AppError::fetch(RESOURCE))?;
    let points = state.engine.pob_timeline(&rows).map_err(AppError::analytics(RESOURCE))?;
    Ok(Json(points))
}

/// # GET /api/bp/project-progress
pub async fn get_project_progress(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<ProgressSeries>>, AppError> {
    const RESOURCE: &str = "project progress data";
    let filter = parse(query)?;
    let rows = state
        .db_repo
        .project_progress(&filter)
        .await
        .map_err(AppError::fetch(RESOURCE))?;
    let series = state.engine.project_progress(&rows).map_err(AppError::analytics(RESOURCE))?;
    Ok(Json(series))
}

/// # GET /api/bp/variation-orders
pub async fn get_variation_orders(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<VariationOrderItem>>, AppError> {
    let filter = parse(query)?;
    let rows = state
        .db_repo
        .variation_orders(&filter)
        .await
        .map_err(AppError::fetch("variation orders"))?;
    Ok(Json(state.engine.variation_orders(&rows)))
}

/// # GET /api/bp/events
/// Event markers drawn over the monthly charts.
pub async fn get_events(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<EventMarker>>, AppError> {
    let filter = parse(query)?;
    let rows = state.db_repo.events(&filter).await.map_err(AppError::fetch("events"))?;
    Ok(Json(state.engine.events(&rows)))
}
