use crate::queries;
use crate::DbError;
use core_types::{
    Amendment, AmendmentOption, ContractValue, DashboardFilter, DisciplineOption, MonthlyCost, MonthlyPob,
    PamfCategoryTotal, PamfDisciplineTotal, PeriodFilter, Project, ProjectEvent, ProjectProgress,
    SubcontractorOption, SummarySnapshot, VariationOrder,
};
use sqlx::postgres::PgPool;

/// The code of the amendment that holds the contract as first signed.
pub const ORIGINAL_AMENDMENT_CODE: &str = "ORIGINAL";

/// The raw rows behind the filter bar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptionRows {
    pub years: Vec<i32>,
    pub amendments: Vec<AmendmentOption>,
    pub disciplines: Vec<DisciplineOption>,
    pub subcontractors: Vec<SubcontractorOption>,
}

/// The `DbRepository` provides a high-level, application-specific interface
/// to the dashboard tables. It encapsulates all SQL and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Fetches everything the KPI summary needs. Independent queries run concurrently.
    pub async fn summary_snapshot(&self) -> Result<SummarySnapshot, DbError> {
        let (latest_amendment, original, pamf_count, amendment_count, subcontractor_count, project) = tokio::try_join!(
            self.latest_amendment(),
            self.amendment_by_code(ORIGINAL_AMENDMENT_CODE),
            self.count(queries::COUNT_PAMF_CLAIMS),
            self.count(queries::COUNT_AMENDMENTS),
            self.count(queries::COUNT_SUBCONTRACTORS),
            self.first_project(),
        )?;

        let (latest_values, original_values) = tokio::try_join!(
            self.contract_values_for(latest_amendment.as_ref()),
            self.contract_values_for(original.as_ref()),
        )?;

        tracing::debug!(
            latest = latest_amendment.as_ref().map(|a| a.amendment_code.as_str()),
            latest_lines = latest_values.len(),
            original_lines = original_values.len(),
            "Loaded summary snapshot."
        );

        Ok(SummarySnapshot {
            latest_amendment,
            latest_values,
            original_values,
            pamf_count,
            amendment_count,
            subcontractor_count,
            project,
        })
    }

    /// The amendment with the highest id, if any.
    pub async fn latest_amendment(&self) -> Result<Option<Amendment>, DbError> {
        let amendment = sqlx::query_as::<_, Amendment>(queries::LATEST_AMENDMENT)
            .fetch_optional(&self.pool)
            .await?;
        Ok(amendment)
    }

    pub async fn amendment_by_code(&self, code: &str) -> Result<Option<Amendment>, DbError> {
        let amendment = sqlx::query_as::<_, Amendment>(queries::AMENDMENT_BY_CODE)
            .bind(code.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(amendment)
    }

    /// Fetches the amendments matching the filter together with all of their line items.
    pub async fn contract_evolution(
        &self,
        filter: &DashboardFilter,
    ) -> Result<(Vec<Amendment>, Vec<ContractValue>), DbError> {
        let amendments = queries::amendments(filter)
            .build_query_as::<Amendment>()
            .fetch_all(&self.pool)
            .await?;
        if amendments.is_empty() {
            return Ok((amendments, Vec::new()));
        }

        let ids: Vec<i32> = amendments.iter().map(|a| a.amendment_id).collect();
        let values = sqlx::query_as::<_, ContractValue>(queries::CONTRACT_VALUES_FOR_AMENDMENTS)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok((amendments, values))
    }

    pub async fn monthly_costs(&self, period: &PeriodFilter) -> Result<Vec<MonthlyCost>, DbError> {
        let rows = queries::monthly_costs(period)
            .build_query_as::<MonthlyCost>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn pamf_by_discipline(&self, discipline_ids: &[i32]) -> Result<Vec<PamfDisciplineTotal>, DbError> {
        let rows = queries::pamf_by_discipline(discipline_ids)
            .build_query_as::<PamfDisciplineTotal>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// The `limit` largest claim categories by claimed amount.
    pub async fn pamf_top_categories(
        &self,
        discipline_ids: &[i32],
        limit: usize,
    ) -> Result<Vec<PamfCategoryTotal>, DbError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = queries::pamf_top_categories(discipline_ids, limit)
            .build_query_as::<PamfCategoryTotal>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn monthly_pob(&self, period: &PeriodFilter) -> Result<Vec<MonthlyPob>, DbError> {
        let rows = queries::monthly_pob(period)
            .build_query_as::<MonthlyPob>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn project_progress(&self, filter: &DashboardFilter) -> Result<Vec<ProjectProgress>, DbError> {
        let rows = queries::project_progress(filter)
            .build_query_as::<ProjectProgress>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn variation_orders(&self, filter: &DashboardFilter) -> Result<Vec<VariationOrder>, DbError> {
        let rows = queries::variation_orders(filter)
            .build_query_as::<VariationOrder>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn events(&self, filter: &DashboardFilter) -> Result<Vec<ProjectEvent>, DbError> {
        let rows = queries::events(filter)
            .build_query_as::<ProjectEvent>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Fetches the four filter option lists concurrently.
    pub async fn filter_option_rows(&self) -> Result<FilterOptionRows, DbError> {
        let (years, amendments, disciplines, subcontractors) = tokio::try_join!(
            sqlx::query_scalar::<_, i32>(queries::COST_YEARS).fetch_all(&self.pool),
            sqlx::query_as::<_, AmendmentOption>(queries::AMENDMENT_OPTIONS).fetch_all(&self.pool),
            sqlx::query_as::<_, DisciplineOption>(queries::DISCIPLINE_OPTIONS).fetch_all(&self.pool),
            sqlx::query_as::<_, SubcontractorOption>(queries::SUBCONTRACTOR_OPTIONS).fetch_all(&self.pool),
        )?;
        Ok(FilterOptionRows { years, amendments, disciplines, subcontractors })
    }

    async fn contract_values_for(&self, amendment: Option<&Amendment>) -> Result<Vec<ContractValue>, DbError> {
        let Some(amendment) = amendment else {
            return Ok(Vec::new());
        };
        let values = sqlx::query_as::<_, ContractValue>(queries::CONTRACT_VALUES_FOR_AMENDMENT)
            .bind(amendment.amendment_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(values)
    }

    async fn count(&self, sql: &'static str) -> Result<i64, DbError> {
        let count = sqlx::query_scalar::<_, i64>(sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn first_project(&self) -> Result<Option<Project>, DbError> {
        let project = sqlx::query_as::<_, Project>(queries::FIRST_PROJECT)
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }
}
