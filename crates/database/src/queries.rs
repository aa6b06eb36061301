//! SQL for every dashboard data set.
//!
//! Static queries are plain constants. Filtered queries are assembled with
//! `QueryBuilder`, appending one condition per active filter and binding every value.

use chrono::NaiveDate;
use core_types::{DashboardFilter, PeriodFilter};
use sqlx::{Postgres, QueryBuilder};

pub type Query = QueryBuilder<'static, Postgres>;

const AMENDMENT_COLUMNS: &str = "amendment_id, amendment_code, amendment_name, effective_date, \
     lump_sum_value, reimbursable_value, provisional_sum_value, backcharge_value, total_contract_value";

pub const LATEST_AMENDMENT: &str = "SELECT amendment_id, amendment_code, amendment_name, effective_date, \
     lump_sum_value, reimbursable_value, provisional_sum_value, backcharge_value, total_contract_value \
     FROM tb_m_amendment ORDER BY amendment_id DESC LIMIT 1";

pub const AMENDMENT_BY_CODE: &str = "SELECT amendment_id, amendment_code, amendment_name, effective_date, \
     lump_sum_value, reimbursable_value, provisional_sum_value, backcharge_value, total_contract_value \
     FROM tb_m_amendment WHERE amendment_code = $1 LIMIT 1";

pub const CONTRACT_VALUES_FOR_AMENDMENT: &str =
    "SELECT amendment_id, description, amount_usd FROM tb_t_contract_value WHERE amendment_id = $1 ORDER BY id ASC";

pub const CONTRACT_VALUES_FOR_AMENDMENTS: &str =
    "SELECT amendment_id, description, amount_usd FROM tb_t_contract_value WHERE amendment_id = ANY($1) ORDER BY id ASC";

pub const FIRST_PROJECT: &str =
    "SELECT project_id, project_code, project_name, start_date, end_date FROM tb_m_project ORDER BY project_id ASC LIMIT 1";

pub const COUNT_PAMF_CLAIMS: &str = "SELECT COUNT(*) FROM tb_t_pamf_claim";
pub const COUNT_AMENDMENTS: &str = "SELECT COUNT(*) FROM tb_m_amendment";
pub const COUNT_SUBCONTRACTORS: &str = "SELECT COUNT(*) FROM tb_m_subcontractor";

pub const COST_YEARS: &str = "SELECT DISTINCT year FROM tb_t_monthly_cost ORDER BY year ASC";
pub const AMENDMENT_OPTIONS: &str =
    "SELECT amendment_id, amendment_code FROM tb_m_amendment ORDER BY amendment_id ASC";
pub const DISCIPLINE_OPTIONS: &str =
    "SELECT discipline_id, discipline_code, discipline_name FROM tb_m_cost_discipline ORDER BY discipline_id ASC";
pub const SUBCONTRACTOR_OPTIONS: &str =
    "SELECT subcontractor_id, subcontractor_name FROM tb_m_subcontractor ORDER BY subcontractor_id ASC";

/// The PAMF hierarchy level that holds individual claim categories.
pub const PAMF_CATEGORY_LEVEL: i32 = 2;

/// Tracks whether the next condition opens the `WHERE` clause or extends it.
#[derive(Debug, Default)]
struct Conditions {
    started: bool,
}

impl Conditions {
    fn already_started() -> Self {
        Self { started: true }
    }

    fn next(&mut self, qb: &mut Query) {
        qb.push(if self.started { " AND " } else { " WHERE " });
        self.started = true;
    }
}

fn push_period(qb: &mut Query, conditions: &mut Conditions, period: &PeriodFilter, year: &str, month: &str) {
    match *period {
        PeriodFilter::All => {}
        PeriodFilter::Year(y) => {
            conditions.next(qb);
            qb.push(year).push(" = ").push_bind(y);
        }
        PeriodFilter::Range { start, end } => {
            if let Some(start) = start {
                conditions.next(qb);
                qb.push("(").push(year).push(" > ").push_bind(start.year);
                qb.push(" OR (").push(year).push(" = ").push_bind(start.year);
                qb.push(" AND ").push(month).push(" >= ").push_bind(start.month as i32).push("))");
            }
            if let Some(end) = end {
                conditions.next(qb);
                qb.push("(").push(year).push(" < ").push_bind(end.year);
                qb.push(" OR (").push(year).push(" = ").push_bind(end.year);
                qb.push(" AND ").push(month).push(" <= ").push_bind(end.month as i32).push("))");
            }
        }
    }
}

fn push_ids(qb: &mut Query, conditions: &mut Conditions, column: &str, ids: &[i32]) {
    if ids.is_empty() {
        return;
    }
    conditions.next(qb);
    qb.push(column).push(" = ANY(").push_bind(ids.to_vec()).push(")");
}

fn push_date_range(
    qb: &mut Query,
    conditions: &mut Conditions,
    column: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) {
    if let Some(start) = start {
        conditions.next(qb);
        qb.push(column).push(" >= ").push_bind(start);
    }
    if let Some(end) = end {
        conditions.next(qb);
        qb.push(column).push(" <= ").push_bind(end);
    }
}

pub fn amendments(filter: &DashboardFilter) -> Query {
    let mut qb = Query::new(format!("SELECT {AMENDMENT_COLUMNS} FROM tb_m_amendment"));
    let mut conditions = Conditions::default();
    push_ids(&mut qb, &mut conditions, "amendment_id", &filter.amendment_ids);
    push_date_range(&mut qb, &mut conditions, "effective_date", filter.start_date, filter.end_date);
    qb.push(" ORDER BY amendment_id ASC");
    qb
}

pub fn monthly_costs(period: &PeriodFilter) -> Query {
    let mut qb = Query::new("SELECT year, month, cost_type, monthly_amount_musd FROM tb_t_monthly_cost");
    push_period(&mut qb, &mut Conditions::default(), period, "year", "month");
    qb.push(" ORDER BY year ASC, month ASC");
    qb
}

pub fn pamf_by_discipline(discipline_ids: &[i32]) -> Query {
    let mut qb = Query::new(
        "SELECT discipline, COALESCE(SUM(claim_amount_usd), 0) AS claim_amount, \
         COALESCE(SUM(pamf_count), 0) AS pamf_count FROM tb_t_pamf_claim",
    );
    push_ids(&mut qb, &mut Conditions::default(), "discipline_id", discipline_ids);
    qb.push(" GROUP BY discipline ORDER BY discipline ASC");
    qb
}

pub fn pamf_top_categories(discipline_ids: &[i32], limit: i64) -> Query {
    let mut qb = Query::new(
        "SELECT label AS category, COALESCE(SUM(claim_amount_usd), 0) AS claim_amount, \
         COALESCE(SUM(pamf_count), 0) AS pamf_count FROM tb_t_pamf_claim WHERE level = ",
    );
    qb.push_bind(PAMF_CATEGORY_LEVEL);
    push_ids(&mut qb, &mut Conditions::already_started(), "discipline_id", discipline_ids);
    qb.push(" GROUP BY label ORDER BY claim_amount DESC, label ASC LIMIT ").push_bind(limit);
    qb
}

pub fn monthly_pob(period: &PeriodFilter) -> Query {
    let mut qb = Query::new("SELECT year, month, pob_count, isolation_count, remarks FROM tb_t_monthly_pob");
    push_period(&mut qb, &mut Conditions::default(), period, "year", "month");
    qb.push(" ORDER BY year ASC, month ASC");
    qb
}

pub fn project_progress(filter: &DashboardFilter) -> Query {
    let mut qb = Query::new(
        "SELECT p.year, p.month, p.subcontractor, s.subcontractor_name, p.plan_progress_pct, p.overall_progress_pct \
         FROM tb_t_project_progress AS p \
         LEFT JOIN tb_m_subcontractor AS s ON s.subcontractor_id = p.subcontractor_id",
    );
    let mut conditions = Conditions::default();
    push_period(&mut qb, &mut conditions, &filter.period(), "p.year", "p.month");
    push_ids(&mut qb, &mut conditions, "p.subcontractor_id", &filter.subcontractor_ids);
    qb.push(" ORDER BY p.year ASC, p.month ASC, p.id ASC");
    qb
}

pub fn variation_orders(filter: &DashboardFilter) -> Query {
    let mut qb = Query::new(
        "SELECT vo_id, vo_number, vo_name, amount_usd, status, approved_in_amendment, approved_date \
         FROM tb_t_variation_order",
    );
    let mut conditions = Conditions::default();
    push_ids(&mut qb, &mut conditions, "approved_in_amendment", &filter.amendment_ids);
    push_date_range(&mut qb, &mut conditions, "approved_date", filter.start_date, filter.end_date);
    qb.push(" ORDER BY vo_id ASC");
    qb
}

pub fn events(filter: &DashboardFilter) -> Query {
    let mut qb = Query::new(
        "SELECT event_id, event_code, event_name, event_type, start_date, end_date, description FROM tb_m_event",
    );
    push_date_range(&mut qb, &mut Conditions::default(), "start_date", filter.start_date, filter.end_date);
    qb.push(" ORDER BY start_date ASC, event_id ASC");
    qb
}
