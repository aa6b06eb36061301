use crate::enums::CostType;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from `tb_m_project`. The dashboard tracks a single project.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Project {
    pub project_id: i32,
    pub project_code: String,
    pub project_name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// A row from `tb_m_amendment`: one revision of the contract (ORIGINAL, AMD-1 .. AMD-5).
///
/// The category columns are the amendment's own split of the contract price and
/// are what the cost breakdown reports. The headline value shown everywhere else is
/// the sum of the amendment's `ContractValue` line items.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Amendment {
    pub amendment_id: i32,
    pub amendment_code: String,
    pub amendment_name: Option<String>,
    pub effective_date: Option<NaiveDate>,
    pub lump_sum_value: Option<Decimal>,
    pub reimbursable_value: Option<Decimal>,
    pub provisional_sum_value: Option<Decimal>,
    pub backcharge_value: Option<Decimal>,
    pub total_contract_value: Option<Decimal>,
}

/// A contract value line item from `tb_t_contract_value`.
/// Amounts are null for lines that only appear in later amendments.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ContractValue {
    pub amendment_id: i32,
    pub description: Option<String>,
    pub amount_usd: Option<Decimal>,
}

/// A row from `tb_t_monthly_cost`, amounts in millions of USD.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct MonthlyCost {
    pub year: i32,
    pub month: i32,
    pub cost_type: String,
    pub monthly_amount_musd: Decimal,
}

impl MonthlyCost {
    pub fn kind(&self) -> CostType {
        CostType::from(self.cost_type.as_str())
    }
}

/// PAMF claims summed per discipline.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PamfDisciplineTotal {
    pub discipline: String,
    pub claim_amount: Decimal,
    pub pamf_count: i64,
}

/// PAMF claims summed per level-2 label (claim category).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PamfCategoryTotal {
    pub category: String,
    pub claim_amount: Decimal,
    pub pamf_count: i64,
}

/// A row from `tb_t_monthly_pob`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct MonthlyPob {
    pub year: i32,
    pub month: i32,
    pub pob_count: i32,
    pub isolation_count: i32,
    pub remarks: Option<String>,
}

/// A row from `tb_t_project_progress` joined with the subcontractor master.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ProjectProgress {
    pub year: i32,
    pub month: i32,
    /// The name as written in the progress sheet.
    pub subcontractor: String,
    /// The master record's name, when the row is linked to one.
    pub subcontractor_name: Option<String>,
    pub plan_progress_pct: Decimal,
    pub overall_progress_pct: Decimal,
}

impl ProjectProgress {
    pub fn display_name(&self) -> &str {
        match self.subcontractor_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.subcontractor,
        }
    }
}

/// A row from `tb_t_variation_order`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct VariationOrder {
    pub vo_id: i32,
    pub vo_number: String,
    pub vo_name: String,
    pub amount_usd: Decimal,
    pub status: String,
    pub approved_in_amendment: Option<i32>,
    pub approved_date: Option<NaiveDate>,
}

impl VariationOrder {
    pub fn is_approved(&self) -> bool {
        self.status.eq_ignore_ascii_case("approved")
    }
}

/// A row from `tb_m_event`: milestones, amendments and COVID-related disruptions.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ProjectEvent {
    pub event_id: i32,
    pub event_code: String,
    pub event_name: String,
    pub event_type: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct AmendmentOption {
    pub amendment_id: i32,
    pub amendment_code: String,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct DisciplineOption {
    pub discipline_id: i32,
    pub discipline_code: String,
    pub discipline_name: String,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SubcontractorOption {
    pub subcontractor_id: i32,
    pub subcontractor_name: String,
}

/// Everything the KPI summary is computed from, fetched in one round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummarySnapshot {
    pub latest_amendment: Option<Amendment>,
    pub latest_values: Vec<ContractValue>,
    pub original_values: Vec<ContractValue>,
    pub pamf_count: i64,
    pub amendment_count: i64,
    pub subcontractor_count: i64,
    pub project: Option<Project>,
}
