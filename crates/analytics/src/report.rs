use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Every report is shaped for the charting front end: camelCase keys and plain
// numbers. Money is converted from `Decimal` only when a report is built.

/// Headline KPIs shown above the charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub total_contract_value: f64,
    pub original_contract_value: f64,
    pub growth_percent: f64,
    pub pamf_count: i64,
    pub amendment_count: i64,
    pub subcontractor_count: i64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub latest_amendment: Option<String>,
}

/// The contract value after each amendment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractEvolutionPoint {
    pub amendment_code: String,
    pub amendment_name: String,
    pub effective_date: Option<NaiveDate>,
    pub total_value: f64,
    /// `total_value` in billions of USD.
    pub total_value_b: f64,
}

/// FGRS and LOGI RCE spend for one month, in millions of USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCostPoint {
    pub year: i32,
    pub month: i32,
    pub date: String,
    #[serde(rename = "FGRS")]
    pub fgrs: f64,
    #[serde(rename = "LOGI")]
    pub logi: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSplit {
    pub lump_sum: f64,
    pub reimbursable: f64,
    pub provisional: f64,
    pub backcharge: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineClaim {
    pub discipline: String,
    pub claim_amount: f64,
    pub pamf_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub cost_split: CostSplit,
    pub pamf_by_discipline: Vec<DisciplineClaim>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryClaim {
    pub category: String,
    pub claim_amount: f64,
    pub pamf_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineScatterPoint {
    pub discipline: String,
    pub pamf_count: i64,
    pub total_claim: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PamfAnalysis {
    pub top_categories: Vec<CategoryClaim>,
    pub scatter_data: Vec<DisciplineScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PobPoint {
    pub year: i32,
    pub month: i32,
    pub date: String,
    pub pob_count: i32,
    pub isolation_count: i32,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPoint {
    pub year: i32,
    pub month: i32,
    pub date: String,
    pub plan_progress: f64,
    pub actual_progress: f64,
}

/// Plan vs actual S-curve of one subcontractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSeries {
    pub subcontractor: String,
    pub monthly_progress: Vec<ProgressPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationOrderItem {
    pub vo_number: String,
    pub vo_name: String,
    pub amount_usd: f64,
    pub status: String,
    pub approved_in_amendment: Option<i32>,
    pub approved_date: Option<NaiveDate>,
}

/// Totals printed next to the variation order chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationOrderStats {
    pub count: usize,
    pub approved_count: usize,
    pub total_value: Decimal,
    pub approved_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdCode {
    pub id: i32,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisciplineChoice {
    pub id: i32,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdName {
    pub id: i32,
    pub name: String,
}

/// The choices offered by the filter bar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub amendments: Vec<IdCode>,
    pub disciplines: Vec<DisciplineChoice>,
    pub subcontractors: Vec<IdName>,
}

/// A dated event drawn as an overlay on the monthly charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMarker {
    pub event_code: String,
    pub event_name: String,
    pub event_date: NaiveDate,
    /// Set for events with a duration, such as a lockdown.
    pub end_date: Option<NaiveDate>,
    pub event_type: String,
    pub description: Option<String>,
}
