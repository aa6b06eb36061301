use crate::error::ClientError;
use core_types::{FilterKey, FilterState};
use std::fmt;
use std::str::FromStr;

/// One chart (or the KPI header) of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartView {
    Summary,
    ContractEvolution,
    MonthlyCost,
    CostBreakdown,
    PamfAnalysis,
    PobTimeline,
    ProjectProgress,
    VariationOrders,
}

/// The keys the events overlay reacts to.
pub const EVENT_KEYS: &[FilterKey] = &[FilterKey::DateRange];

impl ChartView {
    pub const ALL: [ChartView; 8] = [
        ChartView::Summary,
        ChartView::ContractEvolution,
        ChartView::MonthlyCost,
        ChartView::CostBreakdown,
        ChartView::PamfAnalysis,
        ChartView::PobTimeline,
        ChartView::ProjectProgress,
        ChartView::VariationOrders,
    ];

    /// The short name, which is also the last segment of the path.
    pub fn name(&self) -> &'static str {
        match self {
            ChartView::Summary => "summary",
            ChartView::ContractEvolution => "contract-evolution",
            ChartView::MonthlyCost => "monthly-cost",
            ChartView::CostBreakdown => "cost-breakdown",
            ChartView::PamfAnalysis => "pamf-analysis",
            ChartView::PobTimeline => "pob-timeline",
            ChartView::ProjectProgress => "project-progress",
            ChartView::VariationOrders => "variation-orders",
        }
    }

    pub fn path(&self) -> String {
        format!("/api/bp/{}", self.name())
    }

    /// The slices of the filter state this view is fetched with.
    pub fn relevant_keys(&self) -> &'static [FilterKey] {
        match self {
            ChartView::Summary => &[],
            ChartView::ContractEvolution => &[FilterKey::AmendmentIds, FilterKey::DateRange],
            ChartView::MonthlyCost => &[FilterKey::SelectedYear, FilterKey::DateRange],
            ChartView::CostBreakdown => &[FilterKey::DisciplineIds],
            ChartView::PamfAnalysis => &[FilterKey::DisciplineIds],
            ChartView::PobTimeline => &[FilterKey::SelectedYear, FilterKey::DateRange],
            ChartView::ProjectProgress => {
                &[FilterKey::SelectedYear, FilterKey::SubcontractorIds, FilterKey::DateRange]
            }
            ChartView::VariationOrders => &[FilterKey::AmendmentIds, FilterKey::DateRange],
        }
    }

    /// The encoded query string for this view, `""` or starting with `?`.
    pub fn query_string(&self, filters: &FilterState) -> String {
        encode_query(filters, self.relevant_keys())
    }
}

/// Encodes the relevant, non-default filters as `application/x-www-form-urlencoded`.
pub fn encode_query(filters: &FilterState, relevant: &[FilterKey]) -> String {
    let pairs = filters.query_pairs(relevant);
    if pairs.is_empty() {
        return String::new();
    }
    let mut serializer = url::form_urlencoded::Serializer::new(String::from("?"));
    serializer.extend_pairs(pairs);
    serializer.finish()
}

impl fmt::Display for ChartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartView {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartView::ALL
            .into_iter()
            .find(|view| view.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClientError::UnknownView(s.to_string()))
    }
}
