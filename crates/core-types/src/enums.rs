use serde::{Deserialize, Serialize};

/// The monthly cost series tracked in `tb_t_monthly_cost`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostType {
    /// Field & general reimbursable services RCE.
    FgrsRce,
    /// Logistics RCE.
    LogiRce,
    Other(String),
}

impl From<&str> for CostType {
    fn from(tag: &str) -> Self {
        match tag.trim() {
            "FGRS_RCE" => CostType::FgrsRce,
            "LOGI_RCE" => CostType::LogiRce,
            other => CostType::Other(other.to_string()),
        }
    }
}

/// One slice of the shared filter state. A chart declares the keys it reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKey {
    SelectedYear,
    DateRange,
    AmendmentIds,
    DisciplineIds,
    SubcontractorIds,
}
