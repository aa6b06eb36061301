use crate::view::ChartView;
use analytics::{
    ContractEvolutionPoint, CostBreakdown, MonthlyCostPoint, PamfAnalysis, PobPoint, ProgressSeries,
    SummaryReport, VariationOrderItem,
};
use serde::Serialize;

/// The decoded payload of one chart view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartData {
    Summary(SummaryReport),
    ContractEvolution(Vec<ContractEvolutionPoint>),
    MonthlyCost(Vec<MonthlyCostPoint>),
    CostBreakdown(CostBreakdown),
    PamfAnalysis(PamfAnalysis),
    PobTimeline(Vec<PobPoint>),
    ProjectProgress(Vec<ProgressSeries>),
    VariationOrders(Vec<VariationOrderItem>),
}

impl ChartData {
    /// Decodes a response body with the shape `view` returns.
    pub fn decode(view: ChartView, body: &str) -> Result<Self, serde_json::Error> {
        let data = match view {
            ChartView::Summary => ChartData::Summary(serde_json::from_str(body)?),
            ChartView::ContractEvolution => ChartData::ContractEvolution(serde_json::from_str(body)?),
            ChartView::MonthlyCost => ChartData::MonthlyCost(serde_json::from_str(body)?),
            ChartView::CostBreakdown => ChartData::CostBreakdown(serde_json::from_str(body)?),
            ChartView::PamfAnalysis => ChartData::PamfAnalysis(serde_json::from_str(body)?),
            ChartView::PobTimeline => ChartData::PobTimeline(serde_json::from_str(body)?),
            ChartView::ProjectProgress => ChartData::ProjectProgress(serde_json::from_str(body)?),
            ChartView::VariationOrders => ChartData::VariationOrders(serde_json::from_str(body)?),
        };
        Ok(data)
    }

    pub fn view(&self) -> ChartView {
        match self {
            ChartData::Summary(_) => ChartView::Summary,
            ChartData::ContractEvolution(_) => ChartView::ContractEvolution,
            ChartData::MonthlyCost(_) => ChartView::MonthlyCost,
            ChartData::CostBreakdown(_) => ChartView::CostBreakdown,
            ChartData::PamfAnalysis(_) => ChartView::PamfAnalysis,
            ChartData::PobTimeline(_) => ChartView::PobTimeline,
            ChartData::ProjectProgress(_) => ChartView::ProjectProgress,
            ChartData::VariationOrders(_) => ChartView::VariationOrders,
        }
    }

    /// Whether the chart would draw nothing. The summary always has its KPI cards.
    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::Summary(_) => false,
            ChartData::ContractEvolution(points) => points.is_empty(),
            ChartData::MonthlyCost(points) => points.is_empty(),
            ChartData::CostBreakdown(breakdown) => {
                breakdown.pamf_by_discipline.is_empty() && breakdown.cost_split.total == 0.0
            }
            ChartData::PamfAnalysis(analysis) => {
                analysis.top_categories.is_empty() && analysis.scatter_data.is_empty()
            }
            ChartData::PobTimeline(points) => points.is_empty(),
            ChartData::ProjectProgress(series) => series.is_empty(),
            ChartData::VariationOrders(items) => items.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_monthly_cost_wire_shape() {
        let body = r#"[{"year":2021,"month":3,"date":"2021-03","FGRS":1.25,"LOGI":0.5}]"#;
        let data = ChartData::decode(ChartView::MonthlyCost, body).unwrap();
        assert_eq!(data.view(), ChartView::MonthlyCost);
        let ChartData::MonthlyCost(points) = data else {
            panic!("wrong variant");
        };
        assert_eq!(points[0].date, "2021-03");
        assert_eq!(points[0].fgrs, 1.25);
        assert_eq!(points[0].logi, 0.5);
    }

    #[test]
    fn decodes_variation_orders_with_null_dates() {
        let body = r#"[{"voNumber":"VO-001","voName":"Jetty","amountUsd":1500000.0,"status":"Approved",
            "approvedInAmendment":2,"approvedDate":"2020-05-01"},
            {"voNumber":"VO-002","voName":"Camp","amountUsd":20000.0,"status":"Pending",
            "approvedInAmendment":null,"approvedDate":null}]"#;
        let ChartData::VariationOrders(items) = ChartData::decode(ChartView::VariationOrders, body).unwrap() else {
            panic!("wrong variant");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].approved_date, None);
        assert_eq!(items[0].approved_in_amendment, Some(2));
    }

    #[test]
    fn wrong_shape_is_an_error() {
        assert!(ChartData::decode(ChartView::CostBreakdown, "[]").is_err());
    }

    #[test]
    fn emptiness_follows_what_the_chart_draws() {
        assert!(ChartData::PobTimeline(Vec::new()).is_empty());
        assert!(ChartData::CostBreakdown(CostBreakdown { cost_split: Default::default(), pamf_by_discipline: vec![] })
            .is_empty());

        let body = r#"{"costSplit":{"lumpSum":1.0,"reimbursable":0.0,"provisional":0.0,"backcharge":0.0,"total":1.0},
            "pamfByDiscipline":[]}"#;
        assert!(!ChartData::decode(ChartView::CostBreakdown, body).unwrap().is_empty());
    }
}
