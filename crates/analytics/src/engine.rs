use crate::error::AnalyticsError;
use crate::report::*;
use core_types::palette::discipline_color;
use core_types::units::{growth_percent, sum_amounts, to_billions, to_f64};
use core_types::{
    Amendment, AmendmentOption, ContractValue, CostType, DisciplineOption, MonthlyCost,
    MonthlyPob, PamfCategoryTotal, PamfDisciplineTotal, ProjectEvent, ProjectProgress,
    SubcontractorOption, SummarySnapshot, VariationOrder, YearMonth,
};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// How many claim categories the PAMF view ranks.
pub const TOP_CATEGORY_LIMIT: usize = 15;

/// A stateless calculator that shapes database rows into dashboard reports.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the KPI summary.
    ///
    /// Contract values are the sums of each amendment's line items, so the headline
    /// figure always agrees with the contract evolution chart.
    pub fn summary(&self, snapshot: &SummarySnapshot) -> SummaryReport {
        let latest = contract_total(&snapshot.latest_values);
        let original = contract_total(&snapshot.original_values);

        SummaryReport {
            total_contract_value: to_f64(latest),
            original_contract_value: to_f64(original),
            growth_percent: to_f64(growth_percent(original, latest)),
            pamf_count: snapshot.pamf_count,
            amendment_count: snapshot.amendment_count,
            subcontractor_count: snapshot.subcontractor_count,
            start_date: snapshot.project.as_ref().and_then(|p| p.start_date),
            end_date: snapshot.project.as_ref().and_then(|p| p.end_date),
            latest_amendment: snapshot
                .latest_amendment
                .as_ref()
                .map(|a| a.amendment_code.clone()),
        }
    }

    /// One point per amendment, in the order the amendments are given.
    pub fn contract_evolution(
        &self,
        amendments: &[Amendment],
        values: &[ContractValue],
    ) -> Vec<ContractEvolutionPoint> {
        let mut totals: HashMap<i32, Decimal> = HashMap::new();
        for value in values {
            *totals.entry(value.amendment_id).or_default() += value.amount_usd.unwrap_or_default();
        }

        amendments
            .iter()
            .map(|amendment| {
                let total = totals
                    .get(&amendment.amendment_id)
                    .copied()
                    .unwrap_or_default();
                let name = match amendment.amendment_name.as_deref() {
                    Some(name) if !name.trim().is_empty() => name.to_string(),
                    _ => amendment.amendment_code.clone(),
                };
                ContractEvolutionPoint {
                    amendment_code: amendment.amendment_code.clone(),
                    amendment_name: name,
                    effective_date: amendment.effective_date,
                    total_value: to_f64(total),
                    total_value_b: to_f64(to_billions(total)),
                }
            })
            .collect()
    }

    /// Pivots the two RCE series into one point per month, ordered chronologically.
    ///
    /// A month with rows of an unknown cost type still appears, with both series at zero.
    pub fn monthly_cost(&self, rows: &[MonthlyCost]) -> Result<Vec<MonthlyCostPoint>, AnalyticsError> {
        let mut months: BTreeMap<YearMonth, (Decimal, Decimal)> = BTreeMap::new();

        for row in rows {
            let period = YearMonth::from_columns(row.year, row.month)
                .map_err(|source| AnalyticsError::InvalidRow { report: "monthly cost", source })?;
            let entry = months.entry(period).or_default();
            match row.kind() {
                CostType::FgrsRce => entry.0 += row.monthly_amount_musd,
                CostType::LogiRce => entry.1 += row.monthly_amount_musd,
                CostType::Other(tag) => {
                    tracing::debug!(cost_type = %tag, period = %period.label(), "Ignoring unknown cost type.");
                }
            }
        }

        Ok(months
            .into_iter()
            .map(|(period, (fgrs, logi))| MonthlyCostPoint {
                year: period.year,
                month: period.month as i32,
                date: period.label(),
                fgrs: to_f64(fgrs),
                logi: to_f64(logi),
            })
            .collect())
    }

    /// Cost split of the latest amendment plus PAMF claims per discipline.
    pub fn cost_breakdown(
        &self,
        latest: Option<&Amendment>,
        claims: &[PamfDisciplineTotal],
    ) -> CostBreakdown {
        let cost_split = latest
            .map(|a| CostSplit {
                lump_sum: to_f64(a.lump_sum_value.unwrap_or_default()),
                reimbursable: to_f64(a.reimbursable_value.unwrap_or_default()),
                provisional: to_f64(a.provisional_sum_value.unwrap_or_default()),
                backcharge: to_f64(a.backcharge_value.unwrap_or_default()),
                total: to_f64(a.total_contract_value.unwrap_or_default()),
            })
            .unwrap_or_default();

        CostBreakdown {
            cost_split,
            pamf_by_discipline: claims
                .iter()
                .map(|row| DisciplineClaim {
                    discipline: row.discipline.clone(),
                    claim_amount: to_f64(row.claim_amount),
                    pamf_count: row.pamf_count,
                })
                .collect(),
        }
    }

    /// Top claim categories by amount, and the count/amount scatter per discipline.
    pub fn pamf_analysis(
        &self,
        categories: &[PamfCategoryTotal],
        disciplines: &[PamfDisciplineTotal],
    ) -> PamfAnalysis {
        let mut ranked: Vec<&PamfCategoryTotal> = categories.iter().collect();
        ranked.sort_by(|a, b| b.claim_amount.cmp(&a.claim_amount));
        ranked.truncate(TOP_CATEGORY_LIMIT);

        PamfAnalysis {
            top_categories: ranked
                .into_iter()
                .map(|row| CategoryClaim {
                    category: row.category.clone(),
                    claim_amount: to_f64(row.claim_amount),
                    pamf_count: row.pamf_count,
                })
                .collect(),
            scatter_data: disciplines
                .iter()
                .map(|row| DisciplineScatterPoint {
                    discipline: row.discipline.clone(),
                    pamf_count: row.pamf_count,
                    total_claim: to_f64(row.claim_amount),
                    color: discipline_color(&row.discipline).to_string(),
                })
                .collect(),
        }
    }

    pub fn pob_timeline(&self, rows: &[MonthlyPob]) -> Result<Vec<PobPoint>, AnalyticsError> {
        rows.iter()
            .map(|row| {
                let period = YearMonth::from_columns(row.year, row.month)
                    .map_err(|source| AnalyticsError::InvalidRow { report: "POB timeline", source })?;
                Ok(PobPoint {
                    year: row.year,
                    month: row.month,
                    date: period.label(),
                    pob_count: row.pob_count,
                    isolation_count: row.isolation_count,
                    remarks: row.remarks.clone(),
                })
            })
            .collect()
    }

    /// Groups progress rows into one series per subcontractor.
    ///
    /// Series appear in the order their first row appears; points keep row order.
    pub fn project_progress(
        &self,
        rows: &[ProjectProgress],
    ) -> Result<Vec<ProgressSeries>, AnalyticsError> {
        let mut series: IndexMap<String, Vec<ProgressPoint>> = IndexMap::new();

        for row in rows {
            let period = YearMonth::from_columns(row.year, row.month)
                .map_err(|source| AnalyticsError::InvalidRow { report: "project progress", source })?;
            series
                .entry(row.display_name().to_string())
                .or_default()
                .push(ProgressPoint {
                    year: row.year,
                    month: row.month,
                    date: period.label(),
                    plan_progress: to_f64(row.plan_progress_pct),
                    actual_progress: to_f64(row.overall_progress_pct),
                });
        }

        Ok(series
            .into_iter()
            .map(|(subcontractor, monthly_progress)| ProgressSeries { subcontractor, monthly_progress })
            .collect())
    }

    pub fn variation_orders(&self, rows: &[VariationOrder]) -> Vec<VariationOrderItem> {
        rows.iter()
            .map(|vo| VariationOrderItem {
                vo_number: vo.vo_number.clone(),
                vo_name: vo.vo_name.clone(),
                amount_usd: to_f64(vo.amount_usd),
                status: vo.status.clone(),
                approved_in_amendment: vo.approved_in_amendment,
                approved_date: vo.approved_date,
            })
            .collect()
    }

    pub fn variation_order_stats(&self, rows: &[VariationOrder]) -> VariationOrderStats {
        rows.iter().fold(VariationOrderStats::default(), |mut stats, vo| {
            stats.count += 1;
            stats.total_value += vo.amount_usd;
            if vo.is_approved() {
                stats.approved_count += 1;
                stats.approved_value += vo.amount_usd;
            }
            stats
        })
    }

    pub fn filter_options(
        &self,
        years: Vec<i32>,
        amendments: Vec<AmendmentOption>,
        disciplines: Vec<DisciplineOption>,
        subcontractors: Vec<SubcontractorOption>,
    ) -> FilterOptions {
        FilterOptions {
            years,
            amendments: amendments
                .into_iter()
                .map(|a| IdCode { id: a.amendment_id, code: a.amendment_code })
                .collect(),
            disciplines: disciplines
                .into_iter()
                .map(|d| DisciplineChoice {
                    id: d.discipline_id,
                    code: d.discipline_code,
                    name: d.discipline_name,
                })
                .collect(),
            subcontractors: subcontractors
                .into_iter()
                .map(|s| IdName { id: s.subcontractor_id, name: s.subcontractor_name })
                .collect(),
        }
    }

    pub fn events(&self, rows: &[ProjectEvent]) -> Vec<EventMarker> {
        rows.iter()
            .map(|event| EventMarker {
                event_code: event.event_code.clone(),
                event_name: event.event_name.clone(),
                event_date: event.start_date,
                end_date: event.end_date,
                event_type: event.event_type.clone(),
                description: event.description.clone(),
            })
            .collect()
    }
}

fn contract_total(values: &[ContractValue]) -> Decimal {
    sum_amounts(values.iter().map(|v| v.amount_usd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::Project;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn amendment(id: i32, code: &str, name: Option<&str>) -> Amendment {
        Amendment {
            amendment_id: id,
            amendment_code: code.to_string(),
            amendment_name: name.map(str::to_string),
            effective_date: Some(date(2016 + id, 1, 1)),
            lump_sum_value: None,
            reimbursable_value: None,
            provisional_sum_value: None,
            backcharge_value: None,
            total_contract_value: None,
        }
    }

    fn value(amendment_id: i32, amount: Option<Decimal>) -> ContractValue {
        ContractValue { amendment_id, description: None, amount_usd: amount }
    }

    fn cost(year: i32, month: i32, cost_type: &str, amount: Decimal) -> MonthlyCost {
        MonthlyCost { year, month, cost_type: cost_type.to_string(), monthly_amount_musd: amount }
    }

    fn progress(year: i32, month: i32, sheet: &str, master: Option<&str>, plan: Decimal, actual: Decimal) -> ProjectProgress {
        ProjectProgress {
            year,
            month,
            subcontractor: sheet.to_string(),
            subcontractor_name: master.map(str::to_string),
            plan_progress_pct: plan,
            overall_progress_pct: actual,
        }
    }

    fn vo(id: i32, status: &str, amount: Decimal) -> VariationOrder {
        VariationOrder {
            vo_id: id,
            vo_number: format!("VO-{id}"),
            vo_name: format!("Variation {id}"),
            amount_usd: amount,
            status: status.to_string(),
            approved_in_amendment: Some(3),
            approved_date: None,
        }
    }

    #[test]
    fn summary_sums_line_items_and_computes_growth() {
        let snapshot = SummarySnapshot {
            latest_amendment: Some(amendment(6, "AMD-5", Some("Amendment 5"))),
            latest_values: vec![value(6, Some(dec!(2_000_000_000))), value(6, Some(dec!(1_000_000_000))), value(6, None)],
            original_values: vec![value(1, Some(dec!(2_400_000_000)))],
            pamf_count: 42,
            amendment_count: 6,
            subcontractor_count: 3,
            project: Some(Project {
                project_id: 1,
                project_code: "TEP".to_string(),
                project_name: "Tangguh Expansion Project".to_string(),
                start_date: Some(date(2016, 6, 1)),
                end_date: Some(date(2023, 12, 31)),
            }),
        };

        let report = AnalyticsEngine::new().summary(&snapshot);

        assert_eq!(report.total_contract_value, 3_000_000_000.0);
        assert_eq!(report.original_contract_value, 2_400_000_000.0);
        assert_eq!(report.growth_percent, 25.0);
        assert_eq!(report.latest_amendment.as_deref(), Some("AMD-5"));
        assert_eq!(report.start_date, Some(date(2016, 6, 1)));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["totalContractValue"], json!(3_000_000_000.0));
        assert_eq!(json["endDate"], json!("2023-12-31"));
        assert_eq!(json["pamfCount"], json!(42));
    }

    #[test]
    fn summary_of_an_empty_database_is_zeroed() {
        let report = AnalyticsEngine::new().summary(&SummarySnapshot::default());
        assert_eq!(report.total_contract_value, 0.0);
        assert_eq!(report.growth_percent, 0.0);
        assert_eq!(report.latest_amendment, None);
        assert_eq!(report.start_date, None);
    }

    #[test]
    fn contract_evolution_totals_each_amendment() {
        let amendments = vec![amendment(1, "ORIGINAL", Some("Original Contract")), amendment(2, "AMD-1", Some(""))];
        let values = vec![
            value(1, Some(dec!(1_500_000_000))),
            value(1, Some(dec!(932_775_726))),
            value(2, Some(dec!(2_500_000_000))),
            value(2, None),
        ];

        let points = AnalyticsEngine::new().contract_evolution(&amendments, &values);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].amendment_name, "Original Contract");
        assert_eq!(points[0].total_value, 2_432_775_726.0);
        assert_eq!(points[0].total_value_b, 2.432775726);
        assert_eq!(points[1].amendment_name, "AMD-1");
        assert_eq!(points[1].total_value_b, 2.5);

        let json = serde_json::to_value(&points[1]).unwrap();
        assert_eq!(json["totalValueB"], json!(2.5));
        assert_eq!(json["amendmentCode"], json!("AMD-1"));
    }

    #[test]
    fn amendment_without_line_items_is_zero() {
        let points = AnalyticsEngine::new().contract_evolution(&[amendment(3, "AMD-2", None)], &[]);
        assert_eq!(points[0].total_value, 0.0);
        assert_eq!(points[0].amendment_name, "AMD-2");
    }

    #[test]
    fn monthly_cost_pivots_types_per_month() {
        let rows = vec![
            cost(2020, 4, "LOGI_RCE", dec!(3.5)),
            cost(2020, 3, "FGRS_RCE", dec!(12.25)),
            cost(2020, 3, "LOGI_RCE", dec!(4.0)),
            cost(2020, 4, "CAPEX", dec!(99)),
        ];

        let points = AnalyticsEngine::new().monthly_cost(&rows).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, "2020-03");
        assert_eq!(points[0].fgrs, 12.25);
        assert_eq!(points[0].logi, 4.0);
        assert_eq!(points[1].date, "2020-04");
        assert_eq!(points[1].fgrs, 0.0);
        assert_eq!(points[1].logi, 3.5);

        let json = serde_json::to_value(&points[0]).unwrap();
        assert_eq!(json, json!({"year": 2020, "month": 3, "date": "2020-03", "FGRS": 12.25, "LOGI": 4.0}));
    }

    #[test]
    fn monthly_cost_rejects_invalid_months() {
        let err = AnalyticsEngine::new().monthly_cost(&[cost(2020, 13, "FGRS_RCE", dec!(1))]).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidRow { report: "monthly cost", .. }));
    }

    #[test]
    fn cost_breakdown_defaults_to_zero_without_amendment() {
        let claims = vec![PamfDisciplineTotal {
            discipline: "COVID".to_string(),
            claim_amount: dec!(12_345_678.9),
            pamf_count: 17,
        }];
        let breakdown = AnalyticsEngine::new().cost_breakdown(None, &claims);

        assert_eq!(breakdown.cost_split, CostSplit::default());
        assert_eq!(breakdown.pamf_by_discipline[0].claim_amount, 12_345_678.9);

        let mut latest = amendment(6, "AMD-5", None);
        latest.lump_sum_value = Some(dec!(2_000_000_000));
        latest.backcharge_value = Some(dec!(-5_000_000));
        latest.total_contract_value = Some(dec!(1_995_000_000));
        let breakdown = AnalyticsEngine::new().cost_breakdown(Some(&latest), &[]);
        assert_eq!(breakdown.cost_split.lump_sum, 2_000_000_000.0);
        assert_eq!(breakdown.cost_split.reimbursable, 0.0);
        assert_eq!(breakdown.cost_split.backcharge, -5_000_000.0);
        assert_eq!(breakdown.cost_split.total, 1_995_000_000.0);

        let json = serde_json::to_value(&breakdown).unwrap();
        assert!(json["costSplit"]["lumpSum"].is_number());
        assert!(json["pamfByDiscipline"].as_array().unwrap().is_empty());
    }

    #[test]
    fn pamf_analysis_ranks_top_categories_and_colors_disciplines() {
        let categories: Vec<PamfCategoryTotal> = (1..=20)
            .map(|i| PamfCategoryTotal {
                category: format!("Category {i}"),
                claim_amount: Decimal::from(i * 1_000),
                pamf_count: i as i64,
            })
            .collect();
        let disciplines = vec![
            PamfDisciplineTotal { discipline: "SMT".to_string(), claim_amount: dec!(5), pamf_count: 2 },
            PamfDisciplineTotal { discipline: "Engineering".to_string(), claim_amount: dec!(7), pamf_count: 1 },
        ];

        let analysis = AnalyticsEngine::new().pamf_analysis(&categories, &disciplines);

        assert_eq!(analysis.top_categories.len(), TOP_CATEGORY_LIMIT);
        assert_eq!(analysis.top_categories[0].category, "Category 20");
        assert_eq!(analysis.top_categories[14].category, "Category 6");
        assert_eq!(analysis.scatter_data[0].color, "#F4A460");
        assert_eq!(analysis.scatter_data[1].color, "#6B9BD1");
        assert_eq!(analysis.scatter_data[1].total_claim, 7.0);
    }

    #[test]
    fn pob_points_carry_labels_and_remarks() {
        let rows = vec![MonthlyPob {
            year: 2020,
            month: 4,
            pob_count: 6_300,
            isolation_count: 210,
            remarks: Some("COVID restriction".to_string()),
        }];
        let points = AnalyticsEngine::new().pob_timeline(&rows).unwrap();

        let json = serde_json::to_value(&points).unwrap();
        assert_eq!(
            json,
            json!([{
                "year": 2020, "month": 4, "date": "2020-04",
                "pobCount": 6300, "isolationCount": 210, "remarks": "COVID restriction"
            }])
        );
    }

    #[test]
    fn progress_groups_by_subcontractor_in_first_seen_order() {
        let rows = vec![
            progress(2019, 1, "PT Meindo", Some("Meindo"), dec!(10), dec!(8.5)),
            progress(2019, 1, "Daewoo E&C", None, dec!(5), dec!(5)),
            progress(2019, 2, "PT Meindo", Some("Meindo"), dec!(20), dec!(17)),
            progress(2019, 2, "Daewoo E&C", Some(""), dec!(9), dec!(11)),
        ];

        let series = AnalyticsEngine::new().project_progress(&rows).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].subcontractor, "Meindo");
        assert_eq!(series[0].monthly_progress.len(), 2);
        assert_eq!(series[0].monthly_progress[1].plan_progress, 20.0);
        assert_eq!(series[0].monthly_progress[0].actual_progress, 8.5);
        assert_eq!(series[1].subcontractor, "Daewoo E&C");
        assert_eq!(series[1].monthly_progress[1].date, "2019-02");
    }

    #[test]
    fn variation_orders_render_dates_as_days() {
        let mut order = vo(1, "APPROVED", dec!(1_250_000.50));
        order.approved_date = Some(date(2019, 5, 1));
        let items = AnalyticsEngine::new().variation_orders(&[order, vo(2, "Pending", dec!(10))]);

        let json = serde_json::to_value(&items).unwrap();
        assert_eq!(json[0]["approvedDate"], json!("2019-05-01"));
        assert_eq!(json[0]["amountUsd"], json!(1_250_000.5));
        assert_eq!(json[1]["approvedDate"], json!(null));
        assert_eq!(json[1]["approvedInAmendment"], json!(3));
    }

    #[test]
    fn variation_order_stats_split_approved_value() {
        let rows = vec![vo(1, "APPROVED", dec!(100)), vo(2, "approved", dec!(50)), vo(3, "Pending", dec!(25))];
        let stats = AnalyticsEngine::new().variation_order_stats(&rows);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.approved_count, 2);
        assert_eq!(stats.total_value, dec!(175));
        assert_eq!(stats.approved_value, dec!(150));
    }

    #[test]
    fn filter_options_shape() {
        let options = AnalyticsEngine::new().filter_options(
            vec![2019, 2020],
            vec![AmendmentOption { amendment_id: 1, amendment_code: "ORIGINAL".to_string() }],
            vec![DisciplineOption {
                discipline_id: 1,
                discipline_code: "01".to_string(),
                discipline_name: "SMT".to_string(),
            }],
            vec![SubcontractorOption { subcontractor_id: 3, subcontractor_name: "Daewoo".to_string() }],
        );

        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(
            json,
            json!({
                "years": [2019, 2020],
                "amendments": [{"id": 1, "code": "ORIGINAL"}],
                "disciplines": [{"id": 1, "code": "01", "name": "SMT"}],
                "subcontractors": [{"id": 3, "name": "Daewoo"}]
            })
        );
    }

    #[test]
    fn events_use_start_date() {
        let rows = vec![ProjectEvent {
            event_id: 4,
            event_code: "COVID_PANDEMIC".to_string(),
            event_name: "COVID-19 Pandemic Onset".to_string(),
            event_type: "PANDEMIC".to_string(),
            start_date: date(2020, 3, 1),
            end_date: Some(date(2020, 8, 31)),
            description: None,
        }];
        let markers = AnalyticsEngine::new().events(&rows);
        let json = serde_json::to_value(&markers).unwrap();
        assert_eq!(json[0]["eventDate"], json!("2020-03-01"));
        assert_eq!(json[0]["endDate"], json!("2020-08-31"));
        assert_eq!(json[0]["eventType"], json!("PANDEMIC"));
    }
}
