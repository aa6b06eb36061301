//! The dashboard's filter model.
//!
//! `FilterState` is what the client holds and shares between charts. Each chart turns
//! the slice it cares about into query parameters with [`FilterState::query_pairs`].
//! On the server those parameters arrive as a [`DashboardQuery`] and are parsed into a
//! [`DashboardFilter`].

use crate::enums::FilterKey;
use crate::error::CoreError;
use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const PARAM_YEAR: &str = "year";
pub const PARAM_START_DATE: &str = "startDate";
pub const PARAM_END_DATE: &str = "endDate";
pub const PARAM_AMENDMENT_IDS: &str = "amendmentIds";
pub const PARAM_DISCIPLINE_IDS: &str = "disciplineIds";
pub const PARAM_SUBCONTRACTOR_IDS: &str = "subcontractorIds";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// The shared, session-scoped filter state of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub selected_year: Option<i32>,
    pub date_range: DateRange,
    pub amendment_ids: Vec<i32>,
    pub discipline_ids: Vec<i32>,
    pub subcontractor_ids: Vec<i32>,
}

impl FilterState {
    pub fn update_year(&mut self, year: Option<i32>) {
        self.selected_year = year;
    }

    pub fn update_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.date_range = DateRange { start, end };
    }

    pub fn update_amendments(&mut self, ids: Vec<i32>) {
        self.amendment_ids = ids;
    }

    pub fn update_disciplines(&mut self, ids: Vec<i32>) {
        self.discipline_ids = ids;
    }

    pub fn update_subcontractors(&mut self, ids: Vec<i32>) {
        self.subcontractor_ids = ids;
    }

    pub fn clear_filters(&mut self) {
        *self = FilterState::default();
    }

    pub fn has_active_filters(&self) -> bool {
        self.selected_year.is_some()
            || !self.date_range.is_empty()
            || !self.amendment_ids.is_empty()
            || !self.discipline_ids.is_empty()
            || !self.subcontractor_ids.is_empty()
    }

    /// Returns the query parameters for the given keys, skipping defaults.
    ///
    /// The order of the pairs is fixed and does not depend on the order of `relevant`,
    /// so two charts with the same keys always produce the same query string.
    pub fn query_pairs(&self, relevant: &[FilterKey]) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if relevant.contains(&FilterKey::SelectedYear) {
            if let Some(year) = self.selected_year {
                pairs.push((PARAM_YEAR, year.to_string()));
            }
        }
        if relevant.contains(&FilterKey::DateRange) {
            if let Some(start) = self.date_range.start {
                pairs.push((PARAM_START_DATE, start.format(DATE_FORMAT).to_string()));
            }
            if let Some(end) = self.date_range.end {
                pairs.push((PARAM_END_DATE, end.format(DATE_FORMAT).to_string()));
            }
        }
        if relevant.contains(&FilterKey::AmendmentIds) && !self.amendment_ids.is_empty() {
            pairs.push((PARAM_AMENDMENT_IDS, join_ids(&self.amendment_ids)));
        }
        if relevant.contains(&FilterKey::DisciplineIds) && !self.discipline_ids.is_empty() {
            pairs.push((PARAM_DISCIPLINE_IDS, join_ids(&self.discipline_ids)));
        }
        if relevant.contains(&FilterKey::SubcontractorIds) && !self.subcontractor_ids.is_empty() {
            pairs.push((PARAM_SUBCONTRACTOR_IDS, join_ids(&self.subcontractor_ids)));
        }

        pairs
    }
}

fn join_ids(ids: &[i32]) -> String {
    ids.iter().map(i32::to_string).collect::<Vec<_>>().join(",")
}

/// The raw, undecoded filter parameters of a dashboard request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardQuery {
    pub year: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub amendment_ids: Option<String>,
    pub discipline_ids: Option<String>,
    pub subcontractor_ids: Option<String>,
}

impl DashboardQuery {
    /// Collects the filter parameters from decoded `key=value` pairs.
    ///
    /// A repeated key keeps its first value and unknown keys are ignored, so a
    /// query string never fails to be read; only the values themselves are validated.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                PARAM_YEAR => &mut query.year,
                PARAM_START_DATE => &mut query.start_date,
                PARAM_END_DATE => &mut query.end_date,
                PARAM_AMENDMENT_IDS => &mut query.amendment_ids,
                PARAM_DISCIPLINE_IDS => &mut query.discipline_ids,
                PARAM_SUBCONTRACTOR_IDS => &mut query.subcontractor_ids,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }
}

/// A parsed, validated set of request filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardFilter {
    pub year: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub amendment_ids: Vec<i32>,
    pub discipline_ids: Vec<i32>,
    pub subcontractor_ids: Vec<i32>,
}

impl TryFrom<&DashboardQuery> for DashboardFilter {
    type Error = CoreError;

    fn try_from(query: &DashboardQuery) -> Result<Self, Self::Error> {
        let year = match non_empty(&query.year) {
            Some(raw) => Some(raw.parse::<i32>().map_err(|_| {
                CoreError::InvalidInput(PARAM_YEAR.to_string(), format!("'{raw}' is not a year"))
            })?),
            None => None,
        };

        Ok(Self {
            year,
            start_date: parse_optional_date(PARAM_START_DATE, &query.start_date)?,
            end_date: parse_optional_date(PARAM_END_DATE, &query.end_date)?,
            amendment_ids: parse_id_list(PARAM_AMENDMENT_IDS, &query.amendment_ids)?,
            discipline_ids: parse_id_list(PARAM_DISCIPLINE_IDS, &query.discipline_ids)?,
            subcontractor_ids: parse_id_list(PARAM_SUBCONTRACTOR_IDS, &query.subcontractor_ids)?,
        })
    }
}

impl DashboardFilter {
    /// The month-granular period filter. A selected year takes precedence over dates.
    pub fn period(&self) -> PeriodFilter {
        if let Some(year) = self.year {
            return PeriodFilter::Year(year);
        }
        if self.start_date.is_none() && self.end_date.is_none() {
            return PeriodFilter::All;
        }
        PeriodFilter::Range {
            start: self.start_date.map(YearMonth::from),
            end: self.end_date.map(YearMonth::from),
        }
    }
}

fn non_empty(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_optional_date(param: &str, raw: &Option<String>) -> Result<Option<NaiveDate>, CoreError> {
    let Some(raw) = non_empty(raw) else {
        return Ok(None);
    };
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| CoreError::InvalidInput(param.to_string(), format!("'{raw}' is not a date")))
}

fn parse_id_list(param: &str, raw: &Option<String>) -> Result<Vec<i32>, CoreError> {
    let Some(raw) = non_empty(raw) else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            segment.parse::<i32>().map_err(|_| {
                CoreError::InvalidInput(param.to_string(), format!("'{segment}' is not an id"))
            })
        })
        .collect()
}

/// A calendar month. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::InvalidPeriod { year, month: i32::try_from(month).unwrap_or(i32::MAX) });
        }
        Ok(Self { year, month })
    }

    /// Builds a period from the signed `year`/`month` columns of a monthly table.
    pub fn from_columns(year: i32, month: i32) -> Result<Self, CoreError> {
        u32::try_from(month)
            .map_err(|_| CoreError::InvalidPeriod { year, month })
            .and_then(|m| Self::new(year, m))
    }

    /// The `YYYY-MM` label used as the x-axis key of every monthly chart.
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }
}

/// Which months a monthly series is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodFilter {
    All,
    Year(i32),
    /// Both bounds are inclusive at month granularity.
    Range {
        start: Option<YearMonth>,
        end: Option<YearMonth>,
    },
}

impl PeriodFilter {
    pub fn contains(&self, period: YearMonth) -> bool {
        match self {
            PeriodFilter::All => true,
            PeriodFilter::Year(year) => period.year == *year,
            PeriodFilter::Range { start, end } => {
                start.is_none_or(|start| period >= start) && end.is_none_or(|end| period <= end)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn query(pairs: &[(&str, &str)]) -> DashboardQuery {
        DashboardQuery::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn default_state_has_no_active_filters() {
        let state = FilterState::default();
        assert!(!state.has_active_filters());
        assert!(state.query_pairs(&[FilterKey::SelectedYear, FilterKey::DateRange]).is_empty());
    }

    #[test]
    fn each_update_activates_filters_and_clear_resets() {
        let mut state = FilterState::default();
        state.update_disciplines(vec![2]);
        assert!(state.has_active_filters());

        state.update_year(Some(2021));
        state.update_date_range(Some(date(2020, 3, 1)), None);
        state.update_amendments(vec![4, 5]);
        state.update_subcontractors(vec![1]);
        state.clear_filters();
        assert_eq!(state, FilterState::default());

        state.update_date_range(None, Some(date(2022, 6, 30)));
        assert!(state.has_active_filters());
    }

    #[test]
    fn query_pairs_only_include_relevant_keys() {
        let mut state = FilterState::default();
        state.update_year(Some(2021));
        state.update_disciplines(vec![1, 3]);
        state.update_subcontractors(vec![2]);

        let pairs = state.query_pairs(&[FilterKey::DisciplineIds]);
        assert_eq!(pairs, vec![("disciplineIds", "1,3".to_string())]);

        let pairs = state.query_pairs(&[FilterKey::SubcontractorIds, FilterKey::SelectedYear]);
        assert_eq!(
            pairs,
            vec![("year", "2021".to_string()), ("subcontractorIds", "2".to_string())]
        );
    }

    #[test]
    fn query_pairs_render_dates_and_skip_missing_bounds() {
        let mut state = FilterState::default();
        state.update_date_range(None, Some(date(2021, 12, 31)));
        state.update_amendments(vec![]);

        let pairs = state.query_pairs(&[FilterKey::AmendmentIds, FilterKey::DateRange]);
        assert_eq!(pairs, vec![("endDate", "2021-12-31".to_string())]);
    }

    #[test]
    fn parses_a_full_query() {
        let filter = DashboardFilter::try_from(&query(&[
            ("year", "2021"),
            ("startDate", "2020-03-15"),
            ("endDate", "2022-06-30T00:00:00Z"),
            ("amendmentIds", "1, 2,,3"),
            ("disciplineIds", "4"),
        ]))
        .unwrap();

        assert_eq!(filter.year, Some(2021));
        assert_eq!(filter.start_date, Some(date(2020, 3, 15)));
        assert_eq!(filter.end_date, Some(date(2022, 6, 30)));
        assert_eq!(filter.amendment_ids, vec![1, 2, 3]);
        assert_eq!(filter.discipline_ids, vec![4]);
        assert!(filter.subcontractor_ids.is_empty());
    }

    #[test]
    fn empty_values_are_treated_as_absent() {
        let filter = DashboardFilter::try_from(&query(&[("year", ""), ("amendmentIds", " ")])).unwrap();
        assert_eq!(filter, DashboardFilter::default());
        assert_eq!(filter.period(), PeriodFilter::All);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = DashboardFilter::try_from(&query(&[("year", "twenty")])).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(ref p, _) if p == "year"));

        let err = DashboardFilter::try_from(&query(&[("subcontractorIds", "1,x")])).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(ref p, _) if p == "subcontractorIds"));

        let err = DashboardFilter::try_from(&query(&[("startDate", "03/2020")])).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(ref p, _) if p == "startDate"));
    }

    #[test]
    fn repeated_keys_keep_the_first_value() {
        let q = query(&[("year", "2020"), ("year", "2021"), ("disciplineIds", "3"), ("disciplineIds", "x")]);
        assert_eq!(q.year.as_deref(), Some("2020"));
        assert_eq!(q.discipline_ids.as_deref(), Some("3"));

        let filter = DashboardFilter::try_from(&q).unwrap();
        assert_eq!(filter.year, Some(2020));
        assert_eq!(filter.discipline_ids, vec![3]);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let q = query(&[("page", "2"), ("endDate", "2021-01-31")]);
        assert_eq!(q, DashboardQuery { end_date: Some("2021-01-31".to_string()), ..Default::default() });
    }

    #[test]
    fn year_takes_precedence_over_dates() {
        let filter = DashboardFilter::try_from(&query(&[
            ("year", "2020"),
            ("startDate", "2021-01-01"),
        ]))
        .unwrap();
        assert_eq!(filter.period(), PeriodFilter::Year(2020));
    }

    #[test]
    fn range_is_inclusive_at_month_granularity() {
        let filter = DashboardFilter::try_from(&query(&[
            ("startDate", "2020-03-15"),
            ("endDate", "2021-02-01"),
        ]))
        .unwrap();
        let period = filter.period();

        assert!(!period.contains(YearMonth::new(2020, 2).unwrap()));
        assert!(period.contains(YearMonth::new(2020, 3).unwrap()));
        assert!(period.contains(YearMonth::new(2020, 12).unwrap()));
        assert!(period.contains(YearMonth::new(2021, 2).unwrap()));
        assert!(!period.contains(YearMonth::new(2021, 3).unwrap()));
    }

    #[test]
    fn open_ended_ranges() {
        let from = PeriodFilter::Range { start: Some(YearMonth::new(2022, 1).unwrap()), end: None };
        assert!(from.contains(YearMonth::new(2030, 1).unwrap()));
        assert!(!from.contains(YearMonth::new(2021, 12).unwrap()));
    }

    #[test]
    fn year_month_validates_and_labels() {
        assert_eq!(YearMonth::new(2019, 7).unwrap().label(), "2019-07");
        assert_eq!(
            YearMonth::new(2019, 13),
            Err(CoreError::InvalidPeriod { year: 2019, month: 13 })
        );
        assert_eq!(
            YearMonth::new(2019, u32::MAX),
            Err(CoreError::InvalidPeriod { year: 2019, month: i32::MAX })
        );
    }
}
