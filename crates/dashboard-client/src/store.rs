use chrono::NaiveDate;
use core_types::FilterState;
use std::sync::Arc;
use tokio::sync::watch;

/// The one filter state shared by every chart on the dashboard.
///
/// Cloning the store shares the underlying state. Each chart subscribes and is
/// woken on every update; it decides for itself whether the change matters.
#[derive(Debug, Clone)]
pub struct FilterStore {
    tx: Arc<watch::Sender<FilterState>>,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new(FilterState::default())
    }
}

impl FilterStore {
    pub fn new(initial: FilterState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<FilterState> {
        self.tx.subscribe()
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> FilterState {
        self.tx.borrow().clone()
    }

    pub fn has_active_filters(&self) -> bool {
        self.tx.borrow().has_active_filters()
    }

    pub fn update_year(&self, year: Option<i32>) {
        self.modify(|state| state.update_year(year));
    }

    pub fn update_date_range(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.modify(|state| state.update_date_range(start, end));
    }

    pub fn update_amendments(&self, ids: Vec<i32>) {
        self.modify(|state| state.update_amendments(ids));
    }

    pub fn update_disciplines(&self, ids: Vec<i32>) {
        self.modify(|state| state.update_disciplines(ids));
    }

    pub fn update_subcontractors(&self, ids: Vec<i32>) {
        self.modify(|state| state.update_subcontractors(ids));
    }

    pub fn clear_filters(&self) {
        self.modify(FilterState::clear_filters);
    }

    fn modify(&self, update: impl FnOnce(&mut FilterState)) {
        self.tx.send_modify(update);
        tracing::trace!(state = ?*self.tx.borrow(), "Filter state updated.");
    }
}
