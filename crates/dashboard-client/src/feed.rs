//! Per-chart fetch loops driven by the shared filter state.

use crate::api::DashboardApi;
use crate::data::ChartData;
use crate::error::ClientError;
use crate::store::FilterStore;
use crate::view::ChartView;
use core_types::FilterState;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// What a chart should currently display.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartState {
    Loaded(ChartData),
    /// The request succeeded but there is nothing to draw.
    Empty,
    /// The request failed; the chart shows its failure message.
    Failed(String),
}

impl ChartState {
    fn from_result(view: ChartView, result: Result<ChartData, ClientError>) -> Self {
        match result {
            Ok(data) if data.is_empty() => ChartState::Empty,
            Ok(data) => ChartState::Loaded(data),
            Err(e) => {
                tracing::warn!(%view, error = %e, "Chart fetch failed.");
                ChartState::Failed(e.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartUpdate {
    pub view: ChartView,
    pub state: ChartState,
}

enum Step {
    Done(Result<ChartData, ClientError>),
    /// A relevant filter changed before the response arrived.
    Superseded(FilterState),
    /// The store is gone; this is the last result the feed will deliver.
    Final(Result<ChartData, ClientError>),
}

/// Keeps one chart in sync with the filter store.
///
/// The feed fetches once on start and then again whenever the view's query string
/// changes. A change that arrives while a request is in flight drops that request,
/// so an older response can never overwrite a newer one.
pub struct ChartFeed<A: ?Sized> {
    api: Arc<A>,
    view: ChartView,
    filters: watch::Receiver<FilterState>,
}

impl<A> ChartFeed<A>
where
    A: DashboardApi + ?Sized + 'static,
{
    pub fn new(api: Arc<A>, view: ChartView, store: &FilterStore) -> Self {
        Self { api, view, filters: store.subscribe() }
    }

    pub fn spawn(self, updates: mpsc::Sender<ChartUpdate>) -> JoinHandle<()> {
        tokio::spawn(self.run(updates))
    }

    /// Runs until the store is dropped or nobody listens for updates.
    pub async fn run(mut self, updates: mpsc::Sender<ChartUpdate>) {
        let mut filters = self.filters.borrow_and_update().clone();

        loop {
            let query = self.view.query_string(&filters);
            match self.fetch_until_superseded(&filters, &query).await {
                Step::Superseded(next) => {
                    tracing::debug!(view = %self.view, "Filters changed mid-request; dropping the stale fetch.");
                    filters = next;
                    continue;
                }
                Step::Done(result) => {
                    if !self.deliver(&updates, result).await {
                        return;
                    }
                }
                Step::Final(result) => {
                    self.deliver(&updates, result).await;
                    return;
                }
            }

            match self.next_relevant_change(&query).await {
                Some(next) => filters = next,
                None => return,
            }
        }
    }

    async fn fetch_until_superseded(&mut self, filters: &FilterState, query: &str) -> Step {
        let fetch = self.api.fetch_view(self.view, filters);
        tokio::pin!(fetch);

        loop {
            tokio::select! {
                result = &mut fetch => return Step::Done(result),
                changed = self.filters.changed() => {
                    if changed.is_err() {
                        return Step::Final((&mut fetch).await);
                    }
                    let next = self.filters.borrow_and_update().clone();
                    if self.view.query_string(&next) != query {
                        return Step::Superseded(next);
                    }
                }
            }
        }
    }

    async fn next_relevant_change(&mut self, query: &str) -> Option<FilterState> {
        loop {
            self.filters.changed().await.ok()?;
            let next = self.filters.borrow_and_update().clone();
            if self.view.query_string(&next) != query {
                return Some(next);
            }
        }
    }

    async fn deliver(&self, updates: &mpsc::Sender<ChartUpdate>, result: Result<ChartData, ClientError>) -> bool {
        let update = ChartUpdate { view: self.view, state: ChartState::from_result(self.view, result) };
        updates.send(update).await.is_ok()
    }
}
