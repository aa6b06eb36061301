use crate::data::ChartData;
use crate::error::ClientError;
use crate::view::{ChartView, EVENT_KEYS, encode_query};
use analytics::{EventMarker, FilterOptions, SummaryReport};
use async_trait::async_trait;
use core_types::FilterState;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The read interface of the dashboard API.
/// Chart feeds depend on this trait, so tests can swap in a scripted implementation.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn summary(&self) -> Result<SummaryReport, ClientError>;

    async fn filter_options(&self) -> Result<FilterOptions, ClientError>;

    /// Event markers, restricted to the filter's date range.
    async fn events(&self, filters: &FilterState) -> Result<Vec<EventMarker>, ClientError>;

    /// Fetches one chart view with the filters that are relevant to it.
    async fn fetch_view(&self, view: ChartView, filters: &FilterState) -> Result<ChartData, ClientError>;
}

/// The body of a non-2xx response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// A `DashboardApi` that talks to a running server over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDashboardClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDashboardClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// The full URL of `view` under the current filters.
    pub fn view_url(&self, view: ChartView, filters: &FilterState) -> String {
        format!("{}{}{}", self.base_url, view.path(), view.query_string(filters))
    }

    async fn get_text(&self, url: &str) -> Result<String, ClientError> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            Ok(text)
        } else {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            Err(ClientError::Api { status: status.as_u16(), message })
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let text = self.get_text(url).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardClient {
    async fn summary(&self) -> Result<SummaryReport, ClientError> {
        self.get_json(&format!("{}/api/bp/summary", self.base_url)).await
    }

    async fn filter_options(&self) -> Result<FilterOptions, ClientError> {
        self.get_json(&format!("{}/api/bp/filter-options", self.base_url)).await
    }

    async fn events(&self, filters: &FilterState) -> Result<Vec<EventMarker>, ClientError> {
        let url = format!("{}/api/bp/events{}", self.base_url, encode_query(filters, EVENT_KEYS));
        self.get_json(&url).await
    }

    async fn fetch_view(&self, view: ChartView, filters: &FilterState) -> Result<ChartData, ClientError> {
        let text = self.get_text(&self.view_url(view, filters)).await?;
        Ok(ChartData::decode(view, &text)?)
    }
}
