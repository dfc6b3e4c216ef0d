//! HTTP client for the sensor API.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::HistoryConfig;
use crate::error::HistoryError;
use crate::types::{
    ActiveEvent, FireStatus, HistoryQuery, Location, Page, SensorReading, SensorStats, Series,
    SignalKind,
};

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// The active events endpoint answers with a plain string when nothing is running.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ActiveEventsResponse {
    Page(Page<ActiveEvent>),
    Message(String),
}

/// Client for the sensor API's query endpoints.
#[derive(Debug, Clone)]
pub struct HistoryClient {
    http: Client,
    config: HistoryConfig,
}

impl HistoryClient {
    /// Create a new client.
    pub fn new(config: HistoryConfig) -> Result<Self, HistoryError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(HistoryError::Http)?;

        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Fetch one page of readings for a single location.
    pub async fn query_page(
        &self,
        query: &HistoryQuery,
        location: Location,
    ) -> Result<Page<SensorReading>, HistoryError> {
        query.window.validate()?;

        let mut params: Vec<(&str, String)> = vec![
            ("type", query.kind.to_string()),
            ("building", location.building.to_string()),
            ("floor", location.floor.to_string()),
            ("page", query.page.to_string()),
            ("page_size", query.page_size.to_string()),
        ];
        params.extend(query.window.query_params());

        let url = self.config.sensor_data_url();
        debug!("Querying {} for {} {}", url, query.kind, location);

        let resp = self.http.get(&url).query(&params).send().await?;
        Self::parse(resp).await
    }

    /// Fetch one series per requested location.
    ///
    /// A location whose request fails is logged and skipped, as is a
    /// location with no readings. Series come back in query order.
    pub async fn fetch_series(&self, query: &HistoryQuery) -> Result<Vec<Series>, HistoryError> {
        query.validate()?;

        let mut series = Vec::with_capacity(query.locations.len());
        for &location in &query.locations {
            let page = match self.query_page(query, location).await {
                Ok(page) => page,
                Err(e) => {
                    warn!("Failed to fetch {} for {}: {}", query.kind, location, e);
                    continue;
                }
            };

            let s = Series::from_readings(query.kind, location, &page.results);
            if s.is_empty() {
                debug!("No {} data for {}", query.kind, location);
                continue;
            }
            series.push(s);
        }

        Ok(series)
    }

    /// Get summary statistics for a signal kind.
    pub async fn sensor_stats(&self, kind: SignalKind) -> Result<SensorStats, HistoryError> {
        let url = self.config.stats_url(kind);
        debug!("Fetching stats: {}", url);

        let resp = self.http.get(&url).send().await?;
        Self::parse(resp).await
    }

    /// Whether a location currently has a fire.
    pub async fn fire_status(&self, location: Location) -> Result<FireStatus, HistoryError> {
        let url = self.config.fire_status_url(location);
        debug!("Fetching fire status: {}", url);

        let resp = self.http.get(&url).send().await?;
        Self::parse(resp).await
    }

    /// List scheduled events currently in progress.
    ///
    /// An empty page is returned when the server reports no active events.
    pub async fn active_events(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<ActiveEvent>, HistoryError> {
        if page == 0 || page_size == 0 {
            return Err(HistoryError::InvalidQuery(
                "page and page_size must be at least 1".to_string(),
            ));
        }

        let url = self.config.active_events_url();
        let resp = self
            .http
            .get(&url)
            .query(&[("page", page), ("page_size", page_size)])
            .send()
            .await?;

        match Self::parse(resp).await? {
            ActiveEventsResponse::Page(page) => Ok(page),
            ActiveEventsResponse::Message(message) => {
                debug!("No active events: {}", message.trim());
                Ok(Page::empty(page, page_size))
            }
        }
    }

    async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T, HistoryError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = error_message(&body);
        Err(match status {
            StatusCode::NOT_FOUND => HistoryError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                HistoryError::InvalidQuery(message)
            }
            _ => HistoryError::Status {
                status: status.as_u16(),
                message,
            },
        })
    }
}

/// Pull the `detail` out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.trim().to_string(),
    }
}
