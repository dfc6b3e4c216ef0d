//! Configuration types for sensor-history.

use alert_stream::config::DEFAULT_BASE_URL;

use crate::types::{Location, SignalKind};

/// Configuration for connecting to the sensor API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Base URL of the sensor API (e.g., "http://localhost:8000").
    pub base_url: String,
}

impl HistoryConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Get the time-series query endpoint URL.
    pub fn sensor_data_url(&self) -> String {
        format!("{}/sensor-data/", self.base_url)
    }

    /// Get the statistics endpoint URL for a signal kind.
    pub fn stats_url(&self, kind: SignalKind) -> String {
        format!("{}/sensors/stats/{}", self.base_url, kind)
    }

    /// Get the fire status endpoint URL for a location.
    pub fn fire_status_url(&self, location: Location) -> String {
        format!(
            "{}/fire-status/{}/{}",
            self.base_url, location.building, location.floor
        )
    }

    /// Get the active events endpoint URL.
    pub fn active_events_url(&self) -> String {
        format!("{}/events/active", self.base_url)
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
