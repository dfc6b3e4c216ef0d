//! Configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use alert_banner::DEFAULT_DISPLAY_WINDOW;
use alert_stream::config::{DEFAULT_BASE_URL, DEFAULT_CHECK_PATH, DEFAULT_EVENTS_PATH};
use alert_stream::StreamConfig;
use chrono::FixedOffset;
use sensor_history::HistoryConfig;

/// Console configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the alert and sensor API.
    pub server_url: String,
    /// Path of the WebSocket alert endpoint.
    pub events_path: String,
    /// Path used for the startup health check.
    pub check_path: String,
    /// How long an unacknowledged alert stays on screen.
    pub display_window: Duration,
    /// Offset to render detection times in. `None` keeps each alert's own.
    pub display_offset: Option<FixedOffset>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ALERT_SERVER_URL` | Alert/sensor API base URL | `http://127.0.0.1:8000` |
    /// | `ALERT_EVENTS_PATH` | WebSocket endpoint path | `/ws/alerts` |
    /// | `ALERT_CHECK_PATH` | Health-check path | `/docs` |
    /// | `ALERT_DISPLAY_WINDOW_SECS` | Display window in seconds | `60` |
    /// | `ALERT_DISPLAY_OFFSET` | UTC offset for times, e.g. `+03:00` | (alert's own) |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let server_url =
            lookup("ALERT_SERVER_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let events_path =
            lookup("ALERT_EVENTS_PATH").unwrap_or_else(|| DEFAULT_EVENTS_PATH.to_string());

        let check_path =
            lookup("ALERT_CHECK_PATH").unwrap_or_else(|| DEFAULT_CHECK_PATH.to_string());

        let display_window = match lookup("ALERT_DISPLAY_WINDOW_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidDisplayWindow(value)),
            },
            None => DEFAULT_DISPLAY_WINDOW,
        };

        let display_offset = lookup("ALERT_DISPLAY_OFFSET")
            .map(|value| {
                value
                    .trim()
                    .parse::<FixedOffset>()
                    .map_err(|_| ConfigError::InvalidDisplayOffset(value))
            })
            .transpose()?;

        Ok(Self {
            server_url,
            events_path,
            check_path,
            display_window,
            display_offset,
        })
    }

    /// Connection settings for the alert stream.
    pub fn stream_config(&self) -> StreamConfig {
        StreamConfig::new(&self.server_url)
            .with_events_path(&self.events_path)
            .with_check_path(&self.check_path)
    }

    /// Connection settings for historical queries.
    pub fn history_config(&self) -> HistoryConfig {
        HistoryConfig::new(&self.server_url)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ALERT_DISPLAY_WINDOW_SECS must be a positive number of seconds, got `{0}`")]
    InvalidDisplayWindow(String),

    #[error("ALERT_DISPLAY_OFFSET must be a UTC offset like +03:00, got `{0}`")]
    InvalidDisplayOffset(String),
}
