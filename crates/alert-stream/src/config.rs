//! Configuration types for alert-stream.

/// Default base URL of the alert server.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default path of the WebSocket alert endpoint.
pub const DEFAULT_EVENTS_PATH: &str = "/ws/alerts";

/// Default path used to check that the server is up.
pub const DEFAULT_CHECK_PATH: &str = "/docs";

/// Configuration for connecting to the alert server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Base URL of the server (e.g., "http://localhost:8000").
    pub base_url: String,
    /// Path of the WebSocket endpoint that pushes alerts.
    pub events_path: String,
    /// Path answered with a success status when the server is ready.
    pub check_path: String,
}

impl StreamConfig {
    /// Create a new configuration with the given base URL and default paths.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            events_path: DEFAULT_EVENTS_PATH.to_string(),
            check_path: DEFAULT_CHECK_PATH.to_string(),
        }
    }

    /// Override the WebSocket endpoint path.
    pub fn with_events_path(mut self, path: impl Into<String>) -> Self {
        self.events_path = path.into();
        self
    }

    /// Override the health check path.
    pub fn with_check_path(mut self, path: impl Into<String>) -> Self {
        self.check_path = path.into();
        self
    }

    /// Get the WebSocket endpoint URL.
    ///
    /// `http` and `https` base URLs map to `ws` and `wss`.
    pub fn events_url(&self) -> String {
        let url = join_url(&self.base_url, &self.events_path);
        if let Some(rest) = url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            url
        }
    }

    /// Get the health check endpoint URL.
    pub fn check_url(&self) -> String {
        join_url(&self.base_url, &self.check_path)
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
