//! HTTP client for the alert server.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::config::StreamConfig;
use crate::error::StreamError;

/// Client for the alert server.
#[derive(Clone)]
pub struct AlertClient {
    http: Client,
    config: StreamConfig,
    connected: Arc<AtomicBool>,
}

impl AlertClient {
    /// Connect to the alert server, verifying it with a health check.
    pub async fn connect(config: StreamConfig) -> Result<Self, StreamError> {
        let client = Self::new(config)?;

        if client.health_check().await? {
            info!("Connected to alert server at {}", client.config.base_url);
        } else {
            return Err(StreamError::HealthCheckFailed);
        }

        Ok(client)
    }

    /// Create a client without contacting the server.
    pub fn new(config: StreamConfig) -> Result<Self, StreamError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(StreamError::Http)?;

        Ok(Self {
            http,
            config,
            connected: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Whether the last health check succeeded.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Perform a health check against the server.
    pub async fn health_check(&self) -> Result<bool, StreamError> {
        let url = self.config.check_url();
        debug!("Health check: {}", url);

        match self.http.get(&url).send().await {
            Ok(resp) => {
                let ok = resp.status().is_success();
                self.connected.store(ok, Ordering::SeqCst);
                Ok(ok)
            }
            Err(e) => {
                self.connected.store(false, Ordering::SeqCst);
                Err(StreamError::Http(e))
            }
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Get the underlying HTTP client.
    pub fn http_client(&self) -> &Client {
        &self.http
    }
}

impl std::fmt::Debug for AlertClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertClient")
            .field("config", &self.config)
            .field("connected", &self.is_connected())
            .finish()
    }
}
