//! Error types for sensor-history.

use thiserror::Error;

/// Errors that can occur when querying historical data.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The query was rejected before or by the server.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The server has no data for the request.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server answered with an unexpected status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
}
