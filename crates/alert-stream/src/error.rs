//! Error types for alert-stream.

use thiserror::Error;

use crate::types::Building;

/// Errors that can occur when talking to the alert server.
#[derive(Debug, Error)]
pub enum StreamError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the server failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Server health check failed.
    #[error("Health check failed")]
    HealthCheckFailed,

    /// WebSocket transport error after the connection was open.
    #[error("WebSocket error: {0}")]
    WebSocket(String),
}

/// Reasons an inbound channel message could not become an [`Alert`](crate::Alert).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload is not a JSON object of the expected shape.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// A required field is absent or null.
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// The building code is not one of the known buildings.
    #[error("unknown building `{0}`")]
    UnknownBuilding(String),

    /// The floor is outside the building's floor range.
    #[error("floor {floor} out of range for building {building}")]
    FloorOutOfRange { building: Building, floor: i64 },

    /// The detection timestamp could not be read as an instant.
    #[error("invalid timestamp `{value}`: {reason}")]
    InvalidTimestamp { value: String, reason: String },
}
