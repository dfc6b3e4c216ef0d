//! Wire format of alert messages pushed by the server.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::types::{Alert, Building, SensorSnapshot};

/// An alert message as it appears in a WebSocket text frame.
///
/// Every field is optional at this level so that a missing field is
/// reported by name instead of as a generic parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertPayload {
    #[serde(default)]
    pub building: Option<String>,

    #[serde(default)]
    pub floor: Option<i64>,

    /// ISO-8601 timestamp with offset (e.g., "2025-08-06T14:00:00+03:00").
    #[serde(default)]
    pub detected_at: Option<String>,

    /// Event type, "fire" for alerts raised by the detector.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// Name of the model that raised the alert.
    #[serde(default)]
    pub source: Option<String>,

    /// Readings that triggered the alert.
    #[serde(default)]
    pub sensor_data: Option<SensorSnapshot>,
}

impl AlertPayload {
    /// Validate the payload and build an [`Alert`].
    pub fn into_alert(self) -> Result<Alert, DecodeError> {
        let building: Building = self
            .building
            .ok_or(DecodeError::MissingField("building"))?
            .parse()?;
        let floor = self.floor.ok_or(DecodeError::MissingField("floor"))?;
        let raw_ts = self
            .detected_at
            .ok_or(DecodeError::MissingField("detected_at"))?;
        let detected_at = parse_timestamp(&raw_ts)?;

        let mut alert = Alert::new(building, floor, detected_at)?;
        if let Some(source) = self.source {
            alert = alert.with_source(source);
        }
        if let Some(readings) = self.sensor_data {
            alert = alert.with_readings(readings);
        }
        Ok(alert)
    }
}

/// Decode the `data:` field of one channel message into an [`Alert`].
pub fn decode_alert(data: &str) -> Result<Alert, DecodeError> {
    let payload: AlertPayload =
        serde_json::from_str(data).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    payload.into_alert()
}

fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, DecodeError> {
    match DateTime::parse_from_rfc3339(value.trim()) {
        Ok(ts) => Ok(ts),
        Err(e) => {
            // A local time without offset names no instant.
            let reason = if NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%dT%H:%M:%S%.f").is_ok() {
                "missing UTC offset".to_string()
            } else {
                e.to_string()
            };
            Err(DecodeError::InvalidTimestamp {
                value: value.to_string(),
                reason,
            })
        }
    }
}
