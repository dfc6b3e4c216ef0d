//! Human-readable banner text for alerts.

use alert_stream::{Alert, SensorSnapshot};
use chrono::FixedOffset;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// Render the detection time of an alert.
///
/// With an `offset` the time is shown in that offset, otherwise in the offset
/// the server reported. Only the wall-clock rendering changes; the instant is
/// the same either way.
pub fn format_detected_at(alert: &Alert, offset: Option<FixedOffset>) -> String {
    let detected_at = alert.detected_at();
    match offset {
        Some(offset) => detected_at
            .with_timezone(&offset)
            .format(TIMESTAMP_FORMAT)
            .to_string(),
        None => detected_at.format(TIMESTAMP_FORMAT).to_string(),
    }
}

/// The one-line banner shown for an alert.
///
/// Always names the building, floor, and detection time. Adds the detector
/// and sensor readings when the alert carries them.
pub fn banner_text(alert: &Alert, offset: Option<FixedOffset>) -> String {
    let mut text = format!(
        "FIRE ALERT: Building {}, Floor {} at {}",
        alert.building(),
        alert.floor(),
        format_detected_at(alert, offset)
    );

    let mut details = Vec::new();
    if let Some(source) = alert.source() {
        details.push(format!("detected by {source}"));
    }
    if let Some(readings) = alert.readings() {
        details.push(format_readings(readings));
    }
    if !details.is_empty() {
        text.push_str(" (");
        text.push_str(&details.join("; "));
        text.push(')');
    }

    text
}

fn format_readings(readings: &SensorSnapshot) -> String {
    let mut parts = Vec::new();
    if let Some(t) = readings.temperature {
        parts.push(format!("{t:.1}°C"));
    }
    if let Some(h) = readings.humidity {
        parts.push(format!("{h:.1}% RH"));
    }
    if let Some(s) = readings.sound_level {
        parts.push(format!("{s:.1} dB"));
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use alert_stream::Building;
    use chrono::DateTime;

    fn alert() -> Alert {
        Alert::new(
            Building::C,
            2,
            DateTime::parse_from_rfc3339("2025-08-06T14:05:09+03:00").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_banner_basic() {
        assert_eq!(
            banner_text(&alert(), None),
            "FIRE ALERT: Building C, Floor 2 at 2025-08-06 14:05:09 +03:00"
        );
    }

    #[test]
    fn test_banner_in_other_offset_keeps_instant() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(
            format_detected_at(&alert(), Some(utc)),
            "2025-08-06 11:05:09 +00:00"
        );
    }

    #[test]
    fn test_banner_with_details() {
        let alert = alert().with_source("nn_model").with_readings(SensorSnapshot {
            temperature: Some(71.46),
            humidity: None,
            sound_level: Some(88.0),
        });
        assert_eq!(
            banner_text(&alert, None),
            "FIRE ALERT: Building C, Floor 2 at 2025-08-06 14:05:09 +03:00 \
             (detected by nn_model; 71.5°C, 88.0 dB)"
        );
    }
}
