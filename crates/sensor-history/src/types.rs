//! Query and response types for the sensor API.

use std::fmt;
use std::str::FromStr;

use alert_stream::Building;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::HistoryError;

/// Format the API expects for time bounds.
const TIME_BOUND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Default page size for series queries, large enough for a chart.
pub const DEFAULT_SERIES_PAGE_SIZE: u32 = 1000;

/// Kind of sensor signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    Temperature,
    Humidity,
    Acoustic,
}

impl SignalKind {
    /// Name used by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
            Self::Acoustic => "Acoustic",
        }
    }

    /// Unit of the measured value.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Humidity => "%",
            Self::Acoustic => "dB",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalKind {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "temperature" | "temp" => Ok(Self::Temperature),
            "humidity" => Ok(Self::Humidity),
            "acoustic" | "sound" => Ok(Self::Acoustic),
            other => Err(HistoryError::InvalidQuery(format!(
                "unknown signal type `{other}` (expected Temperature, Humidity or Acoustic)"
            ))),
        }
    }
}

/// A building/floor pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub building: Building,
    pub floor: u8,
}

impl Location {
    /// Create a location, checking the floor against the building.
    pub fn new(building: Building, floor: i64) -> Result<Self, HistoryError> {
        if !building.has_floor(floor) {
            return Err(HistoryError::InvalidQuery(format!(
                "building {building} has no floor {floor}"
            )));
        }
        Ok(Self {
            building,
            floor: floor as u8,
        })
    }

    /// Short key, e.g. "A-1".
    pub fn key(&self) -> String {
        format!("{}-{}", self.building, self.floor)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Floor {}", self.building, self.floor)
    }
}

impl FromStr for Location {
    type Err = HistoryError;

    /// Parse "A-1" or "A1".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (building, floor) = match s.split_once('-') {
            Some(parts) => parts,
            None if s.len() > 1 && s.is_char_boundary(1) => s.split_at(1),
            None => {
                return Err(HistoryError::InvalidQuery(format!(
                    "invalid location `{s}` (expected e.g. A-1)"
                )))
            }
        };
        let building: Building = building
            .parse()
            .map_err(|e: alert_stream::DecodeError| HistoryError::InvalidQuery(e.to_string()))?;
        let floor: i64 = floor
            .trim()
            .parse()
            .map_err(|_| HistoryError::InvalidQuery(format!("invalid floor in `{s}`")))?;
        Self::new(building, floor)
    }
}

/// Optional start (inclusive) and end (exclusive) time bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl TimeWindow {
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    /// The window covering `days` whole days starting at `date`.
    ///
    /// The end is left open when it falls past the last representable date.
    pub fn days(date: NaiveDate, days: u32) -> Self {
        let start = date.and_hms_opt(0, 0, 0);
        let end = start.and_then(|s| {
            TimeDelta::try_days(i64::from(days)).and_then(|d| s.checked_add_signed(d))
        });
        Self { start, end }
    }

    /// Check that the window is not inverted or empty.
    pub fn validate(&self) -> Result<(), HistoryError> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start >= end {
                return Err(HistoryError::InvalidQuery(format!(
                    "start_time {start} is not before end_time {end}"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(start) = self.start {
            params.push(("start_time", start.format(TIME_BOUND_FORMAT).to_string()));
        }
        if let Some(end) = self.end {
            params.push(("end_time", end.format(TIME_BOUND_FORMAT).to_string()));
        }
        params
    }
}

/// Parse a time bound given as a date ("2025-08-06") or a date-time
/// ("2025-08-06T14:00:00" or "2025-08-06 14:00").
pub fn parse_time_bound(value: &str) -> Result<NaiveDateTime, HistoryError> {
    let value = value.trim();
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(ts);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            HistoryError::InvalidQuery(format!(
                "invalid date `{value}` (use YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)"
            ))
        })
}

/// A time-series query over one or more locations.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryQuery {
    pub kind: SignalKind,
    pub locations: Vec<Location>,
    pub window: TimeWindow,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
}

impl HistoryQuery {
    /// Create a query for the first page of `kind` with no locations yet.
    pub fn new(kind: SignalKind) -> Self {
        Self {
            kind,
            locations: Vec::new(),
            window: TimeWindow::default(),
            page: 1,
            page_size: DEFAULT_SERIES_PAGE_SIZE,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Check the query before sending it.
    pub fn validate(&self) -> Result<(), HistoryError> {
        if self.locations.is_empty() {
            return Err(HistoryError::InvalidQuery(
                "at least one building/floor pair is required".to_string(),
            ));
        }
        if self.page == 0 || self.page_size == 0 {
            return Err(HistoryError::InvalidQuery(
                "page and page_size must be at least 1".to_string(),
            ));
        }
        self.window.validate()
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub page: u32,
    pub page_size: u32,
    pub total_results: u64,
    pub total_pages: u64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// An empty page, used when the server reports nothing to list.
    pub fn empty(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            total_results: 0,
            total_pages: 0,
            results: Vec::new(),
        }
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }
}

/// One stored sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    #[serde(default)]
    pub sensor_id: Option<String>,

    #[serde(rename = "type")]
    pub kind: SignalKind,

    pub building: String,

    pub floor: i64,

    /// When the reading was stored, with the server's offset.
    pub timestamp: DateTime<FixedOffset>,

    #[serde(default)]
    pub temperature: Option<f64>,

    #[serde(default)]
    pub humidity: Option<f64>,

    #[serde(default)]
    pub sound_level: Option<f64>,
}

impl SensorReading {
    /// The measured value for `kind`, if this reading carries it.
    pub fn value(&self, kind: SignalKind) -> Option<f64> {
        match kind {
            SignalKind::Temperature => self.temperature,
            SignalKind::Humidity => self.humidity,
            SignalKind::Acoustic => self.sound_level,
        }
    }
}

/// A chartable series for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// e.g. "Temperature - A Floor 1".
    pub label: String,
    pub kind: SignalKind,
    pub location: Location,
    pub points: Vec<(DateTime<FixedOffset>, f64)>,
}

impl Series {
    /// Build a series from readings, skipping readings without a value.
    pub fn from_readings(kind: SignalKind, location: Location, readings: &[SensorReading]) -> Self {
        let points = readings
            .iter()
            .filter_map(|r| r.value(kind).map(|v| (r.timestamp, v)))
            .collect();
        Self {
            label: format!("{} - {} Floor {}", kind, location.building, location.floor),
            kind,
            location,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Summary statistics for one signal kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorStats {
    pub sensor_type: SignalKind,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub mean: f64,
    #[serde(rename = "top10_max")]
    pub top10_max: Vec<f64>,
    #[serde(rename = "top10_min")]
    pub top10_min: Vec<f64>,
}

/// Whether a location currently has a fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireStatus {
    pub fire: bool,
}

/// A scheduled event that is in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub building: String,
    pub floor: i64,
    pub start_time: DateTime<FixedOffset>,
    /// Length of the event in seconds.
    pub duration: i64,
}

impl ActiveEvent {
    /// When the event is over, or `None` if the duration runs past what a
    /// timestamp can hold.
    pub fn ends_at(&self) -> Option<DateTime<FixedOffset>> {
        TimeDelta::try_seconds(self.duration).and_then(|d| self.start_time.checked_add_signed(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_kind_parse() {
        assert_eq!("temperature".parse::<SignalKind>().unwrap(), SignalKind::Temperature);
        assert_eq!("Acoustic".parse::<SignalKind>().unwrap(), SignalKind::Acoustic);
        assert!("pressure".parse::<SignalKind>().is_err());
    }

    #[test]
    fn test_location_parse() {
        assert_eq!(
            "A-1".parse::<Location>().unwrap(),
            Location::new(Building::A, 1).unwrap()
        );
        assert_eq!(
            "c4".parse::<Location>().unwrap(),
            Location::new(Building::C, 4).unwrap()
        );
        assert!("A-9".parse::<Location>().is_err());
        assert!("Z-1".parse::<Location>().is_err());
        assert!("A".parse::<Location>().is_err());
    }

    #[test]
    fn test_parse_time_bound() {
        let day = parse_time_bound("2025-08-06").unwrap();
        assert_eq!(day.to_string(), "2025-08-06 00:00:00");
        let ts = parse_time_bound("2025-08-06T14:30:00").unwrap();
        assert_eq!(ts.to_string(), "2025-08-06 14:30:00");
        assert!(parse_time_bound("06/08/2025").is_err());
    }

    #[test]
    fn test_query_validation() {
        let query = HistoryQuery::new(SignalKind::Humidity);
        assert!(query.validate().is_err());

        let query = query.with_location(Location::new(Building::B, 2).unwrap());
        assert!(query.validate().is_ok());

        let inverted = TimeWindow::new(
            Some(parse_time_bound("2025-08-07").unwrap()),
            Some(parse_time_bound("2025-08-06").unwrap()),
        );
        assert!(query.clone().with_window(inverted).validate().is_err());
        assert!(query.with_page(0, 10).validate().is_err());
    }

    #[test]
    fn test_window_params() {
        let window = TimeWindow::days(NaiveDate::from_ymd_opt(2025, 8, 6).unwrap(), 1);
        assert_eq!(
            window.query_params(),
            vec![
                ("start_time", "2025-08-06T00:00:00".to_string()),
                ("end_time", "2025-08-07T00:00:00".to_string()),
            ]
        );
    }

    #[test]
    fn test_window_days_overflow_leaves_end_open() {
        let window = TimeWindow::days(NaiveDate::from_ymd_opt(2025, 8, 6).unwrap(), u32::MAX);
        assert!(window.start.is_some());
        assert_eq!(window.end, None);
    }

    #[test]
    fn test_series_skips_missing_values() {
        let location = Location::new(Building::A, 1).unwrap();
        let ts = DateTime::parse_from_rfc3339("2025-08-06T14:00:00+03:00").unwrap();
        let reading = |temperature| SensorReading {
            sensor_id: None,
            kind: SignalKind::Temperature,
            building: "A".to_string(),
            floor: 1,
            timestamp: ts,
            temperature,
            humidity: None,
            sound_level: None,
        };

        let series = Series::from_readings(
            SignalKind::Temperature,
            location,
            &[reading(Some(21.5)), reading(None), reading(Some(22.0))],
        );
        assert_eq!(series.label, "Temperature - A Floor 1");
        assert_eq!(series.points.len(), 2);
    }

    #[test]
    fn test_active_event_end() {
        let event = ActiveEvent {
            kind: "fire".to_string(),
            building: "B".to_string(),
            floor: 2,
            start_time: DateTime::parse_from_rfc3339("2025-08-06T14:00:00+03:00").unwrap(),
            duration: 600,
        };
        assert_eq!(
            event.ends_at().map(|t| t.to_rfc3339()),
            Some("2025-08-06T14:10:00+03:00".to_string())
        );
    }

    #[test]
    fn test_active_event_huge_duration_has_no_end() {
        let event: ActiveEvent = serde_json::from_str(
            r#"{"type":"fire","building":"A","floor":1,
                "start_time":"2025-08-06T14:00:00+03:00","duration":9223372036854775807}"#,
        )
        .unwrap();
        assert_eq!(event.ends_at(), None);
    }
}
