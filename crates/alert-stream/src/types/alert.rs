//! The typed fire alert.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// A monitored building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Building {
    A,
    B,
    C,
}

impl Building {
    /// Every known building, in code order.
    pub const ALL: [Building; 3] = [Building::A, Building::B, Building::C];

    /// The building code as sent on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }

    /// Floors with installed sensors.
    pub fn floors(&self) -> RangeInclusive<u8> {
        match self {
            Self::A | Self::B | Self::C => 1..=4,
        }
    }

    /// Check whether `floor` exists in this building.
    pub fn has_floor(&self, floor: i64) -> bool {
        u8::try_from(floor).is_ok_and(|f| self.floors().contains(&f))
    }
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Building {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            "C" | "c" => Ok(Self::C),
            other => Err(DecodeError::UnknownBuilding(other.to_string())),
        }
    }
}

/// Sensor values that led to an alert, when the server includes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Temperature in degrees Celsius.
    #[serde(default)]
    pub temperature: Option<f64>,

    /// Relative humidity in percent.
    #[serde(default)]
    pub humidity: Option<f64>,

    /// Sound level in decibels.
    #[serde(default, rename = "soundLevel")]
    pub sound_level: Option<f64>,
}

impl SensorSnapshot {
    /// True when no value is present.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.humidity.is_none() && self.sound_level.is_none()
    }
}

/// One fire-detection event.
///
/// An `Alert` cannot be changed after construction and has no identity
/// beyond its fields: two equal alerts are still two separate occurrences.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    building: Building,
    floor: u8,
    detected_at: DateTime<FixedOffset>,
    source: Option<String>,
    readings: Option<SensorSnapshot>,
}

impl Alert {
    /// Create an alert, checking the floor against the building.
    pub fn new(
        building: Building,
        floor: i64,
        detected_at: DateTime<FixedOffset>,
    ) -> Result<Self, DecodeError> {
        if !building.has_floor(floor) {
            return Err(DecodeError::FloorOutOfRange { building, floor });
        }

        Ok(Self {
            building,
            floor: floor as u8,
            detected_at,
            source: None,
            readings: None,
        })
    }

    /// Attach the name of the detector that raised the alert.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach the sensor readings behind the alert.
    pub fn with_readings(mut self, readings: SensorSnapshot) -> Self {
        self.readings = (!readings.is_empty()).then_some(readings);
        self
    }

    pub fn building(&self) -> Building {
        self.building
    }

    pub fn floor(&self) -> u8 {
        self.floor
    }

    /// Detection instant, in the offset the server reported it in.
    pub fn detected_at(&self) -> DateTime<FixedOffset> {
        self.detected_at
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn readings(&self) -> Option<&SensorSnapshot> {
        self.readings.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2025-08-06T14:00:00+03:00").unwrap()
    }

    #[test]
    fn test_building_parse() {
        assert_eq!("A".parse::<Building>().unwrap(), Building::A);
        assert_eq!(" c ".parse::<Building>().unwrap(), Building::C);
        assert_eq!(
            "D".parse::<Building>(),
            Err(DecodeError::UnknownBuilding("D".to_string()))
        );
    }

    #[test]
    fn test_floor_bounds() {
        assert!(Building::B.has_floor(1));
        assert!(Building::B.has_floor(4));
        assert!(!Building::B.has_floor(0));
        assert!(!Building::B.has_floor(5));
        assert!(!Building::B.has_floor(-1));
        assert!(!Building::B.has_floor(i64::from(u8::MAX) + 1));
    }

    #[test]
    fn test_alert_rejects_bad_floor() {
        let err = Alert::new(Building::A, 9, ts()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::FloorOutOfRange {
                building: Building::A,
                floor: 9
            }
        );
    }

    #[test]
    fn test_empty_readings_are_dropped() {
        let alert = Alert::new(Building::A, 1, ts())
            .unwrap()
            .with_readings(SensorSnapshot::default());
        assert!(alert.readings().is_none());
    }
}
