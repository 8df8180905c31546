//! Environmental readings
//!
//! A `Reading` can only be produced by the [`ReadingValidator`](crate::ReadingValidator),
//! so every present numeric field is known to lie inside its declared range.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Closed interval a numeric reading field must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllowedRange {
    /// Inclusive lower bound
    pub min: f64,
    /// Inclusive upper bound
    pub max: f64,
}

impl AllowedRange {
    /// Create a new closed range
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Check whether `value` lies inside the range (bounds included)
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for AllowedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Temperature in degrees Celsius
pub const TEMPERATURE_RANGE: AllowedRange = AllowedRange::new(-50.0, 60.0);
/// Relative humidity in percent
pub const HUMIDITY_RANGE: AllowedRange = AllowedRange::new(0.0, 100.0);
/// PM2.5 in micrograms per cubic metre
pub const PM25_RANGE: AllowedRange = AllowedRange::new(0.0, 500.0);
/// CO2 concentration in ppm
pub const CO2_RANGE: AllowedRange = AllowedRange::new(300.0, 5000.0);
/// Audio level in dB
pub const AUDIO_LEVEL_RANGE: AllowedRange = AllowedRange::new(0.0, 1000.0);
/// Vibration intensity
pub const VIBRATION_RANGE: AllowedRange = AllowedRange::new(0.0, 500.0);

/// One validated environmental sample.
///
/// Fields are private: a reading is immutable once the validator has built it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    id: Uuid,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    humidity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pm25: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    co2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vibration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
}

/// Measured fields of a reading, before identity is assigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Measurements {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pm25: Option<f64>,
    pub co2: Option<f64>,
    pub audio_level: Option<f64>,
    pub vibration: Option<f64>,
    pub device_id: Option<String>,
    pub location: Option<String>,
}

impl Reading {
    pub(crate) fn from_measurements(m: Measurements, id: Uuid, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            timestamp,
            temperature: m.temperature,
            humidity: m.humidity,
            pm25: m.pm25,
            co2: m.co2,
            audio_level: m.audio_level,
            vibration: m.vibration,
            device_id: m.device_id,
            location: m.location,
        }
    }

    /// Unique reading identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Instant the reading was received
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Temperature in Celsius (optional)
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    /// Humidity percentage (optional)
    pub fn humidity(&self) -> Option<f64> {
        self.humidity
    }

    /// PM2.5 concentration (optional)
    pub fn pm25(&self) -> Option<f64> {
        self.pm25
    }

    /// CO2 in ppm (optional)
    pub fn co2(&self) -> Option<f64> {
        self.co2
    }

    /// Audio level in dB (optional, not scored)
    pub fn audio_level(&self) -> Option<f64> {
        self.audio_level
    }

    /// Vibration intensity (optional, not scored)
    pub fn vibration(&self) -> Option<f64> {
        self.vibration
    }

    /// Reporting device identifier
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// Location name
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Resolve absent scored fields to their documented defaults
    pub fn resolved(&self) -> ResolvedConditions {
        ResolvedConditions {
            temperature: self.temperature.unwrap_or(ResolvedConditions::DEFAULT_TEMPERATURE),
            humidity: self.humidity.unwrap_or(ResolvedConditions::DEFAULT_HUMIDITY),
            pm25: self.pm25.unwrap_or(ResolvedConditions::DEFAULT_PM25),
            co2: self.co2.unwrap_or(ResolvedConditions::DEFAULT_CO2),
        }
    }
}

/// The four scored inputs with defaults substituted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedConditions {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Humidity percentage
    pub humidity: f64,
    /// PM2.5 concentration
    pub pm25: f64,
    /// CO2 in ppm
    pub co2: f64,
}

impl ResolvedConditions {
    /// Default temperature when absent
    pub const DEFAULT_TEMPERATURE: f64 = 22.0;
    /// Default humidity when absent
    pub const DEFAULT_HUMIDITY: f64 = 60.0;
    /// Default PM2.5 when absent
    pub const DEFAULT_PM25: f64 = 25.0;
    /// Default CO2 when absent
    pub const DEFAULT_CO2: f64 = 400.0;
}

impl Default for ResolvedConditions {
    fn default() -> Self {
        Self {
            temperature: Self::DEFAULT_TEMPERATURE,
            humidity: Self::DEFAULT_HUMIDITY,
            pm25: Self::DEFAULT_PM25,
            co2: Self::DEFAULT_CO2,
        }
    }
}
