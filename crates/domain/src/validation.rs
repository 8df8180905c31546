//! Reading validation
//!
//! Turns a raw, untyped JSON payload into a [`Reading`]. Present numeric
//! fields must fall inside their closed ranges; absent (or `null`) fields pass
//! unconditionally and are defaulted later, at scoring time.

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::reading::{
    AllowedRange, Measurements, Reading, AUDIO_LEVEL_RANGE, CO2_RANGE, HUMIDITY_RANGE,
    PM25_RANGE, TEMPERATURE_RANGE, VIBRATION_RANGE,
};

/// Numeric field accepted in a payload.
struct NumericField {
    /// Canonical name, used in error reports
    name: &'static str,
    /// Legacy wire names accepted in place of the canonical one
    aliases: &'static [&'static str],
    range: AllowedRange,
}

const TEMPERATURE: NumericField = NumericField {
    name: "temperature",
    aliases: &[],
    range: TEMPERATURE_RANGE,
};
const HUMIDITY: NumericField = NumericField {
    name: "humidity",
    aliases: &[],
    range: HUMIDITY_RANGE,
};
const PM25: NumericField = NumericField {
    name: "pm25",
    aliases: &["air_quality_pm25", "airQualityPm25"],
    range: PM25_RANGE,
};
const CO2: NumericField = NumericField {
    name: "co2",
    aliases: &["co2_level", "co2Level"],
    range: CO2_RANGE,
};
const AUDIO_LEVEL: NumericField = NumericField {
    name: "audioLevel",
    aliases: &["audio_level"],
    range: AUDIO_LEVEL_RANGE,
};
const VIBRATION: NumericField = NumericField {
    name: "vibration",
    aliases: &[],
    range: VIBRATION_RANGE,
};

/// Validator for incoming reading payloads
#[derive(Debug, Clone, Default)]
pub struct ReadingValidator;

impl ReadingValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Validate a raw payload and assign identity and receipt time.
    ///
    /// Fields are checked in declaration order; the first violation wins.
    pub fn validate(&self, raw: &Value) -> Result<Reading, ValidationError> {
        let object = raw.as_object().ok_or(ValidationError::NotAnObject)?;

        let measurements = Measurements {
            temperature: numeric(object, &TEMPERATURE)?,
            humidity: numeric(object, &HUMIDITY)?,
            pm25: numeric(object, &PM25)?,
            co2: numeric(object, &CO2)?,
            audio_level: numeric(object, &AUDIO_LEVEL)?,
            vibration: numeric(object, &VIBRATION)?,
            device_id: text(object, "deviceId", &["device_id"])?,
            location: text(object, "location", &[])?,
        };

        let reading = Reading::from_measurements(measurements, Uuid::new_v4(), Utc::now());
        debug!(reading_id = %reading.id(), "Reading validated");
        Ok(reading)
    }
}

/// First non-null value stored under `name` or one of its aliases.
fn lookup<'a>(
    object: &'a Map<String, Value>,
    name: &str,
    aliases: &[&str],
) -> Option<&'a Value> {
    std::iter::once(name)
        .chain(aliases.iter().copied())
        .filter_map(|key| object.get(key))
        .find(|value| !value.is_null())
}

fn numeric(
    object: &Map<String, Value>,
    field: &NumericField,
) -> Result<Option<f64>, ValidationError> {
    let Some(raw) = lookup(object, field.name, field.aliases) else {
        return Ok(None);
    };

    // Numeric strings are accepted
    let value = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
    .ok_or_else(|| ValidationError::NotNumeric {
        field: field.name,
        value: raw.clone(),
        allowed_range: field.range,
    })?;

    if !field.range.contains(value) {
        return Err(ValidationError::OutOfRange {
            field: field.name,
            value,
            allowed_range: field.range,
        });
    }

    Ok(Some(value))
}

fn text(
    object: &Map<String, Value>,
    name: &'static str,
    aliases: &[&str],
) -> Result<Option<String>, ValidationError> {
    match lookup(object, name, aliases) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ValidationError::NotText {
            field: name,
            value: other.clone(),
        }),
    }
}
