//! Threat assessment
//!
//! Three independent hazard axes, evaluated in a fixed order. Each axis
//! contributes at most its highest triggered hazard; the overall level only
//! ever ratchets up across axes.

use ecolingua_domain::{ResolvedConditions, Threat, ThreatAssessment, ThreatKind, ThreatLevel};

/// Temperature axis
pub fn temperature_threat(temperature: f64) -> Option<ThreatKind> {
    if temperature > 40.0 || temperature < -10.0 {
        Some(ThreatKind::ExtremeTemperature)
    } else if temperature > 35.0 || temperature < 0.0 {
        Some(ThreatKind::TemperatureStress)
    } else {
        None
    }
}

/// Particulate axis
pub fn particulate_threat(pm25: f64) -> Option<ThreatKind> {
    if pm25 > 150.0 {
        Some(ThreatKind::AirPollution)
    } else if pm25 > 100.0 {
        Some(ThreatKind::AirQuality)
    } else {
        None
    }
}

/// Carbon dioxide axis
pub fn carbon_threat(co2: f64) -> Option<ThreatKind> {
    (co2 > 500.0).then_some(ThreatKind::CarbonExcess)
}

/// Evaluate all axes
pub fn assess_threats(conditions: &ResolvedConditions) -> ThreatAssessment {
    let active_threats: Vec<Threat> = [
        temperature_threat(conditions.temperature),
        particulate_threat(conditions.pm25),
        carbon_threat(conditions.co2),
    ]
    .into_iter()
    .flatten()
    .map(Threat::from)
    .collect();

    let overall_level = active_threats
        .iter()
        .map(|threat| threat.severity)
        .fold(ThreatLevel::Low, ThreatLevel::max);

    ThreatAssessment {
        overall_level,
        threat_count: active_threats.len(),
        emergency_response_needed: overall_level == ThreatLevel::High,
        active_threats,
    }
}
