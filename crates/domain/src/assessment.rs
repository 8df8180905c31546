//! Scoring result types
//!
//! The derived assessment for one reading. Serialized with camelCase keys,
//! which is the shape returned by the ingest API and pushed to subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Qualitative tier of a health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthTier {
    /// Score > 85
    Optimal,
    /// Score > 70
    Good,
    /// Score > 50
    ModerateStress,
    /// Everything else
    SignificantStress,
}

impl HealthTier {
    /// Convert a health score to its tier
    pub fn from_score(score: f64) -> Self {
        if score > 85.0 {
            HealthTier::Optimal
        } else if score > 70.0 {
            HealthTier::Good
        } else if score > 50.0 {
            HealthTier::ModerateStress
        } else {
            HealthTier::SignificantStress
        }
    }

    /// Fixed descriptive sentence for the tier
    pub fn narrative(&self) -> &'static str {
        match self {
            HealthTier::Optimal => "Environmental conditions are optimal. The ecosystem shows excellent stability with balanced temperature, humidity, and air quality supporting thriving biodiversity.",
            HealthTier::Good => "Environmental conditions are good with minor variations. The ecosystem maintains healthy balance with adequate conditions for most species.",
            HealthTier::ModerateStress => "Environmental conditions show moderate stress indicators. Some parameters are outside optimal ranges, requiring monitoring and potential intervention.",
            HealthTier::SignificantStress => "Environmental conditions indicate significant stress. Multiple parameters are concerning and immediate attention is recommended for ecosystem protection.",
        }
    }
}

/// Activity level, used both per species and for the whole ecosystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little observed activity
    Low,
    /// Some activity
    Moderate,
    /// Strong activity
    High,
}

/// Threat severity, ordered `Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatLevel {
    /// No active hazard
    Low,
    /// Hazard requiring monitoring
    Medium,
    /// Hazard requiring emergency response
    High,
}

/// Hazard categories, one or none per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatKind {
    /// Temperature > 40 or < -10
    ExtremeTemperature,
    /// Temperature > 35 or < 0
    TemperatureStress,
    /// PM2.5 > 150
    AirPollution,
    /// PM2.5 > 100
    AirQuality,
    /// CO2 > 500
    CarbonExcess,
}

impl ThreatKind {
    /// Severity attached to this hazard
    pub fn severity(&self) -> ThreatLevel {
        match self {
            ThreatKind::ExtremeTemperature | ThreatKind::AirPollution => ThreatLevel::High,
            ThreatKind::TemperatureStress | ThreatKind::AirQuality | ThreatKind::CarbonExcess => {
                ThreatLevel::Medium
            }
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ThreatKind::ExtremeTemperature => "Extreme temperature conditions",
            ThreatKind::TemperatureStress => "Temperature stress conditions",
            ThreatKind::AirPollution => "Severe air quality degradation",
            ThreatKind::AirQuality => "Moderate air quality concerns",
            ThreatKind::CarbonExcess => "Elevated carbon dioxide levels",
        }
    }
}

/// One active hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threat {
    /// Hazard category
    #[serde(rename = "type")]
    pub kind: ThreatKind,
    /// Severity of the hazard
    pub severity: ThreatLevel,
    /// Human-readable description
    pub description: String,
}

impl From<ThreatKind> for Threat {
    fn from(kind: ThreatKind) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            description: kind.description().to_string(),
        }
    }
}

/// Threat classification for one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatAssessment {
    /// Highest severity across all axes
    pub overall_level: ThreatLevel,
    /// Active hazards in evaluation order (temperature, PM2.5, CO2)
    pub active_threats: Vec<Threat>,
    /// Number of active hazards
    pub threat_count: usize,
    /// True iff the overall level is high
    pub emergency_response_needed: bool,
}

/// One canned species entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedSpecies {
    /// Common name
    pub name: String,
    /// Confidence (0.0 to 1.0)
    pub confidence: f64,
    /// Activity level of this species
    pub activity_level: ActivityLevel,
}

/// Species activity estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesEstimate {
    /// Species expected under the observed conditions
    pub detected_species: Vec<DetectedSpecies>,
    /// Number of detected species
    pub species_count: usize,
    /// Biodiversity index (0.0 to 1.0)
    pub biodiversity_index: f64,
    /// Overall ecosystem activity tier
    pub ecosystem_activity: ActivityLevel,
}

/// Carbon sequestration estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonAnalysis {
    /// Sequestration rate, never negative
    pub sequestration_rate: f64,
    /// Potential carbon credits
    pub credits_potential: u32,
    /// Sequestration minus CO2 excess
    pub net_balance: f64,
    /// Rate relative to baseline, percent (0 to 100)
    pub efficiency_percent: f64,
}

/// Derived assessment for one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    /// Identifier of the scored reading
    pub reading_id: Uuid,
    /// Receipt time of the scored reading
    pub timestamp: DateTime<Utc>,
    /// Health score (0.0 to 100.0)
    pub health_score: f64,
    /// Tier the health score falls in
    pub health_tier: HealthTier,
    /// Fixed sentence for the tier
    pub narrative: String,
    /// Ordered advisories, never empty
    pub recommendations: Vec<String>,
    /// Species activity estimate
    pub species_estimate: SpeciesEstimate,
    /// Threat classification
    pub threat_assessment: ThreatAssessment,
    /// Carbon sequestration estimate
    pub carbon_analysis: CarbonAnalysis,
}
