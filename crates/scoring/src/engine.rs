//! Environmental scoring engine
//!
//! Composes the health, species, threat and carbon passes into one
//! [`ScoringResult`]. The only non-determinism is the bounded jitter drawn
//! from the configured [`JitterSource`].

use std::sync::Arc;

use ecolingua_domain::{Reading, ResolvedConditions, ScoringResult};
use tracing::debug;

use crate::carbon::analyze_carbon;
use crate::health::assess_health;
use crate::jitter::{JitterSource, ThreadRngJitter};
use crate::species::estimate_species;
use crate::threat::assess_threats;

/// Scoring engine for validated readings
#[derive(Debug, Clone)]
pub struct EnvironmentalScorer {
    jitter: Arc<dyn JitterSource>,
}

impl EnvironmentalScorer {
    /// Create a scorer drawing jitter from the thread RNG
    pub fn new() -> Self {
        Self::with_jitter(Arc::new(ThreadRngJitter))
    }

    /// Create a scorer with a custom jitter source
    pub fn with_jitter(jitter: Arc<dyn JitterSource>) -> Self {
        Self { jitter }
    }

    /// Score a reading. Never fails; absent inputs use their defaults.
    pub fn score(&self, reading: &Reading) -> ScoringResult {
        let conditions = reading.resolved();
        let result = self.score_conditions(&conditions, reading);

        debug!(
            reading_id = %reading.id(),
            health_score = result.health_score,
            threat_level = ?result.threat_assessment.overall_level,
            "Reading scored"
        );

        result
    }

    fn score_conditions(&self, conditions: &ResolvedConditions, reading: &Reading) -> ScoringResult {
        let health = assess_health(conditions);
        let jitter = self.jitter.as_ref();

        ScoringResult {
            reading_id: reading.id(),
            timestamp: reading.timestamp(),
            health_score: health.score,
            health_tier: health.tier,
            narrative: health.tier.narrative().to_string(),
            recommendations: health.recommendations,
            species_estimate: estimate_species(conditions, jitter),
            threat_assessment: assess_threats(conditions),
            carbon_analysis: analyze_carbon(conditions, jitter),
        }
    }
}

impl Default for EnvironmentalScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::NEUTRAL_RECOMMENDATION;
    use crate::jitter::FixedJitter;
    use ecolingua_domain::{HealthTier, ReadingValidator, ThreatKind, ThreatLevel};
    use serde_json::json;

    fn reading(payload: serde_json::Value) -> Reading {
        ReadingValidator::new().validate(&payload).unwrap()
    }

    fn fixed_scorer() -> EnvironmentalScorer {
        EnvironmentalScorer::with_jitter(Arc::new(FixedJitter::MIDPOINT))
    }

    #[test]
    fn test_ideal_reading() {
        let r = reading(json!({"temperature": 22, "humidity": 60, "pm25": 10, "co2": 400}));
        let result = fixed_scorer().score(&r);

        assert_eq!(result.reading_id, r.id());
        assert_eq!(result.health_score, 98.0);
        assert_eq!(result.health_tier, HealthTier::Optimal);
        assert_eq!(result.narrative, HealthTier::Optimal.narrative());
        assert_eq!(result.recommendations, vec![NEUTRAL_RECOMMENDATION.to_string()]);
        assert_eq!(result.threat_assessment.overall_level, ThreatLevel::Low);
    }

    #[test]
    fn test_extreme_reading_needs_emergency_response() {
        let r = reading(json!({"temperature": 45, "pm25": 200, "co2": 600}));
        let result = fixed_scorer().score(&r);

        let threats = &result.threat_assessment;
        assert_eq!(threats.overall_level, ThreatLevel::High);
        assert!(threats.emergency_response_needed);
        assert!(threats
            .active_threats
            .iter()
            .any(|t| t.kind == ThreatKind::ExtremeTemperature));
        assert!(threats
            .active_threats
            .iter()
            .any(|t| t.kind == ThreatKind::AirPollution));
    }

    #[test]
    fn test_absent_fields_score_like_defaults() {
        let scorer = fixed_scorer();
        let empty = scorer.score(&reading(json!({})));
        let explicit =
            scorer.score(&reading(json!({"temperature": 22, "humidity": 60, "pm25": 25, "co2": 400})));

        assert_eq!(empty.health_score, explicit.health_score);
        assert_eq!(empty.recommendations, explicit.recommendations);
        assert_eq!(empty.threat_assessment, explicit.threat_assessment);
        assert_eq!(empty.species_estimate, explicit.species_estimate);
        assert_eq!(empty.carbon_analysis, explicit.carbon_analysis);
    }

    #[test]
    fn test_camel_case_wire_shape() {
        let result = fixed_scorer().score(&reading(json!({"temperature": 22})));
        let json = serde_json::to_value(&result).unwrap();

        assert!(json["healthScore"].is_number());
        assert!(json["speciesEstimate"]["detectedSpecies"].is_array());
        assert_eq!(json["speciesEstimate"]["detectedSpecies"][0]["activityLevel"], "high");
        assert_eq!(json["threatAssessment"]["overallLevel"], "low");
        assert!(json["carbonAnalysis"]["creditsPotential"].is_u64());
        assert_eq!(json["healthTier"], "optimal");
    }
}
