//! Property tests for the scoring engine
//!
//! Every valid reading must produce bounded outputs, and threat severity must
//! never drop as temperature climbs through the stress bands.

use ecolingua_domain::{Reading, ReadingValidator};
use ecolingua_scoring::threat::assess_threats;
use ecolingua_scoring::EnvironmentalScorer;
use proptest::prelude::*;
use serde_json::json;

fn reading(temperature: f64, humidity: f64, pm25: f64, co2: f64) -> Reading {
    ReadingValidator::new()
        .validate(&json!({
            "temperature": temperature,
            "humidity": humidity,
            "pm25": pm25,
            "co2": co2,
        }))
        .expect("generated values are inside the declared ranges")
}

proptest! {
    #[test]
    fn outputs_stay_in_bounds(
        temperature in -50.0f64..=60.0,
        humidity in 0.0f64..=100.0,
        pm25 in 0.0f64..=500.0,
        co2 in 300.0f64..=5000.0,
    ) {
        let result = EnvironmentalScorer::new().score(&reading(temperature, humidity, pm25, co2));

        prop_assert!((0.0..=100.0).contains(&result.health_score));
        prop_assert!((0.0..=100.0).contains(&result.carbon_analysis.efficiency_percent));
        prop_assert!(result.carbon_analysis.sequestration_rate >= 0.0);
        prop_assert!((0.0..=1.0).contains(&result.species_estimate.biodiversity_index));
        prop_assert!(!result.recommendations.is_empty());
        prop_assert_eq!(
            result.threat_assessment.threat_count,
            result.threat_assessment.active_threats.len()
        );
    }

    #[test]
    fn threat_level_monotone_in_heat(
        t1 in 0.0f64..=60.0,
        t2 in 0.0f64..=60.0,
        humidity in 0.0f64..=100.0,
        pm25 in 0.0f64..=500.0,
        co2 in 300.0f64..=5000.0,
    ) {
        let (low, high) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };

        let cooler = assess_threats(&reading(low, humidity, pm25, co2).resolved());
        let warmer = assess_threats(&reading(high, humidity, pm25, co2).resolved());

        prop_assert!(cooler.overall_level <= warmer.overall_level);
    }

    #[test]
    fn emergency_iff_high(
        temperature in -50.0f64..=60.0,
        pm25 in 0.0f64..=500.0,
        co2 in 300.0f64..=5000.0,
    ) {
        let assessment = assess_threats(&reading(temperature, 60.0, pm25, co2).resolved());
        prop_assert_eq!(
            assessment.emergency_response_needed,
            assessment.overall_level == ecolingua_domain::ThreatLevel::High
        );
    }
}

#[test]
fn repeated_defaults_stay_within_jitter_bounds() {
    let scorer = EnvironmentalScorer::new();
    let validator = ReadingValidator::new();

    for _ in 0..200 {
        let result = scorer.score(&validator.validate(&json!({})).unwrap());
        assert_eq!(result.health_score, 95.0);

        // 4 species * 0.2 + [0.1, 0.3], capped at 1
        let index = result.species_estimate.biodiversity_index;
        assert!((0.9 - 1e-9..=1.0).contains(&index));

        // 6.6 + [-1, 1]
        let rate = result.carbon_analysis.sequestration_rate;
        assert!((5.6 - 1e-9..=7.6 + 1e-9).contains(&rate));

        // round(rate * 10 + [-5, 15])
        let credits = result.carbon_analysis.credits_potential;
        assert!((51..=91).contains(&credits));
    }
}
