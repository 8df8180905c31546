//! Health score, narrative tier and recommendations

use ecolingua_domain::{HealthTier, ResolvedConditions};

use crate::round_to;

/// Advisory emitted when no threshold rule triggers
pub const NEUTRAL_RECOMMENDATION: &str =
    "Environmental conditions are within optimal ranges - maintain current practices";

/// Threshold rule producing one fixed advisory. Evaluated in table order.
struct AdvisoryRule {
    triggered: fn(&ResolvedConditions) -> bool,
    advisory: &'static str,
}

const ADVISORY_RULES: [AdvisoryRule; 6] = [
    AdvisoryRule {
        triggered: |c| c.temperature > 35.0,
        advisory: "Temperature is elevated - consider shade structures or cooling measures",
    },
    AdvisoryRule {
        triggered: |c| c.temperature < 5.0,
        advisory: "Temperature is low - monitor for frost damage and wildlife stress",
    },
    AdvisoryRule {
        triggered: |c| c.humidity < 30.0,
        advisory: "Low humidity detected - increase moisture retention measures",
    },
    AdvisoryRule {
        triggered: |c| c.humidity > 85.0,
        advisory: "High humidity may promote fungal growth - ensure proper ventilation",
    },
    AdvisoryRule {
        triggered: |c| c.pm25 > 100.0,
        advisory: "Air quality is poor - identify and reduce pollution sources",
    },
    AdvisoryRule {
        triggered: |c| c.co2 > 450.0,
        advisory: "Elevated CO2 levels - enhance carbon sequestration efforts",
    },
];

/// Health portion of a scoring result
#[derive(Debug, Clone, PartialEq)]
pub struct HealthInsights {
    /// Score (0.0 to 100.0), one decimal
    pub score: f64,
    /// Tier of the score
    pub tier: HealthTier,
    /// Ordered advisories, never empty
    pub recommendations: Vec<String>,
}

/// Temperature sub-score, ideal 22 C
pub fn temperature_score(temperature: f64) -> f64 {
    (100.0 - (temperature - 22.0).abs() * 2.0).max(0.0)
}

/// Humidity sub-score, ideal 60 %
pub fn humidity_score(humidity: f64) -> f64 {
    (100.0 - (humidity - 60.0).abs() * 1.5).max(0.0)
}

/// Air sub-score, ideal PM2.5 of zero
pub fn air_score(pm25: f64) -> f64 {
    (100.0 - pm25 * 0.8).max(0.0)
}

/// CO2 sub-score. Exceeds 100 below 400 ppm; the overall clamp absorbs that.
pub fn co2_score(co2: f64) -> f64 {
    (100.0 - (co2 - 400.0) * 0.2).max(0.0)
}

/// Unweighted mean of the four sub-scores, clamped to `[0, 100]`, unrounded
fn mean_score(conditions: &ResolvedConditions) -> f64 {
    let mean = (temperature_score(conditions.temperature)
        + humidity_score(conditions.humidity)
        + air_score(conditions.pm25)
        + co2_score(conditions.co2))
        / 4.0;
    mean.clamp(0.0, 100.0)
}

/// Reported health score: the clamped mean to one decimal
pub fn health_score(conditions: &ResolvedConditions) -> f64 {
    round_to(mean_score(conditions), 1)
}

/// Advisories for every triggered rule, or the neutral advisory
pub fn recommendations(conditions: &ResolvedConditions) -> Vec<String> {
    let triggered: Vec<String> = ADVISORY_RULES
        .iter()
        .filter(|rule| (rule.triggered)(conditions))
        .map(|rule| rule.advisory.to_string())
        .collect();

    if triggered.is_empty() {
        vec![NEUTRAL_RECOMMENDATION.to_string()]
    } else {
        triggered
    }
}

/// Compute the health portion of a result
pub fn assess_health(conditions: &ResolvedConditions) -> HealthInsights {
    // Tier boundaries apply to the unrounded mean
    let mean = mean_score(conditions);
    HealthInsights {
        score: round_to(mean, 1),
        tier: HealthTier::from_score(mean),
        recommendations: recommendations(conditions),
    }
}
