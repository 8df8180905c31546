//! Carbon sequestration estimate

use ecolingua_domain::{CarbonAnalysis, ResolvedConditions};

use crate::jitter::JitterSource;
use crate::round_to;

/// Baseline sequestration rate
pub const BASE_SEQUESTRATION: f64 = 5.0;

const RATE_JITTER: (f64, f64) = (-1.0, 1.0);
const CREDITS_JITTER: (f64, f64) = (-5.0, 15.0);

/// Photosynthesis factor from temperature
pub fn temperature_factor(temperature: f64) -> f64 {
    if (20.0..=30.0).contains(&temperature) {
        1.2
    } else if (15.0..=35.0).contains(&temperature) {
        1.0
    } else {
        0.7
    }
}

/// Plant growth factor from humidity
pub fn humidity_factor(humidity: f64) -> f64 {
    if (50.0..=70.0).contains(&humidity) {
        1.1
    } else {
        0.9
    }
}

/// Estimate sequestration, credits, net balance and efficiency
pub fn analyze_carbon(conditions: &ResolvedConditions, jitter: &dyn JitterSource) -> CarbonAnalysis {
    let modelled = BASE_SEQUESTRATION
        * temperature_factor(conditions.temperature)
        * humidity_factor(conditions.humidity);
    let rate = (modelled + jitter.uniform(RATE_JITTER.0, RATE_JITTER.1)).max(0.0);

    let credits = (rate * 10.0 + jitter.uniform(CREDITS_JITTER.0, CREDITS_JITTER.1))
        .round()
        .max(0.0);

    let net_balance = rate - (conditions.co2 - 400.0) * 0.01;
    let efficiency = (rate / BASE_SEQUESTRATION * 100.0).clamp(0.0, 100.0);

    CarbonAnalysis {
        sequestration_rate: round_to(rate, 2),
        credits_potential: credits as u32,
        net_balance: round_to(net_balance, 2),
        efficiency_percent: round_to(efficiency, 1),
    }
}
