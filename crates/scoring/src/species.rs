//! Species activity heuristic
//!
//! Not a classifier: temperature/humidity bands map to canned result sets.

use ecolingua_domain::{ActivityLevel, DetectedSpecies, ResolvedConditions, SpeciesEstimate};

use crate::jitter::JitterSource;

const TEMPERATE_SPECIES: [(&str, f64, ActivityLevel); 4] = [
    ("Common Robin", 0.89, ActivityLevel::High),
    ("Blue Jay", 0.76, ActivityLevel::Moderate),
    ("Red Squirrel", 0.82, ActivityLevel::High),
    ("Monarch Butterfly", 0.71, ActivityLevel::Moderate),
];
const HEAT_ADAPTED: (&str, f64, ActivityLevel) = ("Heat-adapted species", 0.65, ActivityLevel::Low);
const COLD_ADAPTED: (&str, f64, ActivityLevel) = ("Cold-adapted species", 0.58, ActivityLevel::Low);

/// Biodiversity contribution of each detected species
const INDEX_PER_SPECIES: f64 = 0.2;
/// Bounds of the biodiversity jitter
const INDEX_JITTER: (f64, f64) = (0.1, 0.3);

fn to_species(entries: &[(&str, f64, ActivityLevel)]) -> Vec<DetectedSpecies> {
    entries
        .iter()
        .map(|&(name, confidence, activity_level)| DetectedSpecies {
            name: name.to_string(),
            confidence,
            activity_level,
        })
        .collect()
}

/// Species expected for the given conditions
pub fn detect_species(conditions: &ResolvedConditions) -> Vec<DetectedSpecies> {
    let t = conditions.temperature;
    let h = conditions.humidity;

    if (15.0..=30.0).contains(&t) && (40.0..=80.0).contains(&h) {
        to_species(&TEMPERATE_SPECIES)
    } else if t > 30.0 {
        to_species(&[HEAT_ADAPTED])
    } else if t < 10.0 {
        to_species(&[COLD_ADAPTED])
    } else {
        Vec::new()
    }
}

/// Ecosystem activity tier from the number of species
pub fn ecosystem_activity(species_count: usize) -> ActivityLevel {
    if species_count > 2 {
        ActivityLevel::High
    } else if species_count > 0 {
        ActivityLevel::Moderate
    } else {
        ActivityLevel::Low
    }
}

/// Build the species estimate, drawing the biodiversity jitter from `jitter`
pub fn estimate_species(conditions: &ResolvedConditions, jitter: &dyn JitterSource) -> SpeciesEstimate {
    let detected_species = detect_species(conditions);
    let species_count = detected_species.len();

    let noise = jitter.uniform(INDEX_JITTER.0, INDEX_JITTER.1);
    let biodiversity_index = (species_count as f64 * INDEX_PER_SPECIES + noise).min(1.0);

    SpeciesEstimate {
        detected_species,
        species_count,
        biodiversity_index,
        ecosystem_activity: ecosystem_activity(species_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jitter::FixedJitter;

    fn at(temperature: f64, humidity: f64) -> ResolvedConditions {
        ResolvedConditions {
            temperature,
            humidity,
            ..ResolvedConditions::default()
        }
    }

    #[test]
    fn test_temperate_band() {
        let estimate = estimate_species(&at(22.0, 60.0), &FixedJitter::LOWER);
        assert_eq!(estimate.species_count, 4);
        assert_eq!(estimate.detected_species[0].name, "Common Robin");
        assert_eq!(estimate.ecosystem_activity, ActivityLevel::High);
        assert!((estimate.biodiversity_index - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_index_capped_at_one() {
        let estimate = estimate_species(&at(22.0, 60.0), &FixedJitter::UPPER);
        assert_eq!(estimate.biodiversity_index, 1.0);
    }

    #[test]
    fn test_band_edges_inclusive() {
        assert_eq!(detect_species(&at(15.0, 40.0)).len(), 4);
        assert_eq!(detect_species(&at(30.0, 80.0)).len(), 4);
    }

    #[test]
    fn test_heat_adapted() {
        let estimate = estimate_species(&at(33.0, 60.0), &FixedJitter::MIDPOINT);
        assert_eq!(estimate.species_count, 1);
        assert_eq!(estimate.detected_species[0].name, "Heat-adapted species");
        assert_eq!(estimate.ecosystem_activity, ActivityLevel::Moderate);
    }

    #[test]
    fn test_hot_but_dry_is_still_heat_adapted() {
        assert_eq!(detect_species(&at(31.0, 10.0))[0].name, "Heat-adapted species");
    }

    #[test]
    fn test_cold_adapted() {
        let species = detect_species(&at(2.0, 60.0));
        assert_eq!(species.len(), 1);
        assert_eq!(species[0].confidence, 0.58);
    }

    #[test]
    fn test_gap_band_is_empty() {
        // 12 C with dry air falls between the cold and temperate bands
        let estimate = estimate_species(&at(12.0, 20.0), &FixedJitter::LOWER);
        assert!(estimate.detected_species.is_empty());
        assert_eq!(estimate.ecosystem_activity, ActivityLevel::Low);
        assert!((estimate.biodiversity_index - 0.1).abs() < 1e-9);
    }
}
