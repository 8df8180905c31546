//! Domain types for the EcoLingua telemetry pipeline
//!
//! This crate contains pure domain logic with no I/O dependencies:
//! - Environmental readings and their declared field ranges
//! - Scoring result structures (health, species, threats, carbon)
//! - Reading validation for raw, untyped payloads

pub mod assessment;
pub mod error;
pub mod reading;
pub mod validation;

pub use assessment::{
    ActivityLevel, CarbonAnalysis, DetectedSpecies, HealthTier, ScoringResult, SpeciesEstimate,
    Threat, ThreatAssessment, ThreatKind, ThreatLevel,
};
pub use error::{ValidationError, ValidationReport};
pub use reading::{AllowedRange, Reading, ResolvedConditions};
pub use validation::ReadingValidator;
