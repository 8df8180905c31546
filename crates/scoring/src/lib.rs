//! EcoLingua Scoring Engine
//!
//! Maps a validated [`Reading`](ecolingua_domain::Reading) to a
//! [`ScoringResult`](ecolingua_domain::ScoringResult):
//! - **Health**: mean of four sub-scores, a narrative tier and advisories
//! - **Species**: a banding of temperature/humidity into canned species sets
//! - **Threats**: per-axis hazards with a ratchet-up overall level
//! - **Carbon**: sequestration estimate with bounded jitter
//!
//! Scoring never fails. Absent inputs fall back to documented defaults.
//!
//! # Examples
//!
//! ```
//! use ecolingua_domain::ReadingValidator;
//! use ecolingua_scoring::EnvironmentalScorer;
//!
//! let reading = ReadingValidator::new()
//!     .validate(&serde_json::json!({"temperature": 22.0, "humidity": 60.0}))
//!     .unwrap();
//!
//! let result = EnvironmentalScorer::new().score(&reading);
//! assert!((0.0..=100.0).contains(&result.health_score));
//! ```

#![warn(missing_docs)]

pub mod carbon;
pub mod engine;
pub mod health;
pub mod jitter;
pub mod species;
pub mod threat;

pub use engine::EnvironmentalScorer;
pub use jitter::{FixedJitter, JitterSource, ThreadRngJitter};

/// Round to a fixed number of decimal places for reporting.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
