//! Bounded random jitter
//!
//! Several derived values carry a small uniform perturbation. Drawing it
//! through [`JitterSource`] lets tests pin the draw.

use rand::Rng;
use std::fmt;

/// Source of uniform draws in a closed interval.
///
/// Implementations must return a value in `[low, high]`.
pub trait JitterSource: Send + Sync + fmt::Debug {
    /// Draw a value uniformly from `[low, high]`
    fn uniform(&self, low: f64, high: f64) -> f64;
}

/// Production jitter backed by the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        rand::thread_rng().gen_range(low..=high)
    }
}

/// Deterministic jitter at a fixed position inside every interval.
///
/// `fraction = 0.0` always yields the lower bound, `1.0` the upper bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedJitter {
    fraction: f64,
}

impl FixedJitter {
    /// Always the lower bound
    pub const LOWER: FixedJitter = FixedJitter { fraction: 0.0 };
    /// Always the midpoint
    pub const MIDPOINT: FixedJitter = FixedJitter { fraction: 0.5 };
    /// Always the upper bound
    pub const UPPER: FixedJitter = FixedJitter { fraction: 1.0 };

    /// Create a fixed jitter; `fraction` is clamped to `[0, 1]`
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0),
        }
    }
}

impl JitterSource for FixedJitter {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.fraction
    }
}
