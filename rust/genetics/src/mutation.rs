//! Population-stress driven mutation parameters.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_RATE: f64 = 0.1;
pub const DEFAULT_BASE_STRENGTH: f64 = 0.1;

const RATE_STRESS_GAIN: f64 = 1.5;
const STRENGTH_STRESS_GAIN: f64 = 0.5;
const RATE_BOUNDS: (f64, f64) = (0.04, 0.25);
const STRENGTH_BOUNDS: (f64, f64) = (0.03, 0.15);

/// Base mutation probability and step size for one reproduction event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationParams {
    pub rate: f64,
    pub strength: f64,
}

impl Default for MutationParams {
    fn default() -> Self {
        Self {
            rate: DEFAULT_BASE_RATE,
            strength: DEFAULT_BASE_STRENGTH,
        }
    }
}

impl MutationParams {
    /// No mutation at all: offspring values are pure blends.
    pub const fn none() -> Self {
        Self {
            rate: 0.0,
            strength: 0.0,
        }
    }
}

/// Scales the base parameters up under population stress.
///
/// `rate *= 1 + 1.5·stress`, `strength *= 1 + 0.5·stress`, then rate is
/// clamped to `[0.04, 0.25]` and strength to `[0.03, 0.15]`. Stress is
/// clamped to `[0, 1]`; NaN counts as no stress.
///
/// # Examples
///
/// ```
/// use evohold_genetics::mutation::adaptive;
///
/// let calm = adaptive(0.1, 0.1, 0.0);
/// assert_eq!((calm.rate, calm.strength), (0.1, 0.1));
///
/// let crisis = adaptive(0.1, 0.1, 1.0);
/// assert_eq!(crisis.rate, 0.25);
/// assert!((crisis.strength - 0.15).abs() < 1e-12);
/// ```
pub fn adaptive(base_rate: f64, base_strength: f64, population_stress: f64) -> MutationParams {
    let stress = if population_stress.is_nan() {
        0.0
    } else {
        population_stress.clamp(0.0, 1.0)
    };
    let base_rate = if base_rate.is_finite() { base_rate } else { DEFAULT_BASE_RATE };
    let base_strength = if base_strength.is_finite() {
        base_strength
    } else {
        DEFAULT_BASE_STRENGTH
    };
    MutationParams {
        rate: (base_rate * (1.0 + stress * RATE_STRESS_GAIN)).clamp(RATE_BOUNDS.0, RATE_BOUNDS.1),
        strength: (base_strength * (1.0 + stress * STRENGTH_STRESS_GAIN))
            .clamp(STRENGTH_BOUNDS.0, STRENGTH_BOUNDS.1),
    }
}
