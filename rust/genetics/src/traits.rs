//! Typed genetic traits and their bounds.

use std::fmt::Debug;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Bounds on the `mutation_rate` and `mutation_strength` multipliers.
pub const META_MULTIPLIER_MIN: f64 = 0.1;
pub const META_MULTIPLIER_MAX: f64 = 5.0;

/// Static description of one trait: name, bounds and value kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitSpec {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub discrete: bool,
}

impl TraitSpec {
    pub const fn continuous(name: &'static str, min: f64, max: f64) -> Self {
        Self {
            name,
            min,
            max,
            discrete: false,
        }
    }

    pub const fn discrete(name: &'static str, min: f64, max: f64) -> Self {
        Self {
            name,
            min,
            max,
            discrete: true,
        }
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    pub fn midpoint(&self) -> f64 {
        let mid = (self.min + self.max) / 2.0;
        if self.discrete {
            mid.round()
        } else {
            mid
        }
    }

    /// Clamps into bounds, rounding discrete values. Non-finite input maps to
    /// the midpoint.
    pub fn clamp(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.midpoint();
        }
        let v = if self.discrete { value.round() } else { value };
        v.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite()
            && value >= self.min
            && value <= self.max
            && (!self.discrete || value.fract() == 0.0)
    }
}

/// Value kind carried by a [`GeneticTrait`]: `f64` is continuous, `i64`
/// discrete.
pub trait Allele: Copy + PartialEq + Debug + Send + Sync + 'static {
    const DISCRETE: bool;

    fn to_f64(self) -> f64;

    /// Converts and clamps into `spec`.
    fn from_f64(value: f64, spec: &TraitSpec) -> Self;

    fn random<R: Rng + ?Sized>(spec: &TraitSpec, rng: &mut R) -> Self;
}

impl Allele for f64 {
    const DISCRETE: bool = false;

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64, spec: &TraitSpec) -> Self {
        spec.clamp(value)
    }

    fn random<R: Rng + ?Sized>(spec: &TraitSpec, rng: &mut R) -> Self {
        rng.random_range(spec.min..=spec.max)
    }
}

impl Allele for i64 {
    const DISCRETE: bool = true;

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64, spec: &TraitSpec) -> Self {
        spec.clamp(value) as i64
    }

    fn random<R: Rng + ?Sized>(spec: &TraitSpec, rng: &mut R) -> Self {
        rng.random_range(spec.min as i64..=spec.max as i64)
    }
}

/// Per-trait meta-genes controlling how the trait itself mutates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitMeta {
    pub mutation_rate: f64,
    pub mutation_strength: f64,
    pub hgt_probability: f64,
}

impl Default for TraitMeta {
    fn default() -> Self {
        Self {
            mutation_rate: 1.0,
            mutation_strength: 1.0,
            hgt_probability: 0.1,
        }
    }
}

fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

impl TraitMeta {
    /// Clamps every field into its bounds; non-finite fields take the default.
    pub fn clamped(self) -> Self {
        let d = Self::default();
        Self {
            mutation_rate: clamp_or(
                self.mutation_rate,
                META_MULTIPLIER_MIN,
                META_MULTIPLIER_MAX,
                d.mutation_rate,
            ),
            mutation_strength: clamp_or(
                self.mutation_strength,
                META_MULTIPLIER_MIN,
                META_MULTIPLIER_MAX,
                d.mutation_strength,
            ),
            hgt_probability: clamp_or(self.hgt_probability, 0.0, 1.0, d.hgt_probability),
        }
    }

    pub fn average(a: &Self, b: &Self) -> Self {
        Self {
            mutation_rate: (a.mutation_rate + b.mutation_rate) / 2.0,
            mutation_strength: (a.mutation_strength + b.mutation_strength) / 2.0,
            hgt_probability: (a.hgt_probability + b.hgt_probability) / 2.0,
        }
        .clamped()
    }

    pub fn is_valid(&self) -> bool {
        (META_MULTIPLIER_MIN..=META_MULTIPLIER_MAX).contains(&self.mutation_rate)
            && (META_MULTIPLIER_MIN..=META_MULTIPLIER_MAX).contains(&self.mutation_strength)
            && (0.0..=1.0).contains(&self.hgt_probability)
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// A heritable value plus the meta-genes that govern its mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticTrait<T> {
    pub value: T,
    #[serde(flatten)]
    pub meta: TraitMeta,
}

impl<T> GeneticTrait<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            meta: TraitMeta::default(),
        }
    }

    pub fn with_meta(value: T, meta: TraitMeta) -> Self {
        Self {
            value,
            meta: meta.clamped(),
        }
    }

    pub fn mutation_rate(&self) -> f64 {
        self.meta.mutation_rate
    }

    pub fn mutation_strength(&self) -> f64 {
        self.meta.mutation_strength
    }

    pub fn hgt_probability(&self) -> f64 {
        self.meta.hgt_probability
    }
}

impl<T: Allele> GeneticTrait<T> {
    pub fn random<R: Rng + ?Sized>(spec: &TraitSpec, rng: &mut R) -> Self {
        Self::new(T::random(spec, rng))
    }

    /// A trait whose value is `value` forced into `spec`.
    pub fn bounded(value: f64, spec: &TraitSpec) -> Self {
        Self::new(T::from_f64(value, spec))
    }

    pub fn is_valid(&self, spec: &TraitSpec) -> bool {
        spec.contains(self.value.to_f64()) && self.meta.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discrete_clamp_rounds() {
        let spec = TraitSpec::discrete("n", 1.0, 10.0);
        assert_eq!(spec.clamp(3.4), 3.0);
        assert_eq!(spec.clamp(99.0), 10.0);
        assert_eq!(spec.clamp(f64::NAN), 6.0);
        assert!(!spec.contains(2.5));
    }

    #[test]
    fn meta_clamps_non_finite_to_default() {
        let meta = TraitMeta {
            mutation_rate: f64::NAN,
            mutation_strength: 50.0,
            hgt_probability: -1.0,
        }
        .clamped();
        assert_eq!(meta.mutation_rate, 1.0);
        assert_eq!(meta.mutation_strength, META_MULTIPLIER_MAX);
        assert_eq!(meta.hgt_probability, 0.0);
        assert!(meta.is_valid());
    }

    #[test]
    fn allele_kinds_agree_with_spec_constructors() {
        const _: () = assert!(!<f64 as Allele>::DISCRETE);
        const _: () = assert!(<i64 as Allele>::DISCRETE);
        let spec = TraitSpec::discrete("k", 0.0, 5.0);
        assert_eq!(<i64 as Allele>::from_f64(7.7, &spec), 5);
    }
}
