//! Two-parent trait inheritance with embedded meta-mutation.

use std::collections::BTreeMap;

use evohold_ai::params::gaussian;
use rand::Rng;

use crate::containers::TraitContainer;
use crate::mutation::MutationParams;
use crate::traits::{Allele, GeneticTrait, TraitMeta, TraitSpec};

/// Probability that each meta-gene mutates during one inheritance.
pub const META_MUTATION_PROBABILITY: f64 = 0.015;
pub const META_MUTATION_SIGMA: f64 = 0.1;
pub const HGT_MUTATION_SIGMA: f64 = 0.05;

/// Bounds of every `mate_preferences` entry.
pub const PREFERENCE_SPEC: TraitSpec = TraitSpec::continuous("mate_preference", 0.0, 1.0);

/// Clamps a parent weight into `[0, 1]`; NaN means an even split.
pub fn normalize_weight(weight1: f64) -> f64 {
    if weight1.is_nan() {
        0.5
    } else {
        weight1.clamp(0.0, 1.0)
    }
}

/// Effective per-trait rate and strength: the base scaled by the parents'
/// averaged multipliers.
fn effective(params: &MutationParams, meta: &TraitMeta) -> (f64, f64) {
    (
        params.rate * meta.mutation_rate,
        params.strength * meta.mutation_strength,
    )
}

fn blend_continuous<R: Rng + ?Sized>(
    spec: &TraitSpec,
    v1: f64,
    v2: f64,
    w1: f64,
    (rate, strength): (f64, f64),
    rng: &mut R,
) -> f64 {
    let mut v = v1 * w1 + v2 * (1.0 - w1);
    if !v.is_finite() {
        v = spec.midpoint();
    }
    if rng.random::<f64>() < rate {
        v += gaussian(rng, strength * spec.range());
    }
    spec.clamp(v)
}

fn pick_discrete<R: Rng + ?Sized>(
    spec: &TraitSpec,
    v1: f64,
    v2: f64,
    w1: f64,
    rate: f64,
    rng: &mut R,
) -> f64 {
    let mut v = if rng.random::<f64>() < w1 { v1 } else { v2 };
    if rng.random::<f64>() < rate {
        v += f64::from(rng.random_range(-1i32..=1));
    }
    spec.clamp(v)
}

fn mutate_meta<R: Rng + ?Sized>(meta: TraitMeta, rng: &mut R) -> TraitMeta {
    let mut out = meta;
    if rng.random::<f64>() < META_MUTATION_PROBABILITY {
        out.mutation_rate += gaussian(rng, META_MUTATION_SIGMA);
    }
    if rng.random::<f64>() < META_MUTATION_PROBABILITY {
        out.mutation_strength += gaussian(rng, META_MUTATION_SIGMA);
    }
    if rng.random::<f64>() < META_MUTATION_PROBABILITY {
        out.hgt_probability += gaussian(rng, HGT_MUTATION_SIGMA);
    }
    out.clamped()
}

/// Produces the offspring version of one trait.
///
/// Continuous values are weighted blends of the parents followed by a
/// Gaussian step with probability equal to the effective rate; discrete
/// values are inherited from one parent (parent1 with probability
/// `weight1`) and may shift by one. Offspring meta-genes start as the
/// parents' average and then get their own small mutation pass.
///
/// The result is always inside `spec`, whatever the inputs.
///
/// # Examples
///
/// ```
/// use evohold_genetics::inheritance::inherit;
/// use evohold_genetics::mutation::MutationParams;
/// use evohold_genetics::traits::{GeneticTrait, TraitSpec};
/// use rand::SeedableRng;
///
/// let spec = TraitSpec::continuous("size_modifier", 0.7, 1.3);
/// let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(1);
/// let child = inherit(
///     &spec,
///     &GeneticTrait::new(0.8),
///     &GeneticTrait::new(1.2),
///     0.5,
///     &MutationParams::none(),
///     &mut rng,
/// );
/// assert!((child.value - 1.0).abs() < 1e-12);
/// ```
pub fn inherit<T: Allele, R: Rng + ?Sized>(
    spec: &TraitSpec,
    trait1: &GeneticTrait<T>,
    trait2: &GeneticTrait<T>,
    weight1: f64,
    params: &MutationParams,
    rng: &mut R,
) -> GeneticTrait<T> {
    let w1 = normalize_weight(weight1);
    let meta = TraitMeta::average(&trait1.meta, &trait2.meta);
    let (rate, strength) = effective(params, &meta);
    let (v1, v2) = (trait1.value.to_f64(), trait2.value.to_f64());

    let value = if T::DISCRETE {
        pick_discrete(spec, v1, v2, w1, rate, rng)
    } else {
        blend_continuous(spec, v1, v2, w1, (rate, strength), rng)
    };

    GeneticTrait {
        value: T::from_f64(value, spec),
        meta: mutate_meta(meta, rng),
    }
}

/// Inherits a dictionary-valued trait key by key.
///
/// Keys held by only one parent pass through unchanged (clamped to
/// `[0, 1]`); keys held by both are blended and mutated as continuous
/// values.
pub fn inherit_preferences<R: Rng + ?Sized>(
    trait1: &GeneticTrait<BTreeMap<String, f64>>,
    trait2: &GeneticTrait<BTreeMap<String, f64>>,
    weight1: f64,
    params: &MutationParams,
    rng: &mut R,
) -> GeneticTrait<BTreeMap<String, f64>> {
    let w1 = normalize_weight(weight1);
    let meta = TraitMeta::average(&trait1.meta, &trait2.meta);
    let eff = effective(params, &meta);

    let mut value = BTreeMap::new();
    for (key, &v1) in &trait1.value {
        let v = match trait2.value.get(key) {
            Some(&v2) => blend_continuous(&PREFERENCE_SPEC, v1, v2, w1, eff, rng),
            None => PREFERENCE_SPEC.clamp(v1),
        };
        value.insert(key.clone(), v);
    }
    for (key, &v2) in &trait2.value {
        if !trait1.value.contains_key(key) {
            value.insert(key.clone(), PREFERENCE_SPEC.clamp(v2));
        }
    }

    GeneticTrait {
        value,
        meta: mutate_meta(meta, rng),
    }
}

/// Builds an offspring container from two parents, one [`inherit`] call per
/// declared trait.
pub fn inherit_all<C: TraitContainer, R: Rng + ?Sized>(
    parent1: &C,
    parent2: &C,
    weight1: f64,
    params: &MutationParams,
    rng: &mut R,
) -> C {
    C::inherit_fields(parent1, parent2, weight1, params, rng)
}
