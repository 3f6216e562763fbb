//! The complete heritable state of one entity.

use std::collections::BTreeMap;

use evohold_ai::{BehaviorStrategy, ParameterizedPolicy, PokerStrategy};
use rand::Rng;

use crate::containers::{BehavioralTraits, PhysicalTraits, TraitContainer};
use crate::inheritance::{inherit_all, inherit_preferences, PREFERENCE_SPEC};
use crate::mutation::MutationParams;
use crate::strategy_evolution::{crossover, CrossoverParams};
use crate::traits::GeneticTrait;

/// Keys a freshly generated genome carries in `mate_preferences`.
pub const MATE_PREFERENCE_KEYS: [&str; 5] = [
    "prefer_similar_size",
    "prefer_similar_color",
    "prefer_pattern",
    "prefer_high_energy",
    "prefer_poker_winner",
];

/// Fraction of a learned behavior that survives into the next generation.
pub const LEARNED_RETENTION: f64 = 0.5;
/// Learned behaviors weaker than this are forgotten.
pub const LEARNED_EPSILON: f64 = 1e-3;

pub type Preferences = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Genome {
    pub physical: PhysicalTraits,
    pub behavioral: BehavioralTraits,
    pub mate_preferences: GeneticTrait<Preferences>,
    pub behavior_strategy: BehaviorStrategy,
    pub poker_strategy: PokerStrategy,
    /// Culturally inherited scalars in `[-1, 1]`; not subject to mutation.
    pub learned_behaviors: BTreeMap<String, f64>,
}

impl Genome {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let physical = PhysicalTraits::random(rng);
        let behavioral = BehavioralTraits::random(rng);
        let prefs = random_preferences(rng);
        Self {
            physical,
            behavioral,
            mate_preferences: GeneticTrait::new(prefs),
            behavior_strategy: BehaviorStrategy::random(rng),
            poker_strategy: PokerStrategy::random(rng),
            learned_behaviors: BTreeMap::new(),
        }
    }

    /// Sexual reproduction. Traits and strategies are weighted toward
    /// `parent1` by `crossover.winner_weight`.
    pub fn from_parents<R: Rng + ?Sized>(
        parent1: &Genome,
        parent2: &Genome,
        mutation: &MutationParams,
        crossover_params: &CrossoverParams,
        rng: &mut R,
    ) -> Self {
        let w1 = crossover_params.winner_weight;
        Self {
            physical: inherit_all(&parent1.physical, &parent2.physical, w1, mutation, rng),
            behavioral: inherit_all(&parent1.behavioral, &parent2.behavioral, w1, mutation, rng),
            mate_preferences: inherit_preferences(
                &parent1.mate_preferences,
                &parent2.mate_preferences,
                w1,
                mutation,
                rng,
            ),
            behavior_strategy: crossover(
                &parent1.behavior_strategy,
                &parent2.behavior_strategy,
                crossover_params,
                rng,
            ),
            poker_strategy: crossover(
                &parent1.poker_strategy,
                &parent2.poker_strategy,
                crossover_params,
                rng,
            ),
            learned_behaviors: inherit_learned(&[
                &parent1.learned_behaviors,
                &parent2.learned_behaviors,
            ]),
        }
    }

    /// Asexual reproduction: the parent stands in for both sides.
    pub fn from_parent<R: Rng + ?Sized>(
        parent: &Genome,
        mutation: &MutationParams,
        crossover_params: &CrossoverParams,
        rng: &mut R,
    ) -> Self {
        let mut offspring = Self::from_parents(parent, parent, mutation, crossover_params, rng);
        offspring.learned_behaviors = inherit_learned(&[&parent.learned_behaviors]);
        offspring
    }

    /// Records (or reinforces) a learned behavior, clamped to `[-1, 1]`.
    pub fn learn(&mut self, key: &str, value: f64) {
        if value.is_finite() {
            self.learned_behaviors
                .insert(key.to_string(), value.clamp(-1.0, 1.0));
        }
    }

    /// Every invariant violation; empty for a valid genome.
    pub fn violations(&self) -> Vec<String> {
        let mut out = self.physical.violations();
        out.extend(self.behavioral.violations());
        if !self.mate_preferences.meta.is_valid() {
            out.push("mate_preferences has out-of-range meta".to_string());
        }
        for (key, v) in &self.mate_preferences.value {
            if !PREFERENCE_SPEC.contains(*v) {
                out.push(format!("mate_preferences.{key} = {v} outside [0, 1]"));
            }
        }
        for (key, v) in &self.learned_behaviors {
            if !(v.is_finite() && (-1.0..=1.0).contains(v)) {
                out.push(format!("learned_behaviors.{key} = {v} outside [-1, 1]"));
            }
        }
        out
    }

    pub fn is_valid(&self) -> bool {
        self.violations().is_empty()
    }
}

pub fn random_preferences<R: Rng + ?Sized>(rng: &mut R) -> Preferences {
    MATE_PREFERENCE_KEYS
        .iter()
        .map(|k| (k.to_string(), rng.random_range(0.0..=1.0)))
        .collect()
}

/// Cultural inheritance: the mean over the parents that carry each key,
/// scaled by [`LEARNED_RETENTION`]. Faded entries are dropped.
pub fn inherit_learned(parents: &[&BTreeMap<String, f64>]) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<&str, (f64, u32)> = BTreeMap::new();
    for parent in parents {
        for (key, v) in parent.iter() {
            if v.is_finite() {
                let entry = sums.entry(key.as_str()).or_insert((0.0, 0));
                entry.0 += v;
                entry.1 += 1;
            }
        }
    }
    sums.into_iter()
        .filter_map(|(key, (sum, n))| {
            let v = (sum / f64::from(n) * LEARNED_RETENTION).clamp(-1.0, 1.0);
            (v.abs() >= LEARNED_EPSILON).then(|| (key.to_string(), v))
        })
        .collect()
}
