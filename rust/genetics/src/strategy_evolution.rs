//! Crossover of parameterized strategies.

use evohold_ai::params::{ParameterizedPolicy, StrategyKind};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::inheritance::normalize_weight;
use crate::mutation::MutationParams;

pub const DEFAULT_NOVELTY_INJECTION_RATE: f64 = 0.01;
pub const DEFAULT_DIFFERENT_TYPE_NOVELTY_RATE: f64 = 0.02;
pub const COMPETITIVE_WINNER_WEIGHT: f64 = 0.8;
pub const SYMMETRIC_WINNER_WEIGHT: f64 = 0.5;

/// How the two parents came together. In a competitive event parent1 is the
/// winner and dominates the offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReproductionKind {
    Competitive,
    Symmetric,
}

impl ReproductionKind {
    pub fn winner_weight(self) -> f64 {
        match self {
            ReproductionKind::Competitive => COMPETITIVE_WINNER_WEIGHT,
            ReproductionKind::Symmetric => SYMMETRIC_WINNER_WEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossoverParams {
    pub winner_weight: f64,
    pub mutation_rate: f64,
    pub mutation_strength: f64,
    pub novelty_injection_rate: f64,
    pub different_type_novelty_rate: f64,
}

impl CrossoverParams {
    /// Default novelty rates with the winner weight of `kind`.
    pub fn new(kind: ReproductionKind, mutation: &MutationParams) -> Self {
        Self {
            winner_weight: kind.winner_weight(),
            mutation_rate: mutation.rate,
            mutation_strength: mutation.strength,
            novelty_injection_rate: DEFAULT_NOVELTY_INJECTION_RATE,
            different_type_novelty_rate: DEFAULT_DIFFERENT_TYPE_NOVELTY_RATE,
        }
    }

    pub fn with_novelty(mut self, injection: f64, different_type: f64) -> Self {
        self.novelty_injection_rate = injection;
        self.different_type_novelty_rate = different_type;
        self
    }

    /// Pure blend: no mutation, no novelty.
    pub fn deterministic(winner_weight: f64) -> Self {
        Self {
            winner_weight,
            mutation_rate: 0.0,
            mutation_strength: 0.0,
            novelty_injection_rate: 0.0,
            different_type_novelty_rate: 0.0,
        }
    }
}

fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    p.is_finite() && p > 0.0 && rng.random::<f64>() < p
}

/// Produces an offspring strategy from two parents.
///
/// - with probability `novelty_injection_rate` the child is a fresh random
///   strategy of a random kind
/// - parents of the same kind blend every parameter with `winner_weight`
/// - parents of different kinds yield, with probability
///   `different_type_novelty_rate`, a random kind; otherwise parent1's kind
///   with probability `winner_weight` (else parent2's), copying that
///   parent's parameters
///
/// Every non-novel child then goes through per-parameter mutation.
pub fn crossover<P: ParameterizedPolicy, R: Rng + ?Sized>(
    parent1: &P,
    parent2: &P,
    params: &CrossoverParams,
    rng: &mut R,
) -> P {
    if chance(rng, params.novelty_injection_rate) {
        let child = P::random(rng);
        debug!(kind = child.kind().id(), "strategy novelty injection");
        return child;
    }

    let w1 = normalize_weight(params.winner_weight);
    let mut child = if parent1.kind() == parent2.kind() {
        let kind = parent1.kind();
        let blended = kind
            .param_specs()
            .iter()
            .map(|spec| {
                let a = parent1.parameter(spec.name);
                let b = parent2.parameter(spec.name);
                (spec.name.to_string(), a * w1 + b * (1.0 - w1))
            })
            .collect();
        P::from_parts(kind, blended)
    } else if chance(rng, params.different_type_novelty_rate) {
        let child = P::random(rng);
        debug!(kind = child.kind().id(), "cross-kind novelty");
        return child;
    } else if rng.random::<f64>() < w1 {
        parent1.clone()
    } else {
        parent2.clone()
    };

    child.mutate(params.mutation_rate, params.mutation_strength, rng);
    child
}
