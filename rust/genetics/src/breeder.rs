//! Reproduction entry point for the simulation loop.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::GeneticsError;
use crate::genome::Genome;
use crate::mutation::{adaptive, MutationParams, DEFAULT_BASE_RATE, DEFAULT_BASE_STRENGTH};
use crate::strategy_evolution::{
    CrossoverParams, ReproductionKind, DEFAULT_DIFFERENT_TYPE_NOVELTY_RATE,
    DEFAULT_NOVELTY_INJECTION_RATE,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreederConfig {
    /// Seed of the breeder's RNG stream. Required.
    pub seed: Option<u64>,
    pub base_mutation_rate: f64,
    pub base_mutation_strength: f64,
    pub novelty_injection_rate: f64,
    pub different_type_novelty_rate: f64,
}

impl Default for BreederConfig {
    fn default() -> Self {
        Self {
            seed: None,
            base_mutation_rate: DEFAULT_BASE_RATE,
            base_mutation_strength: DEFAULT_BASE_STRENGTH,
            novelty_injection_rate: DEFAULT_NOVELTY_INJECTION_RATE,
            different_type_novelty_rate: DEFAULT_DIFFERENT_TYPE_NOVELTY_RATE,
        }
    }
}

impl BreederConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), GeneticsError> {
        let probabilities = [
            ("base_mutation_rate", self.base_mutation_rate),
            ("novelty_injection_rate", self.novelty_injection_rate),
            ("different_type_novelty_rate", self.different_type_novelty_rate),
        ];
        for (name, p) in probabilities {
            if !(p.is_finite() && (0.0..=1.0).contains(&p)) {
                return Err(GeneticsError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }
        if !(self.base_mutation_strength.is_finite() && self.base_mutation_strength >= 0.0) {
            return Err(GeneticsError::InvalidConfig(format!(
                "base_mutation_strength must be >= 0, got {}",
                self.base_mutation_strength
            )));
        }
        Ok(())
    }
}

/// Owns a seeded RNG stream and turns reproduction events into genomes.
///
/// # Examples
///
/// ```
/// use evohold_genetics::breeder::{Breeder, BreederConfig};
/// use evohold_genetics::errors::GeneticsError;
/// use evohold_genetics::strategy_evolution::ReproductionKind;
///
/// assert_eq!(
///     Breeder::new(BreederConfig::default()).err(),
///     Some(GeneticsError::MissingRng)
/// );
///
/// let mut breeder = Breeder::new(BreederConfig::with_seed(7)).unwrap();
/// let a = breeder.spawn();
/// let b = breeder.spawn();
/// let child = breeder.reproduce(&a, &b, ReproductionKind::Competitive, 0.3);
/// assert!(child.is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct Breeder {
    config: BreederConfig,
    rng: ChaCha20Rng,
    births: u64,
}

impl Breeder {
    pub fn new(config: BreederConfig) -> Result<Self, GeneticsError> {
        let seed = config.seed.ok_or(GeneticsError::MissingRng)?;
        config.validate()?;
        Ok(Self {
            config,
            rng: ChaCha20Rng::seed_from_u64(seed),
            births: 0,
        })
    }

    pub fn config(&self) -> &BreederConfig {
        &self.config
    }

    /// Offspring produced so far.
    pub fn births(&self) -> u64 {
        self.births
    }

    /// Mutation parameters for the current population stress.
    pub fn mutation_params(&self, population_stress: f64) -> MutationParams {
        adaptive(
            self.config.base_mutation_rate,
            self.config.base_mutation_strength,
            population_stress,
        )
    }

    fn crossover_params(&self, kind: ReproductionKind, mutation: &MutationParams) -> CrossoverParams {
        CrossoverParams::new(kind, mutation).with_novelty(
            self.config.novelty_injection_rate,
            self.config.different_type_novelty_rate,
        )
    }

    /// A genome with no parents, for seeding a population.
    pub fn spawn(&mut self) -> Genome {
        Genome::random(&mut self.rng)
    }

    /// Two-parent reproduction. For [`ReproductionKind::Competitive`],
    /// `parent1` is the winner.
    pub fn reproduce(
        &mut self,
        parent1: &Genome,
        parent2: &Genome,
        kind: ReproductionKind,
        population_stress: f64,
    ) -> Genome {
        let mutation = self.mutation_params(population_stress);
        let crossover = self.crossover_params(kind, &mutation);
        self.births += 1;
        debug!(
            births = self.births,
            rate = mutation.rate,
            strength = mutation.strength,
            ?kind,
            "reproduce"
        );
        Genome::from_parents(parent1, parent2, &mutation, &crossover, &mut self.rng)
    }

    /// Asexual reproduction.
    pub fn clone_parent(&mut self, parent: &Genome, population_stress: f64) -> Genome {
        let mutation = self.mutation_params(population_stress);
        let crossover = self.crossover_params(ReproductionKind::Symmetric, &mutation);
        self.births += 1;
        Genome::from_parent(parent, &mutation, &crossover, &mut self.rng)
    }
}
