//! # evohold-genetics: Inheritance and Mutation Engine
//!
//! Turns parent genomes into offspring genomes. Every trait carries its own
//! mutation meta-genes, every value stays within its declared bounds, and
//! every random decision draws from an explicitly supplied RNG.
//!
//! ## Core Modules
//!
//! - [`traits`] - `GeneticTrait<T>`, `TraitSpec` and trait meta-genes
//! - [`containers`] - Trait container declarations (`trait_container!`)
//! - [`inheritance`] - Per-trait blending, discrete selection and meta-mutation
//! - [`mutation`] - Stress-adaptive mutation parameters
//! - [`strategy_evolution`] - Crossover of parameterized strategies
//! - [`genome`] - The complete heritable state of an entity
//! - [`serialize`] - Flat JSON form of a genome
//! - [`sanitize`] - Repair and strict validation of external payloads
//! - [`breeder`] - Seeded reproduction entry point
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use evohold_genetics::breeder::{Breeder, BreederConfig};
//! use evohold_genetics::strategy_evolution::ReproductionKind;
//!
//! let mut breeder = Breeder::new(BreederConfig::with_seed(42)).expect("seeded");
//! let winner = breeder.spawn();
//! let loser = breeder.spawn();
//! let child = breeder.reproduce(&winner, &loser, ReproductionKind::Competitive, 0.0);
//! assert!(child.is_valid());
//! ```

pub mod breeder;
pub mod containers;
pub mod errors;
pub mod genome;
pub mod inheritance;
pub mod mutation;
pub mod sanitize;
pub mod serialize;
pub mod strategy_evolution;
pub mod traits;

#[doc(hidden)]
pub use rand as __rand;

pub use breeder::{Breeder, BreederConfig};
pub use errors::GeneticsError;
pub use genome::Genome;
