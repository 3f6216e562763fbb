//! # evohold-arena: Benchmark and Rating Pipeline
//!
//! Captures evolved poker strategies as immutable solution records and
//! measures them reproducibly: duplicate deals against a fixed opponent
//! suite, Elo ratings against fixed anchors, and order-invariant
//! head-to-head tournaments.
//!
//! ## Core Modules
//!
//! - [`solution`] - Solution records and capture
//! - [`store`] - One-JSON-file-per-solution directory store
//! - [`elo`] - Elo ratings, anchors, skill tiers and population stats
//! - [`benchmark`] - Duplicate-deal evaluation against the opponent suite
//! - [`tournament`] - Head-to-head matches and round-robin reports
//! - [`batch`] - Parallel batch evaluation with failure isolation
//! - [`leaderboard`] - Ranked summary rows
//! - [`logging`] - Subscriber setup and log capture for tests
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use evohold_arena::solution::{capture, CaptureSource, CaptureStats};
//! use evohold_genetics::breeder::{Breeder, BreederConfig};
//!
//! let mut breeder = Breeder::new(BreederConfig::with_seed(7)).expect("seeded");
//! let genome = breeder.spawn();
//! let record = capture(&CaptureSource {
//!     entity_id: 1,
//!     genome: &genome,
//!     generation: 0,
//!     author: "lab",
//!     name: None,
//!     description: None,
//!     stats: CaptureStats::default(),
//! });
//! assert!(record.id().starts_with("lab_"));
//! assert!(record.verify_hash());
//! ```

pub mod batch;
pub mod benchmark;
pub mod elo;
pub mod errors;
pub mod leaderboard;
pub mod logging;
pub mod solution;
pub mod store;
pub mod tournament;

pub use batch::{evaluate_batch, BatchOptions, BatchReport};
pub use benchmark::{evaluate, BenchmarkConfig, BenchmarkResult};
pub use elo::EloRating;
pub use errors::ArenaError;
pub use leaderboard::{leaderboard, LeaderboardRow};
pub use solution::{capture, SolutionRecord};
pub use store::SolutionStore;
pub use tournament::{compare, compare_all, HeadToHead, TournamentReport};
