//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "evohold",
    version,
    about = "Evolve, capture and benchmark heads-up poker strategies"
)]
pub struct EvoholdCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the resolved configuration and where each value came from
    Cfg,
    /// Capture freshly generated random genomes into the store
    Spawn {
        #[arg(long, default_value_t = 1)]
        count: u32,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        store: Option<PathBuf>,
        #[arg(long, default_value = "evohold")]
        author: String,
    },
    /// Breed an offspring from stored parents (asexual without --parent-b)
    Breed {
        #[arg(long)]
        store: Option<PathBuf>,
        /// Winner of a competitive reproduction
        #[arg(long)]
        parent_a: String,
        #[arg(long)]
        parent_b: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
        /// Use an even 50/50 split instead of favoring parent A
        #[arg(long)]
        symmetric: bool,
        /// Population stress in [0, 1]; raises mutation rate and strength
        #[arg(long, default_value_t = 0.0)]
        stress: f64,
        #[arg(long)]
        author: Option<String>,
    },
    /// Benchmark stored solutions against the reference opponents
    Evaluate {
        #[arg(long)]
        store: Option<PathBuf>,
        /// Evaluate a single solution
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        hands: Option<u32>,
        #[arg(long)]
        sets: Option<u32>,
        #[arg(long)]
        workers: Option<usize>,
        #[arg(long)]
        sequential: bool,
    },
    /// Round-robin head-to-head comparison of every stored solution
    Compare {
        #[arg(long)]
        store: Option<PathBuf>,
        #[arg(long)]
        hands: Option<u32>,
    },
    /// Ranked summary of stored solutions
    Leaderboard {
        #[arg(long)]
        store: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Sanitize an untrusted genome payload and capture it
    Import {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        store: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        author: Option<String>,
    },
    /// Strictly validate a genome payload without repairing it
    Validate {
        #[arg(long)]
        input: PathBuf,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Cfg => "cfg",
            Commands::Spawn { .. } => "spawn",
            Commands::Breed { .. } => "breed",
            Commands::Evaluate { .. } => "evaluate",
            Commands::Compare { .. } => "compare",
            Commands::Leaderboard { .. } => "leaderboard",
            Commands::Import { .. } => "import",
            Commands::Validate { .. } => "validate",
        }
    }
}
