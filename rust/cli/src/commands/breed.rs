//! Breeds an offspring from stored parents.

use std::io::Write;
use std::path::PathBuf;

use evohold_arena::solution::{capture, CaptureSource, CaptureStats, SolutionRecord};
use evohold_engine::seed::derive_seed;
use evohold_genetics::breeder::Breeder;
use evohold_genetics::genome::Genome;
use evohold_genetics::strategy_evolution::ReproductionKind;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::info;

use crate::commands::breeder_config;
use crate::config;
use crate::error::CliError;
use crate::io_utils::open_store;
use crate::ui;

pub struct BreedArgs {
    pub store: Option<PathBuf>,
    pub parent_a: String,
    pub parent_b: Option<String>,
    pub seed: Option<u64>,
    pub symmetric: bool,
    pub stress: f64,
    pub author: Option<String>,
}

fn parent_genome(record: &SolutionRecord) -> Result<Genome, CliError> {
    // stored genomes are complete; the rng only fills fields a hand edit removed
    let mut rng = ChaCha20Rng::seed_from_u64(derive_seed(["parent", record.id()]));
    record
        .genome(&mut rng)
        .ok_or_else(|| CliError::InvalidInput(format!("{} carries no genome", record.id())))
}

/// Handle the breed command.
///
/// With `parent_b` the offspring comes from two-parent reproduction
/// (competitive unless `symmetric`); without it, from asexual reproduction.
///
/// # Errors
///
/// Returns `CliError::Genetics(MissingRng)` when no seed is available, before
/// the store is touched.
pub fn handle_breed_command(
    args: BreedArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = config::load()?;
    let mut breeder = Breeder::new(breeder_config(args.seed.or(cfg.seed), &cfg))?;
    if !(0.0..=1.0).contains(&args.stress) {
        return Err(CliError::InvalidInput(format!(
            "stress must be within [0, 1], got {}",
            args.stress
        )));
    }
    let store = open_store(args.store, &cfg)?;

    let record_a = store.load(&args.parent_a)?;
    let genome_a = parent_genome(&record_a)?;
    let (child, generation) = match &args.parent_b {
        Some(id) => {
            let record_b = store.load(id)?;
            let genome_b = parent_genome(&record_b)?;
            let kind = if args.symmetric {
                ReproductionKind::Symmetric
            } else {
                ReproductionKind::Competitive
            };
            let child = breeder.reproduce(&genome_a, &genome_b, kind, args.stress);
            let generation = record_a.metadata.generation.max(record_b.metadata.generation) + 1;
            (child, generation)
        }
        None => (
            breeder.clone_parent(&genome_a, args.stress),
            record_a.metadata.generation + 1,
        ),
    };

    let author = args
        .author
        .unwrap_or_else(|| record_a.metadata.author.clone());
    let record = capture(&CaptureSource {
        entity_id: breeder.births(),
        genome: &child,
        generation,
        author: &author,
        name: None,
        description: None,
        stats: CaptureStats::default(),
    });
    if store.contains(&record.content_hash)? {
        ui::display_warning(
            err,
            &format!("offspring matches stored solution {}, not saved", record.id()),
        )?;
        writeln!(out, "{}", record.id())?;
        return Ok(());
    }
    store.save(&record)?;
    info!(
        child = record.id(),
        parent_a = record_a.id(),
        parent_b = ?args.parent_b,
        generation,
        "offspring captured"
    );
    writeln!(out, "{}", record.id())?;
    Ok(())
}
