//! Captures random genomes as new solutions.

use std::io::Write;
use std::path::PathBuf;

use evohold_arena::solution::{capture, CaptureSource, CaptureStats};
use evohold_genetics::breeder::Breeder;
use tracing::info;

use crate::commands::breeder_config;
use crate::config;
use crate::error::CliError;
use crate::io_utils::open_store;
use crate::ui;

/// Handle the spawn command.
///
/// Prints the id of every saved solution. Genomes whose strategies are
/// already stored are skipped with a warning.
///
/// # Errors
///
/// Returns `CliError::Genetics(MissingRng)` when neither `--seed` nor the
/// configuration supplies a seed.
pub fn handle_spawn_command(
    count: u32,
    seed: Option<u64>,
    store: Option<PathBuf>,
    author: &str,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = config::load()?;
    let mut breeder = Breeder::new(breeder_config(seed.or(cfg.seed), &cfg))?;
    if count == 0 {
        return Err(CliError::InvalidInput("count must be at least 1".into()));
    }
    let store = open_store(store, &cfg)?;

    let mut saved = 0u32;
    for entity_id in 0..count {
        let genome = breeder.spawn();
        let record = capture(&CaptureSource {
            entity_id: u64::from(entity_id),
            genome: &genome,
            generation: 0,
            author,
            name: None,
            description: None,
            stats: CaptureStats::default(),
        });
        if store.contains(&record.content_hash)? {
            ui::display_warning(err, &format!("{} is already stored, skipped", record.id()))?;
            continue;
        }
        store.save(&record)?;
        writeln!(out, "{}", record.id())?;
        saved += 1;
    }
    info!(saved, requested = count, store = %store.root().display(), "spawn complete");
    Ok(())
}
