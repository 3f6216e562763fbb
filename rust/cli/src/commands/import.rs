//! Imports an untrusted genome submission.
//!
//! The payload is sanitized (never rejected for being malformed), decoded
//! leniently and captured like any locally bred genome.

use std::io::Write;
use std::path::{Path, PathBuf};

use evohold_arena::solution::{capture, CaptureSource, CaptureStats};
use evohold_engine::seed::derive_seed;
use evohold_genetics::sanitize::{sanitize_genome_payload, sanitize_record_metadata};
use evohold_genetics::serialize::from_value;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde_json::Value;
use tracing::info;

use crate::config;
use crate::error::CliError;
use crate::io_utils::{open_store, read_json_file, split_submission};
use crate::ui;

/// Handle the import command.
///
/// Missing genome fields are filled from a seeded RNG: `--seed`, then the
/// configured seed, then a seed derived from the file contents, so the same
/// file always imports to the same solution.
pub fn handle_import_command(
    input: &Path,
    store: Option<PathBuf>,
    seed: Option<u64>,
    author: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = config::load()?;
    let (raw, value) = read_json_file(input)?;
    if !value.is_object() {
        return Err(CliError::InvalidInput(
            "submission must be a JSON object".into(),
        ));
    }

    let (payload, metadata) = split_submission(&value);
    let payload = sanitize_genome_payload(payload);
    let metadata = sanitize_record_metadata(metadata);

    let seed = seed
        .or(cfg.seed)
        .unwrap_or_else(|| derive_seed([raw.as_bytes()]));
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let genome = from_value(&payload, &mut rng);

    let field = |name: &str| metadata.get(name).and_then(Value::as_str);
    let author = author.unwrap_or_else(|| field("author").unwrap_or("anonymous").to_string());
    let record = capture(&CaptureSource {
        entity_id: 0,
        genome: &genome,
        generation: metadata
            .get("generation")
            .and_then(Value::as_u64)
            .unwrap_or(0),
        author: &author,
        name: field("name"),
        description: field("description"),
        stats: CaptureStats::default(),
    });

    let store = open_store(store, &cfg)?;
    if store.contains(&record.content_hash)? {
        ui::display_warning(
            err,
            &format!("{} is already stored, not imported again", record.id()),
        )?;
        writeln!(out, "{}", record.id())?;
        return Ok(());
    }
    store.save(&record)?;
    info!(solution = %record.id(), source = %input.display(), "imported");
    writeln!(out, "{}", record.id())?;
    Ok(())
}
