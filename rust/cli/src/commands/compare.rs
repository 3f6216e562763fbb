//! Round-robin comparison of the stored solutions.

use std::io::Write;
use std::path::PathBuf;

use evohold_arena::compare_all;
use evohold_arena::tournament::DEFAULT_MATCH_HANDS;
use evohold_engine::engine::TableConfig;

use crate::config;
use crate::error::CliError;
use crate::io_utils::open_store;

/// Handle the compare command.
///
/// Prints the tournament report (ranking, win-rate matrix, matches and
/// significant pairs) as pretty JSON.
pub fn handle_compare_command(
    store: Option<PathBuf>,
    hands: Option<u32>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = config::load()?;
    let store = open_store(store, &cfg)?;
    let records = store.load_all()?;
    if records.len() < 2 {
        return Err(CliError::InvalidInput(format!(
            "compare needs at least 2 solutions, found {}",
            records.len()
        )));
    }

    let report = compare_all(
        &records,
        hands.unwrap_or(DEFAULT_MATCH_HANDS),
        &TableConfig::default(),
    )?;
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(())
}
