use std::io::Write;
use std::path::PathBuf;

use evohold_arena::leaderboard;

use crate::config;
use crate::error::CliError;
use crate::formatters::{format_leaderboard_row, LEADERBOARD_HEADER};
use crate::io_utils::open_store;

/// Handle the leaderboard command: a table by default, JSON rows with `--json`.
pub fn handle_leaderboard_command(
    store: Option<PathBuf>,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = config::load()?;
    let store = open_store(store, &cfg)?;
    let rows = leaderboard(&store.load_all()?);

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
        return Ok(());
    }
    writeln!(out, "{}", LEADERBOARD_HEADER)?;
    for row in &rows {
        writeln!(out, "{}", format_leaderboard_row(row))?;
    }
    Ok(())
}
