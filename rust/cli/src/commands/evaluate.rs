//! Benchmarks stored solutions and writes the results back.

use std::io::Write;
use std::path::PathBuf;

use evohold_arena::{evaluate_batch, BatchOptions, BenchmarkConfig};
use tracing::info;

use crate::config;
use crate::error::CliError;
use crate::formatters::format_benchmark;
use crate::io_utils::open_store;
use crate::ui;

#[derive(Debug, Clone, Default)]
pub struct EvaluateArgs {
    pub store: Option<PathBuf>,
    pub id: Option<String>,
    pub hands: Option<u32>,
    pub sets: Option<u32>,
    pub workers: Option<usize>,
    pub sequential: bool,
}

/// Handle the evaluate command.
///
/// Evaluates one solution (`--id`) or the whole store, saves every
/// successful benchmark and prints a summary line per solution. Failures
/// are reported as warnings; the command fails only if nothing succeeded.
pub fn handle_evaluate_command(
    args: EvaluateArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = config::load()?;
    let store = open_store(args.store, &cfg)?;

    let mut records = match &args.id {
        Some(id) => vec![store.load(id)?],
        None => store.load_all()?,
    };
    if records.is_empty() {
        return Err(CliError::InvalidInput(format!(
            "no solutions in {}",
            store.root().display()
        )));
    }

    let bench = BenchmarkConfig {
        hands_per_opponent: args.hands.unwrap_or(cfg.hands),
        duplicate_sets: args.sets.unwrap_or(cfg.duplicate_sets),
        ..BenchmarkConfig::default()
    };
    let options = BatchOptions {
        workers: args.workers.or(cfg.workers),
        sequential: args.sequential,
    };
    let report = evaluate_batch(&records, &bench, &options)?;
    report.apply(&mut records);

    for record in records.iter().filter(|r| report.results.contains_key(r.id())) {
        store.save(record)?;
        if let Some(result) = &record.benchmark {
            writeln!(out, "{}", format_benchmark(record.id(), result))?;
        }
    }
    for (id, reason) in &report.failures {
        ui::display_warning(err, &format!("{} failed: {}", id, reason))?;
    }
    info!(
        evaluated = report.results.len(),
        failed = report.failures.len(),
        "evaluate complete"
    );

    if report.results.is_empty() {
        return Err(CliError::InvalidInput(format!(
            "all {} evaluation(s) failed",
            report.failures.len()
        )));
    }
    Ok(())
}
