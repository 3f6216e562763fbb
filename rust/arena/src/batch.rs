//! Batch evaluation over a bounded worker pool.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;
use tracing::{info, warn};

use crate::benchmark::{evaluate, BenchmarkConfig, BenchmarkResult};
use crate::errors::ArenaError;
use crate::solution::SolutionRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Worker threads; `None` uses the available parallelism.
    pub workers: Option<usize>,
    /// Evaluate on the calling thread, in input order.
    pub sequential: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub results: BTreeMap<String, BenchmarkResult>,
    /// Solution id to error message.
    pub failures: BTreeMap<String, String>,
}

impl BatchReport {
    /// Stores each successful result on the matching record.
    pub fn apply(&self, records: &mut [SolutionRecord]) {
        for record in records {
            if let Some(result) = self.results.get(record.id()) {
                record.benchmark = Some(result.clone());
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn guarded<F>(record: &SolutionRecord, evaluator: &F) -> Result<BenchmarkResult, ArenaError>
where
    F: Fn(&SolutionRecord) -> Result<BenchmarkResult, ArenaError>,
{
    catch_unwind(AssertUnwindSafe(|| evaluator(record))).unwrap_or_else(|payload| {
        Err(ArenaError::Panicked {
            id: record.id().to_string(),
            message: panic_message(payload.as_ref()),
        })
    })
}

/// Runs [`evaluate`] for every record.
///
/// Failed or panicking evaluations land in [`BatchReport::failures`]; the
/// rest are unaffected. Parallel and sequential runs produce identical
/// reports.
pub fn evaluate_batch(
    records: &[SolutionRecord],
    config: &BenchmarkConfig,
    options: &BatchOptions,
) -> Result<BatchReport, ArenaError> {
    config.validate()?;
    evaluate_batch_with(records, options, |record| evaluate(record, config))
}

/// [`evaluate_batch`] with a custom per-record evaluator.
pub fn evaluate_batch_with<F>(
    records: &[SolutionRecord],
    options: &BatchOptions,
    evaluator: F,
) -> Result<BatchReport, ArenaError>
where
    F: Fn(&SolutionRecord) -> Result<BenchmarkResult, ArenaError> + Sync,
{
    info!(
        solutions = records.len(),
        workers = ?options.workers,
        sequential = options.sequential,
        "batch evaluation started"
    );
    let run = |record: &SolutionRecord| (record.id().to_string(), guarded(record, &evaluator));
    let outcomes: Vec<(String, Result<BenchmarkResult, ArenaError>)> = if options.sequential {
        records.iter().map(run).collect()
    } else {
        let pool = ThreadPoolBuilder::new()
            .num_threads(options.workers.unwrap_or(0))
            .build()
            .map_err(|e| ArenaError::Pool(e.to_string()))?;
        pool.install(|| records.par_iter().map(run).collect())
    };

    let mut report = BatchReport::default();
    for (id, outcome) in outcomes {
        match outcome {
            Ok(result) => {
                report.results.insert(id, result);
            }
            Err(e) => {
                warn!(solution = %id, error = %e, "evaluation failed");
                report.failures.insert(id, e.to_string());
            }
        }
    }
    info!(
        succeeded = report.results.len(),
        failed = report.failures.len(),
        "batch evaluation finished"
    );
    Ok(report)
}
