//! Plain-text formatting of benchmark numbers and leaderboard rows.
//!
//! ## Example
//!
//! ```rust
//! use evohold_cli::formatters::{format_bb, format_interval};
//!
//! assert_eq!(format_bb(3.14159), "+3.14");
//! assert_eq!(format_interval(-1.0, 2.5), "[-1.00, +2.50]");
//! ```

use evohold_arena::benchmark::BenchmarkResult;
use evohold_arena::LeaderboardRow;

/// Signed bb/100 with two decimals.
pub fn format_bb(bb_per_100: f64) -> String {
    format!("{:+.2}", bb_per_100)
}

pub fn format_interval(low: f64, high: f64) -> String {
    format!("[{}, {}]", format_bb(low), format_bb(high))
}

/// One-line benchmark summary for `id`.
pub fn format_benchmark(id: &str, result: &BenchmarkResult) -> String {
    format!(
        "{}  elo {:.1} ({})  {} bb/100 {}",
        id,
        result.elo.rating,
        result.skill_tier,
        format_bb(result.aggregate_bb_per_100),
        format_interval(result.ci_low, result.ci_high)
    )
}

pub const LEADERBOARD_HEADER: &str = "rank  solution                         elo      tier          bb/100";

pub fn format_leaderboard_row(row: &LeaderboardRow) -> String {
    let rating = row
        .rating
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| "-".into());
    let tier = row
        .skill_tier
        .map(|t| t.to_string())
        .unwrap_or_else(|| "unrated".into());
    let bb = row
        .aggregate_bb_per_100
        .map(format_bb)
        .unwrap_or_else(|| "-".into());
    format!(
        "{:>4}  {:<32} {:>7}  {:<12} {:>8}",
        row.rank, row.solution_id, rating, tier, bb
    )
}
