use serde::Serialize;

use crate::elo::{percentile, SkillTier};
use crate::solution::SolutionRecord;
use crate::tournament::rank_order;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub solution_id: String,
    pub name: String,
    pub author: String,
    pub generation: u64,
    /// `None` until the solution has been benchmarked.
    pub rating: Option<f64>,
    pub skill_tier: Option<SkillTier>,
    pub percentile: Option<f64>,
    pub aggregate_bb_per_100: Option<f64>,
    pub ci_low: Option<f64>,
    pub ci_high: Option<f64>,
}

/// Benchmarked records first by Elo, then aggregate bb/100, then id;
/// unbenchmarked records follow in id order.
pub fn leaderboard(records: &[SolutionRecord]) -> Vec<LeaderboardRow> {
    let mut sorted: Vec<&SolutionRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        b.benchmark
            .is_some()
            .cmp(&a.benchmark.is_some())
            .then_with(|| {
                rank_order(
                    (a.rating(), a.aggregate_bb_per_100(), a.id()),
                    (b.rating(), b.aggregate_bb_per_100(), b.id()),
                )
            })
    });

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let bench = r.benchmark.as_ref();
            LeaderboardRow {
                rank: i + 1,
                solution_id: r.id().to_string(),
                name: r.metadata.name.clone(),
                author: r.metadata.author.clone(),
                generation: r.metadata.generation,
                rating: bench.map(|b| b.elo.rating),
                skill_tier: bench.map(|b| b.skill_tier),
                percentile: bench.map(|b| percentile(b.elo.rating)),
                aggregate_bb_per_100: bench.map(|b| b.aggregate_bb_per_100),
                ci_low: bench.map(|b| b.ci_low),
                ci_high: bench.map(|b| b.ci_high),
            }
        })
        .collect()
}
