//! Duplicate-deal benchmark against the reference opponent suite.
//!
//! Every seed is derived from the record's content hash, the opponent id and
//! the sub-run index, so a record always gets the same result no matter
//! when, where or alongside what it is evaluated.

use evohold_ai::{BaselineOpponent, PokerStrategy};
use evohold_engine::engine::{play_hand, TableConfig};
use evohold_engine::player::PokerPlayer;
use evohold_engine::seed::{child_seed, derive_seed};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::elo::{anchor_rating, EloRating, SkillTier};
use crate::errors::ArenaError;
use crate::solution::SolutionRecord;

pub const DEFAULT_HANDS_PER_OPPONENT: u32 = 1000;
pub const DEFAULT_DUPLICATE_SETS: u32 = 5;
/// Two-sided 95% normal quantile.
pub const Z_95: f64 = 1.96;

#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkConfig {
    /// Hands per opponent; rounded down to whole duplicate pairs.
    pub hands_per_opponent: u32,
    pub duplicate_sets: u32,
    pub opponents: Vec<BaselineOpponent>,
    pub table: TableConfig,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            hands_per_opponent: DEFAULT_HANDS_PER_OPPONENT,
            duplicate_sets: DEFAULT_DUPLICATE_SETS,
            opponents: BaselineOpponent::ALL.to_vec(),
            table: TableConfig::default(),
        }
    }
}

impl BenchmarkConfig {
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.duplicate_sets == 0 {
            return Err(ArenaError::InvalidConfig(
                "duplicate_sets must be at least 1".into(),
            ));
        }
        let too_few = self
            .duplicate_sets
            .checked_mul(2)
            .map_or(true, |needed| self.hands_per_opponent < needed);
        if too_few {
            return Err(ArenaError::InvalidConfig(format!(
                "hands_per_opponent ({}) must allow one duplicate pair per set ({} sets)",
                self.hands_per_opponent, self.duplicate_sets
            )));
        }
        if self.opponents.is_empty() {
            return Err(ArenaError::InvalidConfig("opponent suite is empty".into()));
        }
        self.table.validate()?;
        Ok(())
    }

    fn pairs_in_sub_run(&self, index: u32) -> u32 {
        let pairs = self.hands_per_opponent / 2;
        let base = pairs / self.duplicate_sets;
        base + u32::from(index < pairs % self.duplicate_sets)
    }
}

/// Aggregate weight of an opponent's result.
pub fn opponent_weight(opponent: BaselineOpponent) -> f64 {
    match opponent {
        BaselineOpponent::Balanced => 2.0,
        BaselineOpponent::TightAggressive => 1.5,
        _ => 1.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentResult {
    pub opponent: String,
    pub anchor_rating: f64,
    pub bb_per_100: f64,
    pub ci_low: f64,
    pub ci_high: f64,
    pub hands_played: u32,
    pub sub_run_bb_per_100: Vec<f64>,
    /// Sub-run seeds, in sub-run order.
    pub seeds: Vec<u64>,
    pub elo_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub opponents: Vec<OpponentResult>,
    pub aggregate_bb_per_100: f64,
    pub ci_low: f64,
    pub ci_high: f64,
    pub elo: EloRating,
    pub skill_tier: SkillTier,
    pub hands_per_opponent: u32,
    pub duplicate_sets: u32,
}

impl BenchmarkResult {
    pub fn opponent(&self, id: &str) -> Option<&OpponentResult> {
        self.opponents.iter().find(|o| o.opponent == id)
    }
}

/// Plays the deal `seed` twice with the seats swapped and returns `hero`'s
/// result of each hand in big blinds.
pub(crate) fn play_duplicate_pair(
    seed: u64,
    hero: &dyn PokerPlayer,
    villain: &dyn PokerPlayer,
    table: &TableConfig,
) -> Result<[f64; 2], ArenaError> {
    let first = play_hand(seed, [hero, villain], table)?;
    let second = play_hand(seed, [villain, hero], table)?;
    Ok([first.bb_delta(0), second.bb_delta(1)])
}

/// `(mean, half-width of the 95% CI)`. The half-width is zero below two
/// samples.
pub(crate) fn mean_and_ci(samples: &[f64]) -> (f64, f64) {
    let n = samples.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = samples.iter().sum::<f64>() / n as f64;
    if n < 2 {
        return (mean, 0.0);
    }
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    (mean, Z_95 * variance.sqrt() / (n as f64).sqrt())
}

fn run_opponent(
    content_hash: &str,
    candidate: &PokerStrategy,
    opponent: BaselineOpponent,
    config: &BenchmarkConfig,
) -> Result<OpponentResult, ArenaError> {
    let mut sub_runs = Vec::with_capacity(config.duplicate_sets as usize);
    let mut pair_samples = Vec::new();
    let mut seeds = Vec::with_capacity(config.duplicate_sets as usize);
    let mut hands_played = 0u32;

    for index in 0..config.duplicate_sets {
        let index_bytes = index.to_le_bytes();
        let seed = derive_seed([
            content_hash.as_bytes(),
            opponent.id().as_bytes(),
            index_bytes.as_slice(),
        ]);
        debug!(opponent = opponent.id(), sub_run = index, seed, "derived sub-run seed");
        seeds.push(seed);

        let pairs = config.pairs_in_sub_run(index);
        let mut total_bb = 0.0;
        for k in 0..pairs {
            let [a, b] =
                play_duplicate_pair(child_seed(seed, u64::from(k)), candidate, &opponent, &config.table)?;
            total_bb += a + b;
            pair_samples.push((a + b) * 50.0);
        }
        hands_played += 2 * pairs;
        sub_runs.push(total_bb * 100.0 / f64::from(2 * pairs));
    }

    let (bb_per_100, sub_run_half_width) = mean_and_ci(&sub_runs);
    // a single sub-run has no spread of its own; fall back to per-pair samples
    let half_width = if sub_runs.len() > 1 {
        sub_run_half_width
    } else {
        mean_and_ci(&pair_samples).1
    };
    Ok(OpponentResult {
        opponent: opponent.id().to_string(),
        anchor_rating: anchor_rating(opponent),
        bb_per_100,
        ci_low: bb_per_100 - half_width,
        ci_high: bb_per_100 + half_width,
        hands_played,
        sub_run_bb_per_100: sub_runs,
        seeds,
        elo_change: 0.0,
    })
}

/// Benchmarks `record` against every opponent of `config`.
///
/// Elo starts from the record's previous benchmark, if any, and takes one
/// update per opponent in suite order against that opponent's anchor.
///
/// # Errors
///
/// [`ArenaError::InvalidConfig`] for an unusable configuration and
/// [`ArenaError::Strategy`] when the record's poker strategy payload does not
/// decode.
///
/// # Examples
///
/// ```
/// use evohold_ai::BaselineOpponent;
/// use evohold_arena::benchmark::{evaluate, BenchmarkConfig};
/// use evohold_arena::solution::{capture, CaptureSource, CaptureStats};
/// use evohold_genetics::genome::Genome;
/// use rand::SeedableRng;
///
/// let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(9);
/// let genome = Genome::random(&mut rng);
/// let record = capture(&CaptureSource {
///     entity_id: 1,
///     genome: &genome,
///     generation: 0,
///     author: "doc",
///     name: None,
///     description: None,
///     stats: CaptureStats::default(),
/// });
/// let config = BenchmarkConfig {
///     hands_per_opponent: 20,
///     duplicate_sets: 2,
///     opponents: vec![BaselineOpponent::AlwaysCall],
///     ..BenchmarkConfig::default()
/// };
/// let result = evaluate(&record, &config).unwrap();
/// assert_eq!(result.opponents[0].hands_played, 20);
/// assert_eq!(result, evaluate(&record, &config).unwrap());
/// ```
pub fn evaluate(
    record: &SolutionRecord,
    config: &BenchmarkConfig,
) -> Result<BenchmarkResult, ArenaError> {
    config.validate()?;
    let candidate = record.poker_strategy()?;
    let mut elo = record.elo().cloned().unwrap_or_default();

    let mut opponents = Vec::with_capacity(config.opponents.len());
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    let mut weighted_variance = 0.0;
    for &opponent in &config.opponents {
        let mut result = run_opponent(&record.content_hash, &candidate, opponent, config)?;
        result.elo_change =
            elo.update_from_bb(result.anchor_rating, result.bb_per_100, result.hands_played);
        let w = opponent_weight(opponent);
        let half_width = result.ci_high - result.bb_per_100;
        weighted_sum += w * result.bb_per_100;
        weight_total += w;
        weighted_variance += (w * half_width).powi(2);
        opponents.push(result);
    }

    let aggregate = weighted_sum / weight_total;
    let half_width = weighted_variance.sqrt() / weight_total;
    debug!(
        solution = record.id(),
        aggregate_bb_per_100 = aggregate,
        rating = elo.rating,
        "benchmark complete"
    );
    Ok(BenchmarkResult {
        opponents,
        aggregate_bb_per_100: aggregate,
        ci_low: aggregate - half_width,
        ci_high: aggregate + half_width,
        skill_tier: elo.tier(),
        elo,
        hands_per_opponent: config.hands_per_opponent,
        duplicate_sets: config.duplicate_sets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_are_spread_across_sub_runs() {
        let config = BenchmarkConfig {
            hands_per_opponent: 22,
            duplicate_sets: 3,
            ..BenchmarkConfig::default()
        };
        let pairs: Vec<u32> = (0..3).map(|i| config.pairs_in_sub_run(i)).collect();
        assert_eq!(pairs, vec![4, 4, 3]);
    }

    #[test]
    fn config_rejects_empty_sub_runs() {
        let config = BenchmarkConfig {
            hands_per_opponent: 4,
            duplicate_sets: 3,
            ..BenchmarkConfig::default()
        };
        assert!(matches!(config.validate(), Err(ArenaError::InvalidConfig(_))));
        let empty = BenchmarkConfig {
            opponents: Vec::new(),
            ..BenchmarkConfig::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn config_rejects_huge_set_counts_without_overflow() {
        let config = BenchmarkConfig {
            duplicate_sets: u32::MAX,
            ..BenchmarkConfig::default()
        };
        assert!(matches!(config.validate(), Err(ArenaError::InvalidConfig(_))));
        let half = BenchmarkConfig {
            hands_per_opponent: u32::MAX,
            duplicate_sets: u32::MAX / 2 + 1,
            ..BenchmarkConfig::default()
        };
        assert!(half.validate().is_err());
    }

    #[test]
    fn ci_of_constant_samples_is_zero_width() {
        assert_eq!(mean_and_ci(&[3.0, 3.0, 3.0]), (3.0, 0.0));
        assert_eq!(mean_and_ci(&[5.0]), (5.0, 0.0));
        let (mean, hw) = mean_and_ci(&[1.0, 3.0]);
        assert_eq!(mean, 2.0);
        assert!((hw - 1.96 * 2f64.sqrt() / 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn weights_favor_strong_opponents() {
        assert_eq!(opponent_weight(BaselineOpponent::Balanced), 2.0);
        assert_eq!(opponent_weight(BaselineOpponent::TightAggressive), 1.5);
        assert_eq!(opponent_weight(BaselineOpponent::Maniac), 1.0);
    }
}
