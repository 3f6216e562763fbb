//! Elo ratings for benchmarked solutions.
//!
//! Ratings move only through [`EloRating::update`]: the expected score comes
//! from the classic logistic curve, the actual score from a bb/100 result
//! squashed into `(0, 1)`. The K-factor shrinks as a solution plays more
//! games and is scaled down for short matches.

use std::collections::BTreeMap;
use std::fmt;

use evohold_ai::BaselineOpponent;
use serde::{Deserialize, Serialize};

pub const INITIAL_RATING: f64 = 1200.0;
pub const MIN_RATING: f64 = 500.0;
pub const MAX_RATING: f64 = 2500.0;

/// bb/100 results are clamped to `±BB_CLAMP` before scoring.
pub const BB_CLAMP: f64 = 20.0;
const BB_SCALE: f64 = 5.0;
/// Actual scores within this distance of 0.5 count as draws.
pub const DRAW_BAND: f64 = 0.05;
/// Matches of at least this many hands update with the full K-factor.
pub const FULL_WEIGHT_HANDS: u32 = 200;
const MIN_K_SCALE: f64 = 0.2;

const POPULATION_MEAN: f64 = 1300.0;
const POPULATION_STDEV: f64 = 150.0;

/// Probability that a player rated `a` scores against one rated `b`.
///
/// ```
/// use evohold_arena::elo::expected_score;
///
/// assert_eq!(expected_score(1200.0, 1200.0), 0.5);
/// assert!(expected_score(1600.0, 1200.0) > 0.9);
/// ```
pub fn expected_score(a: f64, b: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((b - a) / 400.0))
}

/// Maps a bb/100 result onto an Elo score in `(0, 1)`.
pub fn bb_to_score(bb_per_100: f64) -> f64 {
    let bb = if bb_per_100.is_finite() {
        bb_per_100.clamp(-BB_CLAMP, BB_CLAMP)
    } else {
        0.0
    };
    1.0 / (1.0 + (-bb / BB_SCALE).exp())
}

/// Fixed rating of a reference opponent. Anchors never move.
pub fn anchor_rating(opponent: BaselineOpponent) -> f64 {
    match opponent {
        BaselineOpponent::AlwaysFold => 800.0,
        BaselineOpponent::Random => 900.0,
        BaselineOpponent::AlwaysCall => 1000.0,
        BaselineOpponent::Maniac => 1000.0,
        BaselineOpponent::TightPassive => 1100.0,
        BaselineOpponent::TightAggressive => 1400.0,
        BaselineOpponent::Balanced => 1600.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillTier {
    Beginner,
    Novice,
    Intermediate,
    Advanced,
    Expert,
    Master,
}

impl SkillTier {
    pub const ALL: [SkillTier; 6] = [
        SkillTier::Beginner,
        SkillTier::Novice,
        SkillTier::Intermediate,
        SkillTier::Advanced,
        SkillTier::Expert,
        SkillTier::Master,
    ];

    /// Tier for `rating`; a non-finite rating ranks lowest.
    pub fn from_rating(rating: f64) -> Self {
        match rating {
            r if !r.is_finite() => SkillTier::Beginner,
            r if r < 1000.0 => SkillTier::Beginner,
            r if r < 1200.0 => SkillTier::Novice,
            r if r < 1400.0 => SkillTier::Intermediate,
            r if r < 1600.0 => SkillTier::Advanced,
            r if r < 1800.0 => SkillTier::Expert,
            _ => SkillTier::Master,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SkillTier::Beginner => "beginner",
            SkillTier::Novice => "novice",
            SkillTier::Intermediate => "intermediate",
            SkillTier::Advanced => "advanced",
            SkillTier::Expert => "expert",
            SkillTier::Master => "master",
        }
    }
}

impl fmt::Display for SkillTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EloRating {
    pub rating: f64,
    pub games_played: u32,
    /// Rating after each update, oldest first.
    pub history: Vec<f64>,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl Default for EloRating {
    fn default() -> Self {
        Self::new()
    }
}

impl EloRating {
    pub fn new() -> Self {
        Self::with_rating(INITIAL_RATING)
    }

    pub fn with_rating(rating: f64) -> Self {
        Self {
            rating: rating.clamp(MIN_RATING, MAX_RATING),
            games_played: 0,
            history: Vec::new(),
            wins: 0,
            losses: 0,
            draws: 0,
        }
    }

    /// K-factor before match-length scaling.
    pub fn k_factor(&self) -> f64 {
        match self.games_played {
            0..=9 => 64.0,
            10..=49 => 48.0,
            _ => 32.0,
        }
    }

    /// Applies one result and returns the rating change.
    ///
    /// `actual` is the score in `[0, 1]`; `hands` is the match length used
    /// to scale K down for short matches.
    pub fn update(&mut self, opponent_rating: f64, actual: f64, hands: u32) -> f64 {
        let actual = if actual.is_finite() {
            actual.clamp(0.0, 1.0)
        } else {
            0.5
        };
        let scale = (f64::from(hands) / f64::from(FULL_WEIGHT_HANDS)).clamp(MIN_K_SCALE, 1.0);
        let k = self.k_factor() * scale;
        let before = self.rating;
        self.rating = (before + k * (actual - expected_score(before, opponent_rating)))
            .clamp(MIN_RATING, MAX_RATING);
        self.history.push(self.rating);
        self.games_played += 1;
        if (actual - 0.5).abs() <= DRAW_BAND {
            self.draws += 1;
        } else if actual > 0.5 {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.rating - before
    }

    /// [`update`](Self::update) with the score derived from a bb/100 result.
    pub fn update_from_bb(&mut self, opponent_rating: f64, bb_per_100: f64, hands: u32) -> f64 {
        self.update(opponent_rating, bb_to_score(bb_per_100), hands)
    }

    pub fn tier(&self) -> SkillTier {
        SkillTier::from_rating(self.rating)
    }
}

/// Summary of a set of ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub stdev: f64,
    pub min: f64,
    pub max: f64,
    pub tiers: BTreeMap<SkillTier, usize>,
}

/// Returns `None` for an empty map.
pub fn population_stats(ratings: &BTreeMap<String, f64>) -> Option<PopulationStats> {
    if ratings.is_empty() {
        return None;
    }
    let mut values: Vec<f64> = ratings.values().copied().collect();
    values.sort_by(f64::total_cmp);
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    } else {
        values[n / 2]
    };
    let mut tiers = BTreeMap::new();
    for v in &values {
        *tiers.entry(SkillTier::from_rating(*v)).or_insert(0) += 1;
    }
    Some(PopulationStats {
        count: n,
        mean,
        median,
        stdev: variance.sqrt(),
        min: values[0],
        max: values[n - 1],
        tiers,
    })
}

/// Approximate percentile (0-100) of `rating` in the reference population.
///
/// Uses the logistic approximation `1 / (1 + e^(-1.702 z))` of the normal
/// CDF with mean 1300 and standard deviation 150; accurate to about one
/// percentile point.
pub fn percentile(rating: f64) -> f64 {
    let z = (rating - POPULATION_MEAN) / POPULATION_STDEV;
    100.0 / (1.0 + (-1.702 * z).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn k_factor_steps_down() {
        let mut elo = EloRating::new();
        assert_eq!(elo.k_factor(), 64.0);
        elo.games_played = 10;
        assert_eq!(elo.k_factor(), 48.0);
        elo.games_played = 50;
        assert_eq!(elo.k_factor(), 32.0);
    }

    #[test]
    fn short_matches_scale_k() {
        let mut full = EloRating::new();
        let mut short = EloRating::new();
        let a = full.update(1200.0, 1.0, 400);
        let b = short.update(1200.0, 1.0, 20);
        assert!((a - 32.0).abs() < 1e-9);
        assert!((b - 32.0 * 0.2).abs() < 1e-9);
    }

    #[test]
    fn bb_score_is_clamped_and_centered() {
        assert_eq!(bb_to_score(0.0), 0.5);
        assert_eq!(bb_to_score(500.0), bb_to_score(20.0));
        assert_eq!(bb_to_score(f64::NAN), 0.5);
        assert!(bb_to_score(-10.0) < 0.5);
    }

    #[test]
    fn rating_is_clamped() {
        let mut elo = EloRating::with_rating(2490.0);
        for _ in 0..20 {
            elo.update(500.0, 1.0, 1000);
        }
        assert_eq!(elo.rating, MAX_RATING);
    }

    #[test]
    fn draws_use_the_band() {
        let mut elo = EloRating::new();
        elo.update(1200.0, 0.54, 200);
        elo.update(1200.0, 0.6, 200);
        elo.update(1200.0, 0.3, 200);
        assert_eq!((elo.wins, elo.losses, elo.draws), (1, 1, 1));
        assert_eq!(elo.history.len(), 3);
    }

    #[test]
    fn tiers_follow_thresholds() {
        assert_eq!(SkillTier::from_rating(999.9), SkillTier::Beginner);
        assert_eq!(SkillTier::from_rating(1200.0), SkillTier::Intermediate);
        assert_eq!(SkillTier::from_rating(1799.0), SkillTier::Expert);
        assert_eq!(SkillTier::from_rating(2000.0), SkillTier::Master);
    }

    #[test]
    fn non_finite_ratings_rank_lowest() {
        assert_eq!(SkillTier::from_rating(f64::NAN), SkillTier::Beginner);
        assert_eq!(SkillTier::from_rating(f64::INFINITY), SkillTier::Beginner);
        assert_eq!(SkillTier::from_rating(f64::NEG_INFINITY), SkillTier::Beginner);
    }

    #[test]
    fn percentile_is_centered_on_population_mean() {
        assert!((percentile(1300.0) - 50.0).abs() < 1e-9);
        assert!(percentile(1600.0) > 95.0);
        assert!(percentile(1000.0) < 5.0);
    }

    #[test]
    fn population_stats_basic() {
        let ratings: BTreeMap<String, f64> = [("a", 1000.0), ("b", 1200.0), ("c", 1400.0), ("d", 1800.0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let stats = population_stats(&ratings).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 1350.0);
        assert_eq!(stats.median, 1300.0);
        assert_eq!(stats.min, 1000.0);
        assert_eq!(stats.max, 1800.0);
        assert_eq!(stats.tiers[&SkillTier::Master], 1);
        assert!(population_stats(&BTreeMap::new()).is_none());
    }
}
