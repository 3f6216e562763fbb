//! Head-to-head matches and round-robin tournaments between solutions.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use evohold_engine::engine::TableConfig;
use evohold_engine::seed::{child_seed, derive_seed};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::benchmark::play_duplicate_pair;
use crate::errors::ArenaError;
use crate::solution::SolutionRecord;

pub const DEFAULT_MATCH_HANDS: u32 = 400;
/// Head-to-head edges above this many bb/100 are reported as significant.
pub const SIGNIFICANT_GAP: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub a_id: String,
    pub b_id: String,
    pub hands_played: u32,
    pub a_wins: u32,
    pub b_wins: u32,
    pub ties: u32,
    pub a_bb_per_100: f64,
    pub b_bb_per_100: f64,
    /// Share of hands won by `a`, ties counting half.
    pub a_win_rate: f64,
    pub b_win_rate: f64,
}

impl HeadToHead {
    fn mirrored(self) -> Self {
        Self {
            a_id: self.b_id,
            b_id: self.a_id,
            hands_played: self.hands_played,
            a_wins: self.b_wins,
            b_wins: self.a_wins,
            ties: self.ties,
            a_bb_per_100: self.b_bb_per_100,
            b_bb_per_100: self.a_bb_per_100,
            a_win_rate: self.b_win_rate,
            b_win_rate: self.a_win_rate,
        }
    }
}

/// Plays `a` against `b` over duplicate deals.
///
/// The match is always played in canonical order (lower id first) from a
/// seed derived from both ids, then mirrored if needed, so
/// `compare(a, b)` and `compare(b, a)` describe exactly the same match.
///
/// # Errors
///
/// [`ArenaError::Strategy`] when either record's strategy payload does not
/// decode.
pub fn compare(
    a: &SolutionRecord,
    b: &SolutionRecord,
    hands: u32,
    table: &TableConfig,
) -> Result<HeadToHead, ArenaError> {
    if a.id() > b.id() {
        return compare(b, a, hands, table).map(HeadToHead::mirrored);
    }
    let first = a.poker_strategy()?;
    let second = b.poker_strategy()?;
    let seed = derive_seed(["head_to_head", a.id(), b.id()]);
    let pairs = (hands / 2).max(1);

    let (mut wins, mut losses, mut ties) = (0u32, 0u32, 0u32);
    let mut total_bb = 0.0;
    for k in 0..pairs {
        let deltas = play_duplicate_pair(child_seed(seed, u64::from(k)), &first, &second, table)?;
        for d in deltas {
            match d.partial_cmp(&0.0) {
                Some(Ordering::Greater) => wins += 1,
                Some(Ordering::Less) => losses += 1,
                _ => ties += 1,
            }
            total_bb += d;
        }
    }

    let hands_played = 2 * pairs;
    let n = f64::from(hands_played);
    let a_bb = total_bb * 100.0 / n;
    let a_win_rate = (f64::from(wins) + 0.5 * f64::from(ties)) / n;
    Ok(HeadToHead {
        a_id: a.id().to_string(),
        b_id: b.id().to_string(),
        hands_played,
        a_wins: wins,
        b_wins: losses,
        ties,
        a_bb_per_100: a_bb,
        b_bb_per_100: -a_bb,
        a_win_rate,
        b_win_rate: 1.0 - a_win_rate,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub id: String,
    pub rating: f64,
    pub aggregate_bb_per_100: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificantPair {
    pub stronger: String,
    pub weaker: String,
    /// Head-to-head bb/100 of the stronger side.
    pub gap_bb_per_100: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentReport {
    pub ranking: Vec<RankingEntry>,
    /// `win_rates[row][col]`: share of hands `row` won against `col`.
    pub win_rates: BTreeMap<String, BTreeMap<String, f64>>,
    pub matches: Vec<HeadToHead>,
    pub significant_pairs: Vec<SignificantPair>,
}

/// Orders by Elo (descending), then aggregate bb/100 (descending,
/// unbenchmarked last), then id.
pub(crate) fn rank_order(
    a: (f64, Option<f64>, &str),
    b: (f64, Option<f64>, &str),
) -> Ordering {
    let bb = |x: Option<f64>| x.unwrap_or(f64::NEG_INFINITY);
    b.0.total_cmp(&a.0)
        .then_with(|| bb(b.1).total_cmp(&bb(a.1)))
        .then_with(|| a.2.cmp(b.2))
}

/// Round-robin over `records`.
///
/// The result does not depend on the order of `records`: matches are played
/// in id order and each one is seeded from its two ids alone.
pub fn compare_all(
    records: &[SolutionRecord],
    hands: u32,
    table: &TableConfig,
) -> Result<TournamentReport, ArenaError> {
    let mut sorted: Vec<&SolutionRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.id().cmp(b.id()));
    sorted.dedup_by(|a, b| a.id() == b.id());

    let pairs: Vec<(usize, usize)> = (0..sorted.len())
        .flat_map(|i| (i + 1..sorted.len()).map(move |j| (i, j)))
        .collect();
    let matches = pairs
        .par_iter()
        .map(|&(i, j)| compare(sorted[i], sorted[j], hands, table))
        .collect::<Result<Vec<_>, _>>()?;

    let mut win_rates: BTreeMap<String, BTreeMap<String, f64>> = sorted
        .iter()
        .map(|r| (r.id().to_string(), BTreeMap::new()))
        .collect();
    let mut significant_pairs = Vec::new();
    for m in &matches {
        if let Some(row) = win_rates.get_mut(&m.a_id) {
            row.insert(m.b_id.clone(), m.a_win_rate);
        }
        if let Some(row) = win_rates.get_mut(&m.b_id) {
            row.insert(m.a_id.clone(), m.b_win_rate);
        }
        let (stronger, weaker, gap) = if m.a_bb_per_100 >= 0.0 {
            (&m.a_id, &m.b_id, m.a_bb_per_100)
        } else {
            (&m.b_id, &m.a_id, m.b_bb_per_100)
        };
        if gap > SIGNIFICANT_GAP {
            significant_pairs.push(SignificantPair {
                stronger: stronger.clone(),
                weaker: weaker.clone(),
                gap_bb_per_100: gap,
            });
        }
    }

    let mut ranked = sorted.clone();
    ranked.sort_by(|a, b| {
        rank_order(
            (a.rating(), a.aggregate_bb_per_100(), a.id()),
            (b.rating(), b.aggregate_bb_per_100(), b.id()),
        )
    });
    let ranking = ranked
        .iter()
        .enumerate()
        .map(|(i, r)| RankingEntry {
            rank: i + 1,
            id: r.id().to_string(),
            rating: r.rating(),
            aggregate_bb_per_100: r.aggregate_bb_per_100(),
        })
        .collect();

    Ok(TournamentReport {
        ranking,
        win_rates,
        matches,
        significant_pairs,
    })
}
