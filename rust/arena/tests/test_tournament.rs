use evohold_ai::{ParamMap, ParameterizedPolicy, PokerKind, PokerStrategy};
use evohold_arena::benchmark::{evaluate, BenchmarkConfig};
use evohold_arena::solution::{capture, CaptureSource, CaptureStats, SolutionRecord};
use evohold_arena::tournament::{compare, compare_all};
use evohold_engine::engine::TableConfig;
use evohold_genetics::genome::Genome;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn record(seed: u64, kind: PokerKind) -> SolutionRecord {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut genome = Genome::random(&mut rng);
    genome.poker_strategy = PokerStrategy::random_of_kind(kind, &mut rng);
    capture(&CaptureSource {
        entity_id: seed,
        genome: &genome,
        generation: 2,
        author: "arena",
        name: None,
        description: None,
        stats: CaptureStats::default(),
    })
}

fn field() -> Vec<SolutionRecord> {
    vec![
        record(1, PokerKind::TightAggressive),
        record(2, PokerKind::LooseAggressive),
        record(3, PokerKind::PotOdds),
        record(4, PokerKind::Trapper),
    ]
}

#[test]
fn head_to_head_is_exactly_reciprocal() {
    let a = record(11, PokerKind::TightAggressive);
    let b = record(12, PokerKind::LooseAggressive);
    let table = TableConfig::default();
    let ab = compare(&a, &b, 60, &table).unwrap();
    let ba = compare(&b, &a, 60, &table).unwrap();

    assert_eq!(ab.a_id, a.id());
    assert_eq!(ba.a_id, b.id());
    assert_eq!(ab.a_win_rate, ba.b_win_rate);
    assert_eq!(ab.b_win_rate, ba.a_win_rate);
    assert_eq!(ab.a_bb_per_100, ba.b_bb_per_100);
    assert_eq!(ab.a_bb_per_100, -ab.b_bb_per_100);
    assert!((ab.a_win_rate + ab.b_win_rate - 1.0).abs() < 1e-12);
    assert_eq!(ab.a_wins + ab.b_wins + ab.ties, ab.hands_played);
    assert_eq!(ab.hands_played, 60);
}

#[test]
fn self_match_is_even() {
    let a = record(13, PokerKind::PotOdds);
    let m = compare(&a, &a, 40, &TableConfig::default()).unwrap();
    // identical strategies on duplicate deals cancel out
    assert_eq!(m.a_bb_per_100, 0.0);
    assert_eq!(m.a_win_rate, 0.5);
}

#[test]
fn compare_all_is_order_invariant() {
    let table = TableConfig::default();
    let records = field();
    let mut reversed = records.clone();
    reversed.reverse();
    let mut shuffled = records.clone();
    shuffled.swap(0, 2);

    let base = compare_all(&records, 40, &table).unwrap();
    assert_eq!(base, compare_all(&reversed, 40, &table).unwrap());
    assert_eq!(base, compare_all(&shuffled, 40, &table).unwrap());
}

#[test]
fn matrix_is_complete_and_complementary() {
    let records = field();
    let report = compare_all(&records, 40, &TableConfig::default()).unwrap();
    assert_eq!(report.matches.len(), 6);
    assert_eq!(report.win_rates.len(), 4);
    for (row, cols) in &report.win_rates {
        assert_eq!(cols.len(), 3);
        assert!(!cols.contains_key(row));
        for (col, rate) in cols {
            let back = report.win_rates[col][row];
            assert!((rate + back - 1.0).abs() < 1e-12);
        }
    }
    for pair in &report.significant_pairs {
        assert!(pair.gap_bb_per_100 > 5.0);
    }
}

#[test]
fn ranking_uses_benchmark_elo() {
    let mut records = field();
    let config = BenchmarkConfig {
        hands_per_opponent: 20,
        duplicate_sets: 2,
        opponents: vec![evohold_ai::BaselineOpponent::AlwaysCall],
        ..BenchmarkConfig::default()
    };
    records[3].benchmark = Some(evaluate(&records[3], &config).unwrap());
    let report = compare_all(&records, 20, &TableConfig::default()).unwrap();
    assert_eq!(report.ranking.len(), 4);
    assert_eq!(
        report.ranking.iter().map(|r| r.rank).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
    let benched = report
        .ranking
        .iter()
        .find(|r| r.id == records[3].id())
        .unwrap();
    assert_eq!(benched.rating, records[3].rating());
    assert!(benched.aggregate_bb_per_100.is_some());
    for pair in report.ranking.windows(2) {
        assert!(pair[0].rating >= pair[1].rating);
    }
}
