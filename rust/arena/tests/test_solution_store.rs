use std::fs;

use evohold_arena::benchmark::{evaluate, BenchmarkConfig};
use evohold_arena::errors::ArenaError;
use evohold_arena::leaderboard::leaderboard;
use evohold_arena::logging::LogCapture;
use evohold_arena::solution::{capture, CaptureSource, CaptureStats, SolutionRecord};
use evohold_arena::store::SolutionStore;
use evohold_ai::BaselineOpponent;
use evohold_genetics::genome::Genome;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tempfile::tempdir;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

fn record(seed: u64, author: &str) -> SolutionRecord {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let genome = Genome::random(&mut rng);
    capture(&CaptureSource {
        entity_id: seed,
        genome: &genome,
        generation: seed,
        author,
        name: Some("stored"),
        description: Some("round trip"),
        stats: CaptureStats {
            hands_played: 120,
            hands_won: 64,
            net_bb: 12.5,
        },
    })
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let store = SolutionStore::open(dir.path()).unwrap();
    let rec = record(1, "Store Test");
    let path = store.save(&rec).unwrap();
    assert_eq!(path, dir.path().join(format!("{}.json", rec.id())));

    let loaded = store.load(rec.id()).unwrap();
    assert_eq!(loaded, rec);
    assert!(loaded.verify_hash());
    assert!(store.contains(&rec.content_hash).unwrap());
    assert!(!store.contains("deadbeef").unwrap());
}

#[test]
fn missing_solution_is_not_found() {
    let dir = tempdir().unwrap();
    let store = SolutionStore::open(dir.path()).unwrap();
    assert!(matches!(store.load("nobody_000000000000"), Err(ArenaError::NotFound(_))));
}

#[test]
fn ids_outside_the_id_shape_are_rejected() {
    let dir = tempdir().unwrap();
    let store = SolutionStore::open(dir.path().join("store")).unwrap();
    let mut rec = record(10, "lab");
    rec.metadata.solution_id = "../escaped".into();

    assert!(matches!(store.save(&rec), Err(ArenaError::InvalidId(_))));
    assert!(!dir.path().join("escaped.json").exists());
    assert!(fs::read_dir(store.root()).unwrap().next().is_none());

    for id in ["../escaped", "lab/0123456789ab", "lab_0123456789AB", "lab_0123", ""] {
        assert!(
            matches!(store.load(id), Err(ArenaError::InvalidId(_))),
            "{id:?} should be rejected"
        );
    }
}

#[test]
fn load_all_skips_records_filed_under_another_name() {
    let dir = tempdir().unwrap();
    let store = SolutionStore::open(dir.path()).unwrap();
    let kept = record(11, "lab");
    store.save(&kept).unwrap();

    let copied = record(12, "lab");
    let json = serde_json::to_string(&copied).unwrap();
    fs::write(store.root().join("lab_ffffffffffff.json"), &json).unwrap();

    let mut hostile = record(13, "lab");
    hostile.metadata.solution_id = "../escaped".into();
    fs::write(
        store.root().join("hostile.json"),
        serde_json::to_string(&hostile).unwrap(),
    )
    .unwrap();

    let capture = LogCapture::new();
    let registry = Registry::default().with(capture.layer());
    let all = tracing::subscriber::with_default(registry, || store.load_all().unwrap());

    assert_eq!(all.len(), 1);
    assert_eq!(all[0], kept);
    assert_eq!(capture.at_level(Level::WARN).len(), 2);
    assert!(!store.contains(&copied.content_hash).unwrap());
    assert!(!dir.path().parent().unwrap().join("escaped.json").exists());
}

#[test]
fn load_all_is_sorted_and_skips_bad_files() {
    let dir = tempdir().unwrap();
    let store = SolutionStore::open(dir.path().join("nested")).unwrap();
    for (seed, author) in [(3, "zed"), (4, "amy"), (5, "mid")] {
        store.save(&record(seed, author)).unwrap();
    }
    fs::write(store.root().join("garbage.json"), "{ not json").unwrap();
    fs::write(store.root().join("notes.txt"), "ignored").unwrap();

    let capture = LogCapture::new();
    let registry = Registry::default().with(capture.layer());
    let all = tracing::subscriber::with_default(registry, || store.load_all().unwrap());

    let ids: Vec<&str> = all.iter().map(|r| r.id()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert_eq!(all.len(), 3);
    assert_eq!(capture.at_level(Level::WARN).len(), 1);
}

#[test]
fn saving_again_replaces_the_file() {
    let dir = tempdir().unwrap();
    let store = SolutionStore::open(dir.path()).unwrap();
    let mut rec = record(6, "lab");
    store.save(&rec).unwrap();
    let config = BenchmarkConfig {
        hands_per_opponent: 10,
        duplicate_sets: 1,
        opponents: vec![BaselineOpponent::AlwaysFold],
        ..BenchmarkConfig::default()
    };
    rec.benchmark = Some(evaluate(&rec, &config).unwrap());
    store.save(&rec).unwrap();
    assert_eq!(store.load_all().unwrap().len(), 1);
    assert_eq!(store.load(rec.id()).unwrap().benchmark, rec.benchmark);
}

#[test]
fn leaderboard_puts_benchmarked_first() {
    let mut recs = vec![record(7, "a"), record(8, "b"), record(9, "c")];
    let config = BenchmarkConfig {
        hands_per_opponent: 10,
        duplicate_sets: 1,
        opponents: vec![BaselineOpponent::AlwaysCall],
        ..BenchmarkConfig::default()
    };
    recs[2].benchmark = Some(evaluate(&recs[2], &config).unwrap());

    let rows = leaderboard(&recs);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].solution_id, recs[2].id());
    assert!(rows[0].rating.is_some());
    assert!(rows[0].percentile.is_some());
    assert!(rows[1].rating.is_none());
    assert!(rows[1].solution_id < rows[2].solution_id);
    assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
}
