use std::fs;
use std::path::Path;

use evohold_arena::SolutionStore;
use serde_json::{json, Value};
use tempfile::TempDir;

fn run_cli(args: &[&str]) -> (i32, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut argv = vec!["evohold"];
    argv.extend_from_slice(args);
    let code = evohold_cli::run(argv, &mut out, &mut err);
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

fn spawn(store: &Path, count: u32, seed: u64) -> Vec<String> {
    let (code, out, err) = run_cli(&[
        "spawn",
        "--count",
        &count.to_string(),
        "--seed",
        &seed.to_string(),
        "--store",
        store.to_str().unwrap(),
        "--author",
        "lab",
    ]);
    assert_eq!(code, 0, "spawn failed: {err}");
    out.lines().map(str::to_string).collect()
}

#[test]
fn spawn_saves_one_file_per_solution() {
    let dir = TempDir::new().unwrap();
    let ids = spawn(dir.path(), 3, 11);
    assert_eq!(ids.len(), 3);
    let store = SolutionStore::open(dir.path()).unwrap();
    for id in &ids {
        assert!(id.starts_with("lab_"));
        let record = store.load(id).unwrap();
        assert!(record.verify_hash());
        assert_eq!(record.metadata.generation, 0);
        assert!(record.benchmark.is_none());
    }
}

#[test]
fn spawn_is_reproducible_from_the_seed() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    assert_eq!(spawn(a.path(), 2, 99), spawn(b.path(), 2, 99));
    assert_ne!(spawn(a.path(), 2, 98), spawn(b.path(), 2, 99));
}

#[test]
fn respawning_with_the_same_seed_skips_duplicates() {
    let dir = TempDir::new().unwrap();
    spawn(dir.path(), 2, 5);
    let (code, out, err) = run_cli(&[
        "spawn",
        "--count",
        "2",
        "--seed",
        "5",
        "--store",
        dir.path().to_str().unwrap(),
        "--author",
        "lab",
    ]);
    assert_eq!(code, 0);
    assert!(out.is_empty());
    assert_eq!(err.matches("WARNING:").count(), 2);
}

#[test]
fn breed_two_parents_increments_generation() {
    let dir = TempDir::new().unwrap();
    let store_arg = dir.path().to_str().unwrap();
    let ids = spawn(dir.path(), 2, 21);
    let (code, out, err) = run_cli(&[
        "breed",
        "--store",
        store_arg,
        "--parent-a",
        &ids[0],
        "--parent-b",
        &ids[1],
        "--seed",
        "3",
    ]);
    assert_eq!(code, 0, "{err}");
    let child_id = out.trim();
    let child = SolutionStore::open(dir.path())
        .unwrap()
        .load(child_id)
        .unwrap();
    assert_eq!(child.metadata.generation, 1);
    assert_eq!(child.metadata.author, "lab");
    assert!(child.genome.is_some());
}

#[test]
fn breed_single_parent_is_asexual() {
    let dir = TempDir::new().unwrap();
    let store_arg = dir.path().to_str().unwrap();
    let ids = spawn(dir.path(), 1, 22);
    let (code, out, err) = run_cli(&[
        "breed",
        "--store",
        store_arg,
        "--parent-a",
        &ids[0],
        "--seed",
        "4",
        "--stress",
        "0.5",
        "--author",
        "grafter",
    ]);
    assert_eq!(code, 0, "{err}");
    assert!(out.trim().starts_with("grafter_"));
}

#[test]
fn breed_rejects_unknown_parent_and_bad_stress() {
    let dir = TempDir::new().unwrap();
    let store_arg = dir.path().to_str().unwrap();
    let ids = spawn(dir.path(), 1, 23);

    let (code, _, err) = run_cli(&[
        "breed", "--store", store_arg, "--parent-a", "lab_missing", "--seed", "1",
    ]);
    assert_eq!(code, 2);
    assert!(err.starts_with("Error:"));

    let (code, _, err) = run_cli(&[
        "breed", "--store", store_arg, "--parent-a", &ids[0], "--seed", "1", "--stress", "1.5",
    ]);
    assert_eq!(code, 2);
    assert!(err.contains("stress"));
}

#[test]
fn evaluate_writes_benchmarks_back() {
    let dir = TempDir::new().unwrap();
    let store_arg = dir.path().to_str().unwrap();
    let ids = spawn(dir.path(), 2, 31);
    let (code, out, err) = run_cli(&[
        "evaluate",
        "--store",
        store_arg,
        "--hands",
        "20",
        "--sets",
        "2",
        "--sequential",
    ]);
    assert_eq!(code, 0, "{err}");
    assert_eq!(out.lines().count(), 2);
    assert!(out.contains("elo"));

    let store = SolutionStore::open(dir.path()).unwrap();
    for id in &ids {
        let bench = store.load(id).unwrap().benchmark.expect("benchmark saved");
        assert_eq!(bench.hands_per_opponent, 20);
        assert_eq!(bench.duplicate_sets, 2);
        assert_eq!(bench.opponents.len(), 7);
    }
}

#[test]
fn evaluate_single_id_leaves_others_untouched() {
    let dir = TempDir::new().unwrap();
    let store_arg = dir.path().to_str().unwrap();
    let ids = spawn(dir.path(), 2, 32);
    let (code, out, _) = run_cli(&[
        "evaluate", "--store", store_arg, "--id", &ids[1], "--hands", "10", "--sets", "1",
    ]);
    assert_eq!(code, 0);
    assert!(out.starts_with(&ids[1]));
    let store = SolutionStore::open(dir.path()).unwrap();
    assert!(store.load(&ids[0]).unwrap().benchmark.is_none());
    assert!(store.load(&ids[1]).unwrap().benchmark.is_some());
}

#[test]
fn evaluate_parallel_matches_sequential() {
    let seq = TempDir::new().unwrap();
    let par = TempDir::new().unwrap();
    let ids = spawn(seq.path(), 3, 33);
    spawn(par.path(), 3, 33);

    let (code, seq_out, _) = run_cli(&[
        "evaluate", "--store", seq.path().to_str().unwrap(), "--hands", "12", "--sets", "2",
        "--sequential",
    ]);
    assert_eq!(code, 0);
    let (code, par_out, _) = run_cli(&[
        "evaluate", "--store", par.path().to_str().unwrap(), "--hands", "12", "--sets", "2",
        "--workers", "3",
    ]);
    assert_eq!(code, 0);
    assert_eq!(seq_out, par_out);

    let a = SolutionStore::open(seq.path()).unwrap();
    let b = SolutionStore::open(par.path()).unwrap();
    for id in &ids {
        assert_eq!(
            a.load(id).unwrap().benchmark,
            b.load(id).unwrap().benchmark
        );
    }
}

#[test]
fn evaluate_rejects_empty_store_and_thin_config() {
    let dir = TempDir::new().unwrap();
    let store_arg = dir.path().to_str().unwrap();
    let (code, _, err) = run_cli(&["evaluate", "--store", store_arg, "--hands", "10"]);
    assert_eq!(code, 2);
    assert!(err.contains("no solutions"));

    spawn(dir.path(), 1, 34);
    let (code, _, err) = run_cli(&[
        "evaluate", "--store", store_arg, "--hands", "3", "--sets", "2",
    ]);
    assert_eq!(code, 2);
    assert!(err.contains("duplicate pair"));
}

#[test]
fn leaderboard_ranks_benchmarked_solutions_first() {
    let dir = TempDir::new().unwrap();
    let store_arg = dir.path().to_str().unwrap();
    let ids = spawn(dir.path(), 3, 41);
    let (code, _, _) = run_cli(&[
        "evaluate", "--store", store_arg, "--id", &ids[2], "--hands", "10", "--sets", "1",
    ]);
    assert_eq!(code, 0);

    let (code, out, _) = run_cli(&["leaderboard", "--store", store_arg, "--json"]);
    assert_eq!(code, 0);
    let rows: Value = serde_json::from_str(&out).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["solution_id"], ids[2].as_str());
    assert_eq!(rows[0]["rank"], 1);
    assert!(rows[0]["rating"].is_number());
    assert!(rows[1]["rating"].is_null());

    let (code, out, _) = run_cli(&["leaderboard", "--store", store_arg]);
    assert_eq!(code, 0);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("rank"));
    assert!(lines[1].contains(&ids[2]));
    assert!(lines[3].contains("unrated"));
}

#[test]
fn compare_reports_a_complementary_matrix() {
    let dir = TempDir::new().unwrap();
    let store_arg = dir.path().to_str().unwrap();
    let ids = spawn(dir.path(), 3, 51);
    let (code, out, err) = run_cli(&["compare", "--store", store_arg, "--hands", "20"]);
    assert_eq!(code, 0, "{err}");

    let report: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["ranking"].as_array().unwrap().len(), 3);
    assert_eq!(report["matches"].as_array().unwrap().len(), 3);
    let rates = &report["win_rates"];
    for a in &ids {
        for b in ids.iter().filter(|b| *b != a) {
            let sum = rates[a][b].as_f64().unwrap() + rates[b][a].as_f64().unwrap();
            assert!((sum - 1.0).abs() < 1e-9, "{a} vs {b}: {sum}");
        }
    }
}

#[test]
fn compare_needs_two_solutions() {
    let dir = TempDir::new().unwrap();
    spawn(dir.path(), 1, 52);
    let (code, _, err) = run_cli(&["compare", "--store", dir.path().to_str().unwrap()]);
    assert_eq!(code, 2);
    assert!(err.contains("at least 2"));
}

fn write_json(dir: &Path, name: &str, value: &Value) -> String {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn import_sanitizes_and_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("store");
    let store_arg = store.to_str().unwrap();
    let input = write_json(
        dir.path(),
        "dirty.json",
        &json!({
            "genome": {"aggression": true, "size_modifier": 1e300, "evil": "<script>"},
            "metadata": {"author": "<b>mallory</b>", "name": "x; rm -rf /", "generation": -4}
        }),
    );

    let (code, out, err) = run_cli(&["import", "--input", &input, "--store", store_arg]);
    assert_eq!(code, 0, "{err}");
    let id = out.trim().to_string();
    assert!(id.starts_with("bmalloryb_"), "{id}");

    let record = SolutionStore::open(&store).unwrap().load(&id).unwrap();
    assert_eq!(record.metadata.generation, 0);
    assert!(record.metadata.name.chars().all(|c| c.is_ascii_alphanumeric()
        || matches!(c, ' ' | '_' | '.' | '-')));
    assert!(record.verify_hash());

    let (code, again, err) = run_cli(&["import", "--input", &input, "--store", store_arg]);
    assert_eq!(code, 0);
    assert_eq!(again.trim(), id);
    assert!(err.contains("WARNING:"));
}

#[test]
fn import_rejects_non_objects() {
    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "list.json", &json!([1, 2, 3]));
    let (code, _, err) = run_cli(&[
        "import",
        "--input",
        &input,
        "--store",
        dir.path().join("store").to_str().unwrap(),
    ]);
    assert_eq!(code, 2);
    assert!(err.contains("JSON object"));
}

#[test]
fn validate_lists_every_issue() {
    let dir = TempDir::new().unwrap();
    let input = write_json(
        dir.path(),
        "dirty.json",
        &json!({"aggression": true, "size_modifier": 1e300, "evil": "<script>"}),
    );
    let (code, out, err) = run_cli(&["validate", "--input", &input]);
    assert_eq!(code, 2);
    assert!(out.contains("$.aggression"));
    assert!(out.contains("$.size_modifier"));
    assert!(out.contains("$.evil"));
    assert!(err.contains("3 issue(s) found"));
}

#[test]
fn validate_accepts_stored_genomes() {
    let dir = TempDir::new().unwrap();
    let ids = spawn(dir.path(), 1, 61);
    let record = SolutionStore::open(dir.path())
        .unwrap()
        .load(&ids[0])
        .unwrap();
    let input = write_json(
        dir.path(),
        "submission.json",
        &json!({"genome": record.genome, "metadata": {"author": "lab"}}),
    );
    let (code, out, err) = run_cli(&["validate", "--input", &input]);
    assert_eq!(code, 0, "{out}{err}");
    assert_eq!(out.trim(), "OK");
}

#[test]
fn validate_reports_malformed_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"aggression\": ").unwrap();
    let (code, out, err) = run_cli(&["validate", "--input", path.to_str().unwrap()]);
    assert_eq!(code, 2);
    assert!(out.is_empty());
    assert!(err.contains("malformed JSON"));
}

#[test]
fn evaluate_rejects_ids_that_leave_the_store() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("store");
    spawn(&store, 1, 35);
    let (code, out, err) = run_cli(&[
        "evaluate",
        "--store",
        store.to_str().unwrap(),
        "--id",
        "../escaped",
        "--hands",
        "10",
        "--sets",
        "1",
    ]);
    assert_eq!(code, 2);
    assert!(out.is_empty());
    assert!(err.contains("Invalid solution id"));
    assert!(!dir.path().join("escaped.json").exists());
}
