use evohold_ai::ParameterizedPolicy;
use evohold_genetics::containers::TraitContainer;
use evohold_genetics::genome::Genome;
use evohold_genetics::serialize::{from_value, to_value};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn assert_close(a: &Genome, b: &Genome) {
    for ((name, v1, m1), (_, v2, m2)) in a.physical.entries().into_iter().zip(b.physical.entries()) {
        assert!((v1 - v2).abs() < 1e-9, "{name}");
        assert!((m1.mutation_rate - m2.mutation_rate).abs() < 1e-9, "{name}");
    }
    for ((name, v1, m1), (_, v2, m2)) in a.behavioral.entries().into_iter().zip(b.behavioral.entries()) {
        assert!((v1 - v2).abs() < 1e-9, "{name}");
        assert!((m1.hgt_probability - m2.hgt_probability).abs() < 1e-9, "{name}");
    }
    assert_eq!(a.mate_preferences.value.len(), b.mate_preferences.value.len());
    for (k, v) in &a.mate_preferences.value {
        assert!((v - b.mate_preferences.value[k]).abs() < 1e-9, "{k}");
    }
    for (k, v) in &a.learned_behaviors {
        assert!((v - b.learned_behaviors[k]).abs() < 1e-9, "{k}");
    }
    assert_eq!(a.poker_strategy.kind(), b.poker_strategy.kind());
    assert_eq!(a.behavior_strategy.kind(), b.behavior_strategy.kind());
    for (k, v) in a.poker_strategy.parameters() {
        assert!((v - b.poker_strategy.parameters()[k]).abs() < 1e-9, "{k}");
    }
}

#[test]
fn round_trip_within_tolerance() {
    let mut rng = ChaCha20Rng::seed_from_u64(31);
    for _ in 0..100 {
        let mut genome = Genome::random(&mut rng);
        genome.learn("avoid_crabs", -0.4);
        genome.behavioral.aggression.meta.hgt_probability = 0.3;
        let text = serde_json::to_string(&to_value(&genome)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        let back = from_value(&parsed, &mut rng);
        assert_close(&genome, &back);
    }
}

#[test]
fn offspring_survive_round_trip() {
    let mut rng = ChaCha20Rng::seed_from_u64(32);
    let mut breeder =
        evohold_genetics::Breeder::new(evohold_genetics::BreederConfig::with_seed(5)).unwrap();
    let a = breeder.spawn();
    let b = breeder.spawn();
    let child = breeder.reproduce(
        &a,
        &b,
        evohold_genetics::strategy_evolution::ReproductionKind::Competitive,
        0.7,
    );
    let back = from_value(&to_value(&child), &mut rng);
    assert_close(&child, &back);
    assert!(back.is_valid());
}

#[test]
fn missing_fields_are_randomized_not_errors() {
    let mut rng = ChaCha20Rng::seed_from_u64(33);
    let partial = serde_json::json!({"aggression": 0.9});
    let g = from_value(&partial, &mut rng);
    assert_eq!(g.behavioral.aggression.value, 0.9);
    assert!(g.is_valid());
}
