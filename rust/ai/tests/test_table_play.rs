use evohold_ai::{create_ai, BaselineOpponent, ParameterizedPolicy, PokerStrategy};
use evohold_engine::engine::{play_hand, TableConfig};
use evohold_engine::player::PokerPlayer;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[test]
fn every_baseline_plays_every_evolved_strategy() {
    let config = TableConfig::default();
    let mut rng = ChaCha20Rng::seed_from_u64(21);
    let strategies: Vec<PokerStrategy> = (0..10).map(|_| PokerStrategy::random(&mut rng)).collect();
    for opp in BaselineOpponent::ALL {
        for (i, s) in strategies.iter().enumerate() {
            let seed = i as u64 * 31 + 5;
            let a = play_hand(seed, [s as &dyn PokerPlayer, &opp], &config).unwrap();
            let b = play_hand(seed, [&opp as &dyn PokerPlayer, s], &config).unwrap();
            assert_eq!(a.deltas[0] + a.deltas[1], 0);
            assert_eq!(b.deltas[0] + b.deltas[1], 0);
        }
    }
}

#[test]
fn mixed_opponents_are_reproducible_per_seed() {
    let config = TableConfig::default();
    let balanced = create_ai("balanced").unwrap();
    let random = create_ai("random").unwrap();
    for seed in 0..30 {
        let a = play_hand(seed, [balanced.as_ref(), random.as_ref()], &config).unwrap();
        let b = play_hand(seed, [balanced.as_ref(), random.as_ref()], &config).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn always_fold_loses_blinds_to_maniac() {
    let config = TableConfig::default();
    let folder = create_ai("always_fold").unwrap();
    let maniac = create_ai("maniac").unwrap();
    let total: i64 = (0..50)
        .map(|seed| play_hand(seed, [folder.as_ref(), maniac.as_ref()], &config).unwrap().deltas[0])
        .sum();
    assert!(total < 0);
}

#[test]
fn unknown_names_are_rejected() {
    assert!(create_ai("strategy/unknown").is_err());
    assert!(create_ai("").is_err());
}
