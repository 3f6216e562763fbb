use evohold_genetics::containers::{BehavioralTraits, PhysicalTraits, TraitContainer};
use evohold_genetics::genome::Genome;
use evohold_genetics::inheritance::{inherit, inherit_all};
use evohold_genetics::mutation::{adaptive, MutationParams};
use evohold_genetics::strategy_evolution::{CrossoverParams, ReproductionKind};
use evohold_genetics::traits::{GeneticTrait, TraitMeta, TraitSpec};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const EXTREME: MutationParams = MutationParams {
    rate: 1.0,
    strength: 1.0,
};

#[test]
fn containers_stay_in_bounds_under_extreme_mutation() {
    for seed in 0..20 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut a = PhysicalTraits::random(&mut rng);
        let mut b = PhysicalTraits::random(&mut rng);
        let mut c = BehavioralTraits::random(&mut rng);
        let mut d = BehavioralTraits::random(&mut rng);
        for _ in 0..50 {
            let child = inherit_all(&a, &b, 0.5, &EXTREME, &mut rng);
            assert!(child.violations().is_empty(), "{:?}", child.violations());
            let child2 = inherit_all(&c, &d, 0.8, &EXTREME, &mut rng);
            assert!(child2.violations().is_empty(), "{:?}", child2.violations());
            (a, b) = (child, a);
            (c, d) = (child2, c);
        }
    }
}

#[test]
fn maxed_meta_multipliers_still_respect_bounds() {
    let spec = TraitSpec::continuous("fin_size", 0.5, 2.0);
    let hot = TraitMeta {
        mutation_rate: 5.0,
        mutation_strength: 5.0,
        hgt_probability: 1.0,
    };
    let mut rng = ChaCha20Rng::seed_from_u64(77);
    let mut t = GeneticTrait::with_meta(1.0, hot);
    for _ in 0..2_000 {
        t = inherit(&spec, &t, &GeneticTrait::with_meta(2.0, hot), 0.5, &EXTREME, &mut rng);
        assert!(t.is_valid(&spec), "{t:?}");
    }
}

#[test]
fn discrete_traits_remain_integers() {
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let spec = PhysicalTraits::spec("template_id").unwrap();
    for _ in 0..500 {
        let a = GeneticTrait::<i64>::random(spec, &mut rng);
        let b = GeneticTrait::<i64>::random(spec, &mut rng);
        let child = inherit(spec, &a, &b, 0.5, &EXTREME, &mut rng);
        assert!((0..=5).contains(&child.value));
    }
}

#[test]
fn zero_mutation_keeps_identical_parents_identical() {
    let mut rng = ChaCha20Rng::seed_from_u64(4);
    let none = MutationParams::none();
    let crossover = CrossoverParams::deterministic(0.5);
    for _ in 0..100 {
        let parent = Genome::random(&mut rng);
        let child = Genome::from_parents(&parent, &parent, &none, &crossover, &mut rng);
        for ((name, v1, _), (_, v2, _)) in parent.physical.entries().into_iter().zip(child.physical.entries()) {
            assert!((v1 - v2).abs() < 1e-12, "{name}");
        }
        for ((name, v1, _), (_, v2, _)) in parent.behavioral.entries().into_iter().zip(child.behavioral.entries()) {
            assert!((v1 - v2).abs() < 1e-12, "{name}");
        }
        assert_eq!(child.poker_strategy, parent.poker_strategy);
    }
}

#[test]
fn size_modifier_blend_scenario() {
    let mut rng = ChaCha20Rng::seed_from_u64(5);
    let spec = PhysicalTraits::spec("size_modifier").unwrap();
    let child = inherit(
        spec,
        &GeneticTrait::new(0.8),
        &GeneticTrait::new(1.2),
        0.5,
        &MutationParams::none(),
        &mut rng,
    );
    assert!((child.value - 1.0).abs() < 1e-12);
}

#[test]
fn offspring_genomes_are_valid_under_stress() {
    let mut rng = ChaCha20Rng::seed_from_u64(6);
    let mutation = adaptive(0.25, 0.15, 1.0);
    let crossover = CrossoverParams::new(ReproductionKind::Competitive, &mutation);
    let mut population: Vec<Genome> = (0..8).map(|_| Genome::random(&mut rng)).collect();
    for generation in 0..30 {
        let next: Vec<Genome> = (0..population.len())
            .map(|i| {
                let a = &population[i];
                let b = &population[(i + generation + 1) % population.len()];
                Genome::from_parents(a, b, &mutation, &crossover, &mut rng)
            })
            .collect();
        for g in &next {
            assert!(g.is_valid(), "{:?}", g.violations());
        }
        population = next;
    }
}
