//! Flat JSON form of a [`Genome`].
//!
//! Every trait is stored under its own name; meta-genes that differ from the
//! defaults go into a `trait_meta` side map so typical payloads stay small.
//! Decoding never fails: anything missing or unusable is replaced by a
//! random value drawn from the supplied RNG.

use std::collections::BTreeMap;

use evohold_ai::{BehaviorStrategy, ParameterizedPolicy, PokerStrategy};
use rand::Rng;
use serde_json::{json, Map, Value};

use crate::containers::{BehavioralTraits, PhysicalTraits, TraitContainer};
use crate::genome::{random_preferences, Genome};
use crate::inheritance::PREFERENCE_SPEC;
use crate::traits::{GeneticTrait, TraitMeta, TraitSpec};

pub const MATE_PREFERENCES_KEY: &str = "mate_preferences";
pub const LEARNED_BEHAVIORS_KEY: &str = "learned_behaviors";
pub const BEHAVIOR_STRATEGY_KEY: &str = "behavior_strategy";
pub const POKER_STRATEGY_KEY: &str = "poker_strategy";
pub const TRAIT_META_KEY: &str = "trait_meta";

fn number(spec: &TraitSpec, value: f64) -> Value {
    if spec.discrete {
        json!(value as i64)
    } else {
        json!(value)
    }
}

fn write_container<C: TraitContainer>(
    container: &C,
    out: &mut Map<String, Value>,
    meta: &mut Map<String, Value>,
) {
    for (spec, (name, value, m)) in C::SPECS.iter().zip(container.entries()) {
        out.insert(name.to_string(), number(spec, value));
        if !m.is_default() {
            meta.insert(name.to_string(), json!(m));
        }
    }
}

fn read_container<C: TraitContainer, R: Rng + ?Sized>(
    value: &Value,
    meta: Option<&Map<String, Value>>,
    rng: &mut R,
) -> C {
    let mut container = C::random(rng);
    for spec in C::SPECS {
        if let Some(v) = value.get(spec.name).and_then(Value::as_f64) {
            container.set_value(spec.name, v);
        }
        if let Some(m) = meta.and_then(|m| m.get(spec.name)).and_then(read_meta) {
            container.set_meta(spec.name, m);
        }
    }
    container
}

fn read_meta(value: &Value) -> Option<TraitMeta> {
    let defaults = TraitMeta::default();
    let field = |name: &str, fallback: f64| value.get(name).and_then(Value::as_f64).unwrap_or(fallback);
    value.as_object()?;
    Some(
        TraitMeta {
            mutation_rate: field("mutation_rate", defaults.mutation_rate),
            mutation_strength: field("mutation_strength", defaults.mutation_strength),
            hgt_probability: field("hgt_probability", defaults.hgt_probability),
        }
        .clamped(),
    )
}

fn read_scalar_map(value: Option<&Value>, min: f64, max: f64) -> Option<BTreeMap<String, f64>> {
    let map = value?.as_object()?;
    Some(
        map.iter()
            .filter_map(|(k, v)| v.as_f64().map(|f| (k.clone(), f.clamp(min, max))))
            .collect(),
    )
}

/// Encodes a genome.
///
/// # Examples
///
/// ```
/// use evohold_genetics::genome::Genome;
/// use evohold_ai::ParameterizedPolicy;
/// use evohold_genetics::serialize::{from_value, to_value};
/// use rand::SeedableRng;
///
/// let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(3);
/// let genome = Genome::random(&mut rng);
/// let value = to_value(&genome);
/// assert!(value["size_modifier"].is_f64());
/// assert!(value["template_id"].is_i64());
///
/// let back = from_value(&value, &mut rng);
/// assert_eq!(back.poker_strategy.to_value()["kind"], value["poker_strategy"]["kind"]);
/// assert!((back.physical.size_modifier.value - genome.physical.size_modifier.value).abs() < 1e-9);
/// ```
pub fn to_value(genome: &Genome) -> Value {
    let mut out = Map::new();
    let mut meta = Map::new();
    write_container(&genome.physical, &mut out, &mut meta);
    write_container(&genome.behavioral, &mut out, &mut meta);

    out.insert(
        MATE_PREFERENCES_KEY.to_string(),
        json!(genome.mate_preferences.value),
    );
    if !genome.mate_preferences.meta.is_default() {
        meta.insert(
            MATE_PREFERENCES_KEY.to_string(),
            json!(genome.mate_preferences.meta),
        );
    }
    out.insert(
        LEARNED_BEHAVIORS_KEY.to_string(),
        json!(genome.learned_behaviors),
    );
    out.insert(
        BEHAVIOR_STRATEGY_KEY.to_string(),
        genome.behavior_strategy.to_value(),
    );
    out.insert(
        POKER_STRATEGY_KEY.to_string(),
        genome.poker_strategy.to_value(),
    );
    if !meta.is_empty() {
        out.insert(TRAIT_META_KEY.to_string(), Value::Object(meta));
    }
    Value::Object(out)
}

/// Decodes a genome, degrading gracefully: missing or malformed fields are
/// randomized, out-of-range values clamped, unknown fields ignored.
pub fn from_value<R: Rng + ?Sized>(value: &Value, rng: &mut R) -> Genome {
    let meta = value.get(TRAIT_META_KEY).and_then(Value::as_object);
    let physical: PhysicalTraits = read_container(value, meta, rng);
    let behavioral: BehavioralTraits = read_container(value, meta, rng);

    let prefs = match read_scalar_map(
        value.get(MATE_PREFERENCES_KEY),
        PREFERENCE_SPEC.min,
        PREFERENCE_SPEC.max,
    ) {
        Some(p) => p,
        None => random_preferences(rng),
    };
    let pref_meta = meta
        .and_then(|m| m.get(MATE_PREFERENCES_KEY))
        .and_then(read_meta)
        .unwrap_or_default();

    let learned = read_scalar_map(value.get(LEARNED_BEHAVIORS_KEY), -1.0, 1.0).unwrap_or_default();

    let behavior_strategy = match value.get(BEHAVIOR_STRATEGY_KEY) {
        Some(v) => BehaviorStrategy::from_value(v, rng),
        None => BehaviorStrategy::random(rng),
    };
    let poker_strategy = match value.get(POKER_STRATEGY_KEY) {
        Some(v) => PokerStrategy::from_value(v, rng),
        None => PokerStrategy::random(rng),
    };

    Genome {
        physical,
        behavioral,
        mate_preferences: GeneticTrait::with_meta(prefs, pref_meta),
        behavior_strategy,
        poker_strategy,
        learned_behaviors: learned,
    }
}
