//! Boundary checks for genome payloads that come from outside the process.
//!
//! The `sanitize_*` functions repair: they never fail and their output always
//! passes [`validate_external`]. `validate_external` only reports, so that a
//! contributor can see exactly what would be repaired.

use std::fmt;

use evohold_ai::{BehaviorKind, PokerKind, StrategyKind};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::containers::{BehavioralTraits, PhysicalTraits, TraitContainer};
use crate::inheritance::PREFERENCE_SPEC;
use crate::serialize::{
    BEHAVIOR_STRATEGY_KEY, LEARNED_BEHAVIORS_KEY, MATE_PREFERENCES_KEY, POKER_STRATEGY_KEY,
    TRAIT_META_KEY,
};
use crate::traits::{TraitMeta, TraitSpec, META_MULTIPLIER_MAX, META_MULTIPLIER_MIN};

/// Numbers with a larger magnitude are treated as garbage.
pub const MAX_ABS_NUMBER: f64 = 1e6;
/// Limit for ids, names, authors and map keys.
pub const MAX_SHORT_STRING: usize = 64;
pub const MAX_DESCRIPTION: usize = 500;
pub const MAX_DEPTH: usize = 4;
pub const MAX_KEYS: usize = 64;

const LEARNED_SPEC: TraitSpec = TraitSpec::continuous("learned_behavior", -1.0, 1.0);
const META_FIELDS: [(&str, f64, f64); 3] = [
    ("mutation_rate", META_MULTIPLIER_MIN, META_MULTIPLIER_MAX),
    ("mutation_strength", META_MULTIPLIER_MIN, META_MULTIPLIER_MAX),
    ("hgt_probability", 0.0, 1.0),
];

fn trait_spec(name: &str) -> Option<&'static TraitSpec> {
    PhysicalTraits::spec(name).or_else(|| BehavioralTraits::spec(name))
}

fn all_trait_specs() -> impl Iterator<Item = &'static TraitSpec> {
    PhysicalTraits::SPECS.iter().chain(BehavioralTraits::SPECS)
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '.' | '-')
}

/// A usable number: finite, not huge. Booleans and strings are not numbers.
pub fn sanitize_number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .filter(|x| x.is_finite() && x.abs() <= MAX_ABS_NUMBER)
}

/// Keeps only `[A-Za-z0-9 _.-]` and at most `max_len` characters.
pub fn sanitize_string(raw: &str, max_len: usize) -> String {
    raw.chars()
        .filter(|c| is_allowed_char(*c))
        .take(max_len)
        .collect::<String>()
        .trim()
        .to_string()
}

fn is_clean_key(key: &str) -> bool {
    !key.is_empty()
        && key.chars().count() <= MAX_SHORT_STRING
        && key.chars().all(is_allowed_char)
        && key.trim() == key
}

fn sanitize_scalar_map(value: &Value, spec: &TraitSpec) -> Value {
    let mut out = Map::new();
    if let Some(map) = value.as_object() {
        for (key, v) in map.iter().take(MAX_KEYS) {
            let key = sanitize_string(key, MAX_SHORT_STRING);
            if key.is_empty() {
                continue;
            }
            if let Some(x) = sanitize_number(v) {
                out.insert(key, json!(spec.clamp(x)));
            }
        }
    }
    Value::Object(out)
}

fn trait_number(spec: &TraitSpec, x: f64) -> Value {
    let x = spec.clamp(x);
    if spec.discrete {
        json!(x as i64)
    } else {
        json!(x)
    }
}

/// Repairs a strategy payload of kind family `K`. Returns `None` when the
/// kind is missing or unknown, so the caller can drop the slot and let
/// decoding pick a random strategy.
pub fn sanitize_strategy_payload<K: StrategyKind>(value: &Value) -> Option<Value> {
    let kind = value
        .get("kind")
        .and_then(Value::as_str)
        .and_then(K::from_id)?;
    let given = value.get("parameters").and_then(Value::as_object);
    let mut params = Map::new();
    for spec in kind.param_specs() {
        if let Some(x) = given.and_then(|m| m.get(spec.name)).and_then(sanitize_number) {
            params.insert(spec.name.to_string(), json!(spec.clamp(x)));
        }
    }
    Some(json!({"kind": kind.id(), "parameters": params}))
}

fn sanitize_meta(value: &Value) -> Option<Value> {
    let map = value.as_object()?;
    let defaults = TraitMeta::default();
    let pick = |name: &str, fallback: f64| map.get(name).and_then(sanitize_number).unwrap_or(fallback);
    let meta = TraitMeta {
        mutation_rate: pick("mutation_rate", defaults.mutation_rate),
        mutation_strength: pick("mutation_strength", defaults.mutation_strength),
        hgt_probability: pick("hgt_probability", defaults.hgt_probability),
    }
    .clamped();
    Some(json!(meta))
}

/// Repairs an untrusted genome payload.
///
/// Known traits are clamped into bounds; unusable values (non-numbers,
/// booleans, |x| > 1e6) become the trait's midpoint. Unknown fields are
/// dropped. Never fails.
///
/// # Examples
///
/// ```
/// use evohold_genetics::sanitize::{sanitize_genome_payload, validate_external};
/// use serde_json::json;
///
/// let dirty = json!({"size_modifier": 1e300, "aggression": true, "evil": "<script>"});
/// let clean = sanitize_genome_payload(&dirty);
/// assert!((clean["size_modifier"].as_f64().unwrap() - 1.0).abs() < 1e-12);
/// assert_eq!(clean["aggression"], 0.5);
/// assert!(clean.get("evil").is_none());
/// assert!(validate_external(&clean).is_valid());
/// ```
pub fn sanitize_genome_payload(value: &Value) -> Value {
    let mut out = Map::new();
    let Some(input) = value.as_object() else {
        return Value::Object(out);
    };

    for spec in all_trait_specs() {
        if let Some(v) = input.get(spec.name) {
            let x = sanitize_number(v).unwrap_or_else(|| spec.midpoint());
            out.insert(spec.name.to_string(), trait_number(spec, x));
        }
    }
    if let Some(v) = input.get(MATE_PREFERENCES_KEY) {
        out.insert(
            MATE_PREFERENCES_KEY.to_string(),
            sanitize_scalar_map(v, &PREFERENCE_SPEC),
        );
    }
    if let Some(v) = input.get(LEARNED_BEHAVIORS_KEY) {
        out.insert(
            LEARNED_BEHAVIORS_KEY.to_string(),
            sanitize_scalar_map(v, &LEARNED_SPEC),
        );
    }
    if let Some(s) = input
        .get(POKER_STRATEGY_KEY)
        .and_then(sanitize_strategy_payload::<PokerKind>)
    {
        out.insert(POKER_STRATEGY_KEY.to_string(), s);
    }
    if let Some(s) = input
        .get(BEHAVIOR_STRATEGY_KEY)
        .and_then(sanitize_strategy_payload::<BehaviorKind>)
    {
        out.insert(BEHAVIOR_STRATEGY_KEY.to_string(), s);
    }
    if let Some(meta) = input.get(TRAIT_META_KEY).and_then(Value::as_object) {
        let mut clean = Map::new();
        for (name, m) in meta.iter().take(MAX_KEYS) {
            if trait_spec(name).is_none() && name != MATE_PREFERENCES_KEY {
                continue;
            }
            if let Some(m) = sanitize_meta(m) {
                clean.insert(name.clone(), m);
            }
        }
        out.insert(TRAIT_META_KEY.to_string(), Value::Object(clean));
    }
    Value::Object(out)
}

/// Repairs the descriptive fields of a solution submission: `solution_id`,
/// `name`, `author`, `description` and `generation`. Other fields are dropped.
pub fn sanitize_record_metadata(value: &Value) -> Value {
    let mut out = Map::new();
    for (field, limit) in [
        ("solution_id", MAX_SHORT_STRING),
        ("name", MAX_SHORT_STRING),
        ("author", MAX_SHORT_STRING),
        ("description", MAX_DESCRIPTION),
    ] {
        if let Some(s) = value.get(field).and_then(Value::as_str) {
            let clean = sanitize_string(s, limit);
            if !clean.is_empty() {
                out.insert(field.to_string(), json!(clean));
            }
        }
    }
    let generation = value
        .get("generation")
        .and_then(sanitize_number)
        .map(|g| g.max(0.0).floor() as u64)
        .unwrap_or(0);
    out.insert("generation".to_string(), json!(generation));
    Value::Object(out)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// JSONPath-like location, e.g. `$.poker_strategy.kind`.
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
        });
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return write!(f, "ok");
        }
        for issue in &self.issues {
            writeln!(f, "{}: {}", issue.path, issue.message)?;
        }
        Ok(())
    }
}

fn check_shape(value: &Value, path: &str, depth: usize, report: &mut ValidationReport) {
    if depth > MAX_DEPTH {
        report.push(path, format!("nesting deeper than {MAX_DEPTH} levels"));
        return;
    }
    match value {
        Value::Object(map) => {
            if map.len() > MAX_KEYS {
                report.push(path, format!("{} keys exceed the limit of {MAX_KEYS}", map.len()));
            }
            for (k, v) in map {
                check_shape(v, &format!("{path}.{k}"), depth + 1, report);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                check_shape(v, &format!("{path}[{i}]"), depth + 1, report);
            }
        }
        _ => {}
    }
}

fn check_number(value: &Value, path: &str, spec: &TraitSpec, report: &mut ValidationReport) {
    if value.is_boolean() {
        report.push(path, "boolean where a number is expected");
        return;
    }
    let Some(x) = value.as_f64() else {
        report.push(path, "expected a number");
        return;
    };
    if x.abs() > MAX_ABS_NUMBER {
        report.push(path, format!("magnitude {x} exceeds {MAX_ABS_NUMBER}"));
    } else if x < spec.min || x > spec.max {
        report.push(path, format!("{x} outside [{}, {}]", spec.min, spec.max));
    } else if spec.discrete && x.fract() != 0.0 {
        report.push(path, format!("{x} is not an integer"));
    }
}

fn check_scalar_map(value: &Value, path: &str, spec: &TraitSpec, report: &mut ValidationReport) {
    let Some(map) = value.as_object() else {
        report.push(path, "expected an object");
        return;
    };
    for (key, v) in map {
        let p = format!("{path}.{key}");
        if !is_clean_key(key) {
            report.push(p.clone(), "key must be 1-64 characters of [A-Za-z0-9 _.-]");
        }
        check_number(v, &p, spec, report);
    }
}

fn check_strategy<K: StrategyKind>(value: &Value, path: &str, report: &mut ValidationReport) {
    let Some(kind_id) = value.get("kind").and_then(Value::as_str) else {
        report.push(format!("{path}.kind"), "missing strategy kind");
        return;
    };
    let Some(kind) = K::from_id(kind_id) else {
        report.push(format!("{path}.kind"), format!("unknown strategy kind {kind_id:?}"));
        return;
    };
    let Some(params) = value.get("parameters") else {
        return;
    };
    let Some(params) = params.as_object() else {
        report.push(format!("{path}.parameters"), "expected an object");
        return;
    };
    for (name, v) in params {
        let p = format!("{path}.parameters.{name}");
        match kind.param_spec(name) {
            Some(ps) => {
                let bounds = TraitSpec::continuous(ps.name, ps.min, ps.max);
                check_number(v, &p, &bounds, report);
            }
            None => report.push(p, format!("not a parameter of {}", kind.id())),
        }
    }
}

fn check_meta(value: &Value, path: &str, report: &mut ValidationReport) {
    let Some(map) = value.as_object() else {
        report.push(path, "expected an object");
        return;
    };
    for (field, v) in map {
        let p = format!("{path}.{field}");
        match META_FIELDS.iter().find(|(name, _, _)| *name == field.as_str()) {
            Some(&(name, min, max)) => {
                check_number(v, &p, &TraitSpec::continuous(name, min, max), report)
            }
            None => report.push(p, "unknown meta field"),
        }
    }
}

/// Strict validation of an external genome payload. Lists every problem
/// without repairing anything.
pub fn validate_external(value: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();
    let Some(map) = value.as_object() else {
        report.push("$", "expected a JSON object");
        return report;
    };
    check_shape(value, "$", 1, &mut report);

    for (key, v) in map {
        let path = format!("$.{key}");
        if let Some(spec) = trait_spec(key) {
            check_number(v, &path, spec, &mut report);
            continue;
        }
        match key.as_str() {
            MATE_PREFERENCES_KEY => check_scalar_map(v, &path, &PREFERENCE_SPEC, &mut report),
            LEARNED_BEHAVIORS_KEY => check_scalar_map(v, &path, &LEARNED_SPEC, &mut report),
            POKER_STRATEGY_KEY => check_strategy::<PokerKind>(v, &path, &mut report),
            BEHAVIOR_STRATEGY_KEY => check_strategy::<BehaviorKind>(v, &path, &mut report),
            TRAIT_META_KEY => match v.as_object() {
                Some(metas) => {
                    for (name, m) in metas {
                        let p = format!("{path}.{name}");
                        if trait_spec(name).is_none() && name != MATE_PREFERENCES_KEY {
                            report.push(p, "meta for an unknown trait");
                        } else {
                            check_meta(m, &p, &mut report);
                        }
                    }
                }
                None => report.push(path, "expected an object"),
            },
            _ => report.push(path, "unknown field"),
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_are_filtered_and_truncated() {
        assert_eq!(sanitize_string("<b>Ann</b>; DROP", 64), "bAnnb DROP");
        assert_eq!(sanitize_string(&"x".repeat(100), 64).len(), 64);
    }

    #[test]
    fn numbers_reject_bools_and_huge_values() {
        assert_eq!(sanitize_number(&json!(true)), None);
        assert_eq!(sanitize_number(&json!(2e6)), None);
        assert_eq!(sanitize_number(&json!("1.0")), None);
        assert_eq!(sanitize_number(&json!(-3)), Some(-3.0));
    }

    #[test]
    fn unknown_strategy_kind_is_dropped() {
        let clean = sanitize_genome_payload(&json!({
            "poker_strategy": {"kind": "martingale", "parameters": {}},
            "behavior_strategy": {"kind": "social", "parameters": {"min_allies": 400, "wings": 1}},
        }));
        assert!(clean.get("poker_strategy").is_none());
        assert_eq!(clean["behavior_strategy"]["parameters"]["min_allies"], 8.0);
        assert!(clean["behavior_strategy"]["parameters"].get("wings").is_none());
    }

    #[test]
    fn metadata_is_bounded() {
        let clean = sanitize_record_metadata(&json!({
            "name": "Shark<>".repeat(20),
            "author": 12,
            "description": "d".repeat(900),
            "generation": -4,
            "extra": "gone",
        }));
        assert!(clean["name"].as_str().unwrap().len() <= MAX_SHORT_STRING);
        assert!(clean.get("author").is_none());
        assert_eq!(clean["description"].as_str().unwrap().len(), MAX_DESCRIPTION);
        assert_eq!(clean["generation"], 0);
        assert!(clean.get("extra").is_none());
    }

    #[test]
    fn validation_reports_each_problem_with_a_path() {
        let report = validate_external(&json!({
            "size_modifier": 4.0,
            "template_id": 1.5,
            "aggression": false,
            "wings": 2,
            "poker_strategy": {"kind": "pot_odds", "parameters": {"bet_fraction": 9.0}},
        }));
        let paths: Vec<&str> = report.issues.iter().map(|i| i.path.as_str()).collect();
        assert!(paths.contains(&"$.size_modifier"));
        assert!(paths.contains(&"$.template_id"));
        assert!(paths.contains(&"$.aggression"));
        assert!(paths.contains(&"$.wings"));
        assert!(paths.contains(&"$.poker_strategy.parameters.bet_fraction"));
        assert_eq!(report.issues.len(), 5);
    }

    #[test]
    fn deep_nesting_is_reported() {
        let report = validate_external(&json!({"learned_behaviors": {"a": {"b": {"c": {"d": 1}}}}}));
        assert!(report
            .issues
            .iter()
            .any(|i| i.message.contains("nesting")));
    }
}
