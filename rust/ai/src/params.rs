//! Named-parameter policies.
//!
//! Every strategy in this crate is a closed set of kinds, each kind declaring
//! its tunable parameters through a [`ParamSpec`] table. The
//! [`ParameterizedPolicy`] trait turns that table into random generation,
//! clamped construction, Gaussian mutation and a stable JSON form, so that a
//! new kind is a new enum variant plus a spec table.

use std::collections::BTreeMap;
use std::fmt::Debug;

use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};
use serde_json::{Value, json};

use crate::errors::StrategyError;

pub type ParamMap = BTreeMap<String, f64>;

/// Bounds and default for one named strategy parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl ParamSpec {
    pub const fn new(name: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self {
            name,
            min,
            max,
            default,
        }
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Clamps into bounds; non-finite input falls back to the default.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_finite() {
            value.clamp(self.min, self.max)
        } else {
            self.default
        }
    }

    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.random_range(self.min..=self.max)
    }
}

/// Zero-mean Gaussian draw with standard deviation `sigma`. A zero or
/// non-finite sigma yields 0.
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, sigma: f64) -> f64 {
    if !(sigma.is_finite() && sigma > 0.0) {
        return 0.0;
    }
    match Normal::new(0.0, sigma) {
        Ok(normal) => normal.sample(rng),
        Err(_) => 0.0,
    }
}

/// The closed set of kinds of one strategy family.
pub trait StrategyKind: Copy + Eq + Ord + Debug + Send + Sync + 'static {
    const ALL: &'static [Self];

    /// Stable snake_case identifier used in serialized payloads.
    fn id(self) -> &'static str;

    fn param_specs(self) -> &'static [ParamSpec];

    fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.id() == id)
    }

    fn param_spec(self, name: &str) -> Option<&'static ParamSpec> {
        self.param_specs().iter().find(|s| s.name == name)
    }
}

/// A decision policy described entirely by its kind plus a named parameter map.
pub trait ParameterizedPolicy: Clone + Debug + PartialEq + Send + Sync {
    type Kind: StrategyKind;
    type State;
    type Decision;

    fn kind(&self) -> Self::Kind;

    fn parameters(&self) -> &ParamMap;

    /// Builds a policy of `kind`. Parameters the kind does not declare are
    /// dropped, missing ones take their default and the rest are clamped.
    fn from_parts(kind: Self::Kind, params: ParamMap) -> Self;

    fn decide(&self, state: &Self::State, rng: &mut dyn RngCore) -> Self::Decision;

    fn parameter(&self, name: &str) -> f64 {
        let declared = self.kind().param_spec(name).map(|s| s.default);
        self.parameters()
            .get(name)
            .copied()
            .or(declared)
            .unwrap_or(0.0)
    }

    fn random_of_kind<R: Rng + ?Sized>(kind: Self::Kind, rng: &mut R) -> Self {
        let params = kind
            .param_specs()
            .iter()
            .map(|spec| (spec.name.to_string(), spec.random(rng)))
            .collect();
        Self::from_parts(kind, params)
    }

    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let kinds = Self::Kind::ALL;
        let kind = kinds[rng.random_range(0..kinds.len())];
        Self::random_of_kind(kind, rng)
    }

    /// Each parameter independently mutates with probability `rate`, by a
    /// Gaussian step of `strength × (max - min)`, then is clamped.
    fn mutate<R: Rng + ?Sized>(&mut self, rate: f64, strength: f64, rng: &mut R) {
        let kind = self.kind();
        let mut params = self.parameters().clone();
        for spec in kind.param_specs() {
            if rng.random::<f64>() < rate {
                let current = params.get(spec.name).copied().unwrap_or(spec.default);
                let step = gaussian(rng, strength * spec.range());
                params.insert(spec.name.to_string(), spec.clamp(current + step));
            }
        }
        *self = Self::from_parts(kind, params);
    }

    fn to_value(&self) -> Value {
        json!({
            "kind": self.kind().id(),
            "parameters": self.parameters(),
        })
    }

    /// Strict decoding: unknown kinds and non-object payloads are errors.
    /// Parameters are still clamped and defaulted.
    fn try_from_value(value: &Value) -> Result<Self, StrategyError> {
        let kind_id = value
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| StrategyError::MalformedPayload("missing \"kind\"".into()))?;
        let kind = Self::Kind::from_id(kind_id)
            .ok_or_else(|| StrategyError::UnknownKind(kind_id.to_string()))?;
        let params = value
            .get("parameters")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| v.as_f64().map(|f| (k.clone(), f)))
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self::from_parts(kind, params))
    }

    /// Lenient decoding for untrusted or partial payloads: an unknown kind
    /// becomes a random strategy and each missing parameter a random value.
    fn from_value<R: Rng + ?Sized>(value: &Value, rng: &mut R) -> Self {
        let kind = value
            .get("kind")
            .and_then(Value::as_str)
            .and_then(Self::Kind::from_id);
        let Some(kind) = kind else {
            return Self::random(rng);
        };
        let given = value.get("parameters").and_then(Value::as_object);
        let params = kind
            .param_specs()
            .iter()
            .map(|spec| {
                let v = given
                    .and_then(|m| m.get(spec.name))
                    .and_then(Value::as_f64)
                    .filter(|f| f.is_finite())
                    .unwrap_or_else(|| spec.random(rng));
                (spec.name.to_string(), v)
            })
            .collect();
        Self::from_parts(kind, params)
    }
}

/// Shared `from_parts` body: keep only declared names, default the missing,
/// clamp everything.
pub fn normalize_params(specs: &[ParamSpec], mut params: ParamMap) -> ParamMap {
    specs
        .iter()
        .map(|spec| {
            let v = params.remove(spec.name).unwrap_or(spec.default);
            (spec.name.to_string(), spec.clamp(v))
        })
        .collect()
}
