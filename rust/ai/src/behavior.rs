//! Movement/behavior strategies consumed by the simulation loop.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::params::{normalize_params, ParamMap, ParamSpec, ParameterizedPolicy, StrategyKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BehaviorKind {
    Forager,
    Cautious,
    Social,
    Opportunist,
}

const FORAGER: &[ParamSpec] = &[
    ParamSpec::new("food_priority", 0.3, 1.0, 0.7),
    ParamSpec::new("hunger_threshold", 0.2, 0.9, 0.6),
    ParamSpec::new("explore_rate", 0.0, 0.5, 0.15),
];

const CAUTIOUS: &[ParamSpec] = &[
    ParamSpec::new("flee_distance", 50.0, 400.0, 150.0),
    ParamSpec::new("food_priority", 0.1, 0.8, 0.4),
    ParamSpec::new("rest_threshold", 0.1, 0.6, 0.3),
];

const SOCIAL: &[ParamSpec] = &[
    ParamSpec::new("school_weight", 0.3, 1.0, 0.7),
    ParamSpec::new("min_allies", 1.0, 8.0, 3.0),
    ParamSpec::new("flee_distance", 30.0, 300.0, 100.0),
];

const OPPORTUNIST: &[ParamSpec] = &[
    ParamSpec::new("poker_appetite", 0.2, 1.0, 0.6),
    ParamSpec::new("energy_floor", 0.1, 0.7, 0.35),
    ParamSpec::new("flee_distance", 30.0, 300.0, 80.0),
];

impl StrategyKind for BehaviorKind {
    const ALL: &'static [Self] = &[
        BehaviorKind::Forager,
        BehaviorKind::Cautious,
        BehaviorKind::Social,
        BehaviorKind::Opportunist,
    ];

    fn id(self) -> &'static str {
        match self {
            BehaviorKind::Forager => "forager",
            BehaviorKind::Cautious => "cautious",
            BehaviorKind::Social => "social",
            BehaviorKind::Opportunist => "opportunist",
        }
    }

    fn param_specs(self) -> &'static [ParamSpec] {
        match self {
            BehaviorKind::Forager => FORAGER,
            BehaviorKind::Cautious => CAUTIOUS,
            BehaviorKind::Social => SOCIAL,
            BehaviorKind::Opportunist => OPPORTUNIST,
        }
    }
}

/// What an entity perceives this tick. Energy is normalized to `[0, 1]`;
/// distances are in world units, `None` when nothing is in range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorState {
    pub energy: f64,
    pub nearest_food_distance: Option<f64>,
    pub nearest_threat_distance: Option<f64>,
    pub nearby_allies: u32,
    pub poker_opportunity: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorAction {
    Forage,
    Flee,
    School,
    Explore,
    SeekPoker,
    Rest,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorDecision {
    pub action: BehaviorAction,
    /// Movement urgency in `[0, 1]`.
    pub intensity: f64,
}

impl BehaviorDecision {
    fn new(action: BehaviorAction, intensity: f64) -> Self {
        let intensity = if intensity.is_finite() { intensity.clamp(0.0, 1.0) } else { 0.0 };
        Self { action, intensity }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorStrategy {
    kind: BehaviorKind,
    parameters: ParamMap,
}

impl BehaviorStrategy {
    fn threatened(&self, s: &BehaviorState) -> Option<f64> {
        let flee = self.parameter("flee_distance");
        s.nearest_threat_distance
            .filter(|d| *d < flee)
            .map(|d| 1.0 - d / flee)
    }

    fn forage_or(&self, s: &BehaviorState, fallback: BehaviorDecision) -> BehaviorDecision {
        match s.nearest_food_distance {
            Some(_) => BehaviorDecision::new(
                BehaviorAction::Forage,
                self.parameter("food_priority") * (1.0 - s.energy * 0.5),
            ),
            None => fallback,
        }
    }
}

impl ParameterizedPolicy for BehaviorStrategy {
    type Kind = BehaviorKind;
    type State = BehaviorState;
    type Decision = BehaviorDecision;

    fn kind(&self) -> BehaviorKind {
        self.kind
    }

    fn parameters(&self) -> &ParamMap {
        &self.parameters
    }

    fn from_parts(kind: BehaviorKind, params: ParamMap) -> Self {
        Self {
            kind,
            parameters: normalize_params(kind.param_specs(), params),
        }
    }

    fn decide(&self, s: &BehaviorState, rng: &mut dyn RngCore) -> BehaviorDecision {
        let explore = BehaviorDecision::new(BehaviorAction::Explore, 0.3);
        match self.kind {
            BehaviorKind::Forager => {
                if s.energy < self.parameter("hunger_threshold") {
                    return self.forage_or(s, explore);
                }
                if rng.random_bool(self.parameter("explore_rate")) {
                    return BehaviorDecision::new(BehaviorAction::Explore, 0.5);
                }
                self.forage_or(s, explore)
            }
            BehaviorKind::Cautious => {
                if let Some(urgency) = self.threatened(s) {
                    return BehaviorDecision::new(BehaviorAction::Flee, 0.5 + urgency * 0.5);
                }
                if s.energy < self.parameter("rest_threshold") && s.nearest_food_distance.is_none() {
                    return BehaviorDecision::new(BehaviorAction::Rest, 0.1);
                }
                self.forage_or(s, BehaviorDecision::new(BehaviorAction::Explore, 0.2))
            }
            BehaviorKind::Social => {
                if let Some(urgency) = self.threatened(s) {
                    return BehaviorDecision::new(BehaviorAction::Flee, urgency);
                }
                if f64::from(s.nearby_allies) < self.parameter("min_allies") {
                    return BehaviorDecision::new(
                        BehaviorAction::School,
                        self.parameter("school_weight"),
                    );
                }
                self.forage_or(s, BehaviorDecision::new(BehaviorAction::School, 0.3))
            }
            BehaviorKind::Opportunist => {
                if let Some(urgency) = self.threatened(s) {
                    return BehaviorDecision::new(BehaviorAction::Flee, urgency);
                }
                if s.poker_opportunity
                    && s.energy >= self.parameter("energy_floor")
                    && rng.random_bool(self.parameter("poker_appetite"))
                {
                    return BehaviorDecision::new(BehaviorAction::SeekPoker, s.energy);
                }
                self.forage_or(s, explore)
            }
        }
    }
}
