//! Evolvable poker strategies.
//!
//! Each [`PokerKind`] is a small rule set whose thresholds and sizings are
//! named parameters, so crossover and mutation can move them while the rule
//! skeleton stays fixed.

use evohold_engine::player::{DecisionState, PlayerAction, PokerPlayer, Position, Street};
use rand::{Rng, RngCore};

use crate::params::{normalize_params, ParamMap, ParamSpec, ParameterizedPolicy, StrategyKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PokerKind {
    TightAggressive,
    LooseAggressive,
    PotOdds,
    Positional,
    Trapper,
}

const TIGHT_AGGRESSIVE: &[ParamSpec] = &[
    ParamSpec::new("entry_threshold", 0.3, 0.8, 0.5),
    ParamSpec::new("value_threshold", 0.5, 0.95, 0.7),
    ParamSpec::new("bet_fraction", 0.3, 1.5, 0.75),
    ParamSpec::new("bluff_frequency", 0.0, 0.3, 0.05),
];

const LOOSE_AGGRESSIVE: &[ParamSpec] = &[
    ParamSpec::new("entry_threshold", 0.1, 0.5, 0.25),
    ParamSpec::new("aggression", 0.3, 1.0, 0.6),
    ParamSpec::new("bet_fraction", 0.5, 2.0, 1.0),
    ParamSpec::new("bluff_frequency", 0.05, 0.5, 0.2),
];

const POT_ODDS: &[ParamSpec] = &[
    ParamSpec::new("equity_margin", -0.1, 0.2, 0.05),
    ParamSpec::new("value_threshold", 0.55, 0.95, 0.75),
    ParamSpec::new("bet_fraction", 0.3, 1.2, 0.6),
];

const POSITIONAL: &[ParamSpec] = &[
    ParamSpec::new("button_threshold", 0.1, 0.6, 0.3),
    ParamSpec::new("blind_threshold", 0.3, 0.8, 0.5),
    ParamSpec::new("steal_frequency", 0.0, 0.6, 0.3),
    ParamSpec::new("bet_fraction", 0.3, 1.5, 0.7),
];

const TRAPPER: &[ParamSpec] = &[
    ParamSpec::new("trap_threshold", 0.6, 0.95, 0.8),
    ParamSpec::new("check_raise_frequency", 0.0, 0.8, 0.4),
    ParamSpec::new("call_threshold", 0.2, 0.6, 0.35),
    ParamSpec::new("bet_fraction", 0.3, 1.5, 0.8),
];

impl StrategyKind for PokerKind {
    const ALL: &'static [Self] = &[
        PokerKind::TightAggressive,
        PokerKind::LooseAggressive,
        PokerKind::PotOdds,
        PokerKind::Positional,
        PokerKind::Trapper,
    ];

    fn id(self) -> &'static str {
        match self {
            PokerKind::TightAggressive => "tight_aggressive",
            PokerKind::LooseAggressive => "loose_aggressive",
            PokerKind::PotOdds => "pot_odds",
            PokerKind::Positional => "positional",
            PokerKind::Trapper => "trapper",
        }
    }

    fn param_specs(self) -> &'static [ParamSpec] {
        match self {
            PokerKind::TightAggressive => TIGHT_AGGRESSIVE,
            PokerKind::LooseAggressive => LOOSE_AGGRESSIVE,
            PokerKind::PotOdds => POT_ODDS,
            PokerKind::Positional => POSITIONAL,
            PokerKind::Trapper => TRAPPER,
        }
    }
}

/// An evolvable heads-up poker policy.
///
/// # Examples
///
/// ```rust
/// use evohold_ai::params::ParameterizedPolicy;
/// use evohold_ai::poker::{PokerKind, PokerStrategy};
///
/// let s = PokerStrategy::from_parts(PokerKind::PotOdds, Default::default());
/// assert_eq!(s.parameter("bet_fraction"), 0.6);
/// assert_eq!(s.to_value()["kind"], "pot_odds");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PokerStrategy {
    kind: PokerKind,
    parameters: ParamMap,
}

impl PokerStrategy {
    fn tight_aggressive(&self, s: &DecisionState, rng: &mut dyn RngCore) -> PlayerAction {
        let strength = s.hand_strength;
        if strength >= self.parameter("value_threshold") {
            return s.raise_or_call(s.pot_fraction(self.parameter("bet_fraction")));
        }
        if strength >= self.parameter("entry_threshold") {
            return if !s.facing_bet() || strength >= s.pot_odds() {
                s.check_or_call()
            } else {
                PlayerAction::Fold
            };
        }
        if !s.facing_bet() && rng.random_bool(self.parameter("bluff_frequency")) {
            return s.raise_or_call(s.pot_fraction(self.parameter("bet_fraction")));
        }
        s.check_or_fold()
    }

    fn loose_aggressive(&self, s: &DecisionState, rng: &mut dyn RngCore) -> PlayerAction {
        let sizing = s.pot_fraction(self.parameter("bet_fraction"));
        if s.hand_strength >= self.parameter("entry_threshold") {
            if rng.random_bool(self.parameter("aggression")) {
                return s.raise_or_call(sizing);
            }
            return s.check_or_call();
        }
        if rng.random_bool(self.parameter("bluff_frequency")) {
            return s.raise_or_call(sizing);
        }
        s.check_or_fold()
    }

    fn pot_odds(&self, s: &DecisionState) -> PlayerAction {
        if s.hand_strength >= self.parameter("value_threshold") {
            return s.raise_or_call(s.pot_fraction(self.parameter("bet_fraction")));
        }
        if !s.facing_bet() {
            return PlayerAction::Check;
        }
        if s.hand_strength >= s.pot_odds() + self.parameter("equity_margin") {
            PlayerAction::Call
        } else {
            PlayerAction::Fold
        }
    }

    fn positional(&self, s: &DecisionState, rng: &mut dyn RngCore) -> PlayerAction {
        let threshold = match s.position {
            Position::Button => self.parameter("button_threshold"),
            Position::BigBlind => self.parameter("blind_threshold"),
        };
        let sizing = s.pot_fraction(self.parameter("bet_fraction"));
        if s.hand_strength >= threshold {
            // well above the threshold plays for value
            if s.hand_strength >= (threshold + 0.3).min(0.95) {
                return s.raise_or_call(sizing);
            }
            return s.check_or_call();
        }
        if s.in_position() && !s.facing_bet() && rng.random_bool(self.parameter("steal_frequency")) {
            return s.raise_or_call(sizing);
        }
        s.check_or_fold()
    }

    fn trapper(&self, s: &DecisionState, rng: &mut dyn RngCore) -> PlayerAction {
        let sizing = s.pot_fraction(self.parameter("bet_fraction"));
        if s.hand_strength >= self.parameter("trap_threshold") {
            if s.street == Street::River {
                return s.raise_or_call(sizing);
            }
            if s.facing_bet() {
                if rng.random_bool(self.parameter("check_raise_frequency")) {
                    return s.raise_or_call(sizing);
                }
                return PlayerAction::Call;
            }
            return PlayerAction::Check;
        }
        if s.hand_strength >= self.parameter("call_threshold") {
            return if s.hand_strength >= s.pot_odds() {
                s.check_or_call()
            } else {
                s.check_or_fold()
            };
        }
        s.check_or_fold()
    }
}

impl ParameterizedPolicy for PokerStrategy {
    type Kind = PokerKind;
    type State = DecisionState;
    type Decision = PlayerAction;

    fn kind(&self) -> PokerKind {
        self.kind
    }

    fn parameters(&self) -> &ParamMap {
        &self.parameters
    }

    fn from_parts(kind: PokerKind, params: ParamMap) -> Self {
        Self {
            kind,
            parameters: normalize_params(kind.param_specs(), params),
        }
    }

    fn decide(&self, state: &DecisionState, rng: &mut dyn RngCore) -> PlayerAction {
        match self.kind {
            PokerKind::TightAggressive => self.tight_aggressive(state, rng),
            PokerKind::LooseAggressive => self.loose_aggressive(state, rng),
            PokerKind::PotOdds => self.pot_odds(state),
            PokerKind::Positional => self.positional(state, rng),
            PokerKind::Trapper => self.trapper(state, rng),
        }
    }
}

impl PokerPlayer for PokerStrategy {
    fn decide(&self, state: &DecisionState, rng: &mut dyn RngCore) -> PlayerAction {
        ParameterizedPolicy::decide(self, state, rng)
    }

    fn name(&self) -> &str {
        self.kind.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evohold_engine::cards::{Card, Rank, Suit};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn state(strength: f64, to_call: u32) -> DecisionState {
        DecisionState {
            street: Street::Flop,
            position: Position::BigBlind,
            hole_cards: [
                Card::new(Rank::Ace, Suit::Spades),
                Card::new(Rank::King, Suit::Spades),
            ],
            board: vec![],
            hand_strength: strength,
            pot: 400,
            to_call,
            stack: 9_000,
            opponent_stack: 9_000,
            big_blind: 100,
            min_raise: 100,
            raises_this_street: 0,
            can_raise: true,
        }
    }

    fn defaults(kind: PokerKind) -> PokerStrategy {
        PokerStrategy::from_parts(kind, ParamMap::new())
    }

    #[test]
    fn tight_aggressive_folds_trash_to_a_bet() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let s = defaults(PokerKind::TightAggressive);
        let action = ParameterizedPolicy::decide(&s, &state(0.1, 200), &mut rng);
        assert_eq!(action, PlayerAction::Fold);
    }

    #[test]
    fn value_hands_raise() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for kind in [PokerKind::TightAggressive, PokerKind::PotOdds] {
            let action = ParameterizedPolicy::decide(&defaults(kind), &state(0.97, 200), &mut rng);
            assert!(matches!(action, PlayerAction::Raise(_)), "{kind:?} -> {action:?}");
        }
    }

    #[test]
    fn pot_odds_calls_with_enough_equity() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let s = defaults(PokerKind::PotOdds);
        // pot odds 200/600 = 0.33, margin 0.05
        let call = ParameterizedPolicy::decide(&s, &state(0.45, 200), &mut rng);
        let fold = ParameterizedPolicy::decide(&s, &state(0.30, 200), &mut rng);
        assert_eq!(call, PlayerAction::Call);
        assert_eq!(fold, PlayerAction::Fold);
    }

    #[test]
    fn trapper_slowplays_before_the_river() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let s = defaults(PokerKind::Trapper);
        assert_eq!(
            ParameterizedPolicy::decide(&s, &state(0.9, 0), &mut rng),
            PlayerAction::Check
        );
        let mut river = state(0.9, 0);
        river.street = Street::River;
        assert!(matches!(
            ParameterizedPolicy::decide(&s, &river, &mut rng),
            PlayerAction::Bet(_)
        ));
    }

    #[test]
    fn raises_respect_closed_action() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut st = state(0.99, 200);
        st.can_raise = false;
        for &kind in PokerKind::ALL {
            let action = ParameterizedPolicy::decide(&defaults(kind), &st, &mut rng);
            assert!(
                !matches!(action, PlayerAction::Raise(_) | PlayerAction::Bet(_)),
                "{kind:?} raised while closed"
            );
        }
    }

    #[test]
    fn kind_ids_round_trip() {
        for &kind in PokerKind::ALL {
            assert_eq!(PokerKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(PokerKind::from_id("gto_solver"), None);
    }

    #[test]
    fn every_default_lies_within_bounds() {
        for &kind in PokerKind::ALL {
            for spec in kind.param_specs() {
                assert!(spec.min < spec.max, "{}", spec.name);
                assert!((spec.min..=spec.max).contains(&spec.default), "{}", spec.name);
            }
        }
    }
}
