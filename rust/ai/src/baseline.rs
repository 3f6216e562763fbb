//! Fixed reference opponents for benchmarking.
//!
//! These never evolve. Each one carries a fixed Elo anchor in the rating
//! system, so beating them moves a candidate's rating by a known yardstick.

use evohold_engine::player::{DecisionState, PlayerAction, PokerPlayer};
use rand::{Rng, RngCore};

/// Reference opponent suite used by the benchmark.
///
/// # Strategy
///
/// - `AlwaysFold`: folds to any bet, checks otherwise
/// - `AlwaysCall`: calls everything, never raises
/// - `Maniac`: raises the pot whenever allowed
/// - `Random`: uniform over fold/call/raise
/// - `TightPassive`: calls strong hands, never raises
/// - `TightAggressive`: rule-based value betting with pot-odds calls
/// - `Balanced`: tight-aggressive core mixed with bluffs and slowplays
///
/// # Example
///
/// ```rust
/// use evohold_ai::baseline::BaselineOpponent;
///
/// let opp = BaselineOpponent::from_id("balanced").expect("known opponent");
/// assert_eq!(opp.id(), "balanced");
/// assert_eq!(BaselineOpponent::ALL.len(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaselineOpponent {
    AlwaysFold,
    AlwaysCall,
    Maniac,
    Random,
    TightPassive,
    TightAggressive,
    Balanced,
}

impl BaselineOpponent {
    pub const ALL: [BaselineOpponent; 7] = [
        BaselineOpponent::AlwaysFold,
        BaselineOpponent::Random,
        BaselineOpponent::AlwaysCall,
        BaselineOpponent::Maniac,
        BaselineOpponent::TightPassive,
        BaselineOpponent::TightAggressive,
        BaselineOpponent::Balanced,
    ];

    pub fn id(self) -> &'static str {
        match self {
            BaselineOpponent::AlwaysFold => "always_fold",
            BaselineOpponent::AlwaysCall => "always_call",
            BaselineOpponent::Maniac => "maniac",
            BaselineOpponent::Random => "random",
            BaselineOpponent::TightPassive => "tight_passive",
            BaselineOpponent::TightAggressive => "tight_aggressive",
            BaselineOpponent::Balanced => "balanced",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.id() == id)
    }

    /// Rule-based decision on a 0-10 strength scale.
    ///
    /// # Arguments
    ///
    /// * `strength` - Hand strength bucket (0-10)
    /// * `s` - Decision state of the seat to act
    ///
    /// # Returns
    ///
    /// The chosen `PlayerAction`
    fn rule_based(strength: u8, s: &DecisionState) -> PlayerAction {
        if !s.facing_bet() {
            return match strength {
                9..=10 => s.raise_or_call(s.pot_fraction(2.0 / 3.0)),
                7..=8 => s.raise_or_call(s.pot_fraction(0.5)),
                _ => PlayerAction::Check,
            };
        }

        // Short stack: shove or fold
        if s.to_call > s.stack {
            return if strength >= 7 { PlayerAction::AllIn } else { PlayerAction::Fold };
        }

        let price = 1.0 - s.pot_odds();
        let cheap = |divisor: u32| s.to_call <= s.pot / divisor;
        match strength {
            9..=10 => s.raise_or_call(s.pot_fraction(0.5)),
            7..=8 => PlayerAction::Call,
            5..=6 if price >= 0.3 || cheap(4) => PlayerAction::Call,
            3..=4 if price >= 0.4 || cheap(6) => PlayerAction::Call,
            _ => PlayerAction::Fold,
        }
    }
}

fn bucket(hand_strength: f64) -> u8 {
    (hand_strength.clamp(0.0, 1.0) * 10.0).round() as u8
}

impl PokerPlayer for BaselineOpponent {
    fn decide(&self, s: &DecisionState, rng: &mut dyn RngCore) -> PlayerAction {
        let strength = bucket(s.hand_strength);
        match self {
            BaselineOpponent::AlwaysFold => s.check_or_fold(),
            BaselineOpponent::AlwaysCall => s.check_or_call(),
            BaselineOpponent::Maniac => s.raise_or_call(s.pot_fraction(1.0)),
            BaselineOpponent::Random => match rng.random_range(0..3) {
                0 => s.check_or_fold(),
                1 => s.check_or_call(),
                _ => s.raise_or_call(s.pot_fraction(rng.random_range(0.5..=1.5))),
            },
            BaselineOpponent::TightPassive => {
                if strength >= 6 || (strength >= 4 && !s.facing_bet()) {
                    s.check_or_call()
                } else {
                    s.check_or_fold()
                }
            }
            BaselineOpponent::TightAggressive => Self::rule_based(strength, s),
            BaselineOpponent::Balanced => {
                let roll: f64 = rng.random();
                if strength >= 9 && roll < 0.25 {
                    // slowplay the nuts now and then
                    return s.check_or_call();
                }
                if strength <= 3 && !s.facing_bet() && roll < 0.2 {
                    return s.raise_or_call(s.pot_fraction(0.6));
                }
                if (5..=6).contains(&strength) && !s.facing_bet() && roll < 0.3 {
                    return s.raise_or_call(s.pot_fraction(0.5));
                }
                Self::rule_based(strength, s)
            }
        }
    }

    fn name(&self) -> &str {
        self.id()
    }
}
