use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// Betting street in Texas Hold'em.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    pub const ALL: [Street; 4] = [Street::Preflop, Street::Flop, Street::Turn, Street::River];
}

/// Table position in heads-up play. The button posts the small blind.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Position {
    Button,
    BigBlind,
}

/// What a player asks to do. Amounts are chips *on top of* the call, so a
/// `Raise(300)` facing a 100-chip bet puts 400 chips in.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    Bet(u32),
    Raise(u32),
    AllIn,
}

/// Everything a policy may look at when acting. Built by the table for the
/// seat to act; the opponent's hole cards are never exposed.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionState {
    pub street: Street,
    pub position: Position,
    pub hole_cards: [Card; 2],
    pub board: Vec<Card>,
    /// Heuristic made-hand strength in `[0, 1]`.
    pub hand_strength: f64,
    pub pot: u32,
    pub to_call: u32,
    pub stack: u32,
    pub opponent_stack: u32,
    pub big_blind: u32,
    pub min_raise: u32,
    pub raises_this_street: u8,
    pub can_raise: bool,
}

impl DecisionState {
    /// Fraction of the final pot the call would represent; 0 when checking is free.
    pub fn pot_odds(&self) -> f64 {
        if self.to_call == 0 {
            return 0.0;
        }
        f64::from(self.to_call) / f64::from(self.pot + self.to_call)
    }

    /// Chips corresponding to `fraction` of the pot after calling, never below
    /// the minimum raise.
    pub fn pot_fraction(&self, fraction: f64) -> u32 {
        let pot_after_call = f64::from(self.pot + self.to_call);
        let chips = (pot_after_call * fraction.max(0.0)).round();
        let chips = if chips.is_finite() { chips.min(f64::from(u32::MAX)) as u32 } else { 0 };
        chips.max(self.min_raise)
    }

    pub fn in_position(&self) -> bool {
        self.position == Position::Button
    }

    pub fn facing_bet(&self) -> bool {
        self.to_call > 0
    }

    /// Raise by `chips` if raising is open, otherwise call (or check).
    pub fn raise_or_call(&self, chips: u32) -> PlayerAction {
        if !self.can_raise {
            return self.check_or_call();
        }
        if self.facing_bet() {
            PlayerAction::Raise(chips)
        } else {
            PlayerAction::Bet(chips)
        }
    }

    pub fn check_or_call(&self) -> PlayerAction {
        if self.facing_bet() {
            PlayerAction::Call
        } else {
            PlayerAction::Check
        }
    }

    pub fn check_or_fold(&self) -> PlayerAction {
        if self.facing_bet() {
            PlayerAction::Fold
        } else {
            PlayerAction::Check
        }
    }
}

/// Anything that can occupy a seat at the table.
///
/// `rng` is a per-hand stream handed in by the table so that mixed
/// strategies stay reproducible for a given hand seed.
pub trait PokerPlayer: Send + Sync {
    fn decide(&self, state: &DecisionState, rng: &mut dyn RngCore) -> PlayerAction;

    fn name(&self) -> &str;
}
