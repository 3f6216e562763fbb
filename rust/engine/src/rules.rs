use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::PlayerAction as A;

/// A legal action with the exact chips it moves. `Bet`/`Raise` carry the
/// amount over the call; `Call` and `AllIn` carry the total paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidatedAction {
    Fold,
    Check,
    Call(u32),
    Bet(u32),
    Raise(u32),
    AllIn(u32),
}

impl ValidatedAction {
    /// Chips this action moves from the stack into the pot.
    pub fn chips_paid(&self, to_call: u32) -> u32 {
        match *self {
            ValidatedAction::Fold | ValidatedAction::Check => 0,
            ValidatedAction::Call(paid) | ValidatedAction::AllIn(paid) => paid,
            ValidatedAction::Bet(extra) | ValidatedAction::Raise(extra) => to_call + extra,
        }
    }
}

/// Validates a player action according to betting rules and stack size.
///
/// # Arguments
///
/// * `stack` - Player's remaining chip stack
/// * `to_call` - Amount needed to call the current bet
/// * `min_raise` - Minimum allowed bet or raise increment
/// * `action` - The action the player wishes to perform
///
/// # Errors
///
/// - [`GameError::InsufficientChips`] - check while facing a bet
/// - [`GameError::InvalidBetAmount`] - bet/raise below the minimum
///
/// # Examples
///
/// ```
/// use evohold_engine::rules::{validate_action, ValidatedAction};
/// use evohold_engine::player::PlayerAction;
///
/// let result = validate_action(1000, 50, 100, PlayerAction::Call);
/// assert!(matches!(result, Ok(ValidatedAction::Call(50))));
///
/// // All-in when the stack cannot cover the full raise
/// let result = validate_action(80, 50, 100, PlayerAction::Raise(100));
/// assert!(matches!(result, Ok(ValidatedAction::AllIn(80))));
/// ```
pub fn validate_action(
    stack: u32,
    to_call: u32,
    min_raise: u32,
    action: A,
) -> Result<ValidatedAction, GameError> {
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Check => {
            if to_call == 0 {
                Ok(ValidatedAction::Check)
            } else {
                Err(GameError::InsufficientChips)
            }
        }
        A::Call => {
            if stack <= to_call {
                Ok(ValidatedAction::AllIn(stack))
            } else {
                Ok(ValidatedAction::Call(to_call))
            }
        }
        A::Bet(amount) | A::Raise(amount) => {
            if amount.saturating_add(to_call) >= stack {
                Ok(ValidatedAction::AllIn(stack))
            } else if amount < min_raise.max(1) {
                Err(GameError::InvalidBetAmount {
                    amount,
                    minimum: min_raise.max(1),
                })
            } else if to_call == 0 {
                Ok(ValidatedAction::Bet(amount))
            } else {
                Ok(ValidatedAction::Raise(amount))
            }
        }
        A::AllIn => Ok(ValidatedAction::AllIn(stack)),
    }
}

/// Turns any requested action into the closest legal one. Never fails.
///
/// - check facing a bet folds
/// - call with nothing to call checks
/// - bet/raise while raising is closed calls (or checks)
/// - bet/raise below the minimum is bumped to the minimum
/// - anything beyond the stack is all-in
pub fn legalize(
    stack: u32,
    to_call: u32,
    min_raise: u32,
    raise_allowed: bool,
    action: A,
) -> ValidatedAction {
    let action = match action {
        A::Bet(_) | A::Raise(_) | A::AllIn if !raise_allowed && stack > to_call => A::Call,
        other => other,
    };
    match validate_action(stack, to_call, min_raise, action) {
        Ok(ValidatedAction::Call(0)) => ValidatedAction::Check,
        Ok(ValidatedAction::AllIn(0)) => ValidatedAction::Check,
        Ok(validated) => validated,
        Err(GameError::InvalidBetAmount { minimum, .. }) => {
            validate_action(stack, to_call, minimum, A::Raise(minimum))
                .unwrap_or(ValidatedAction::AllIn(stack))
        }
        Err(_) => ValidatedAction::Fold,
    }
}
