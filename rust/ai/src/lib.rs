//! # evohold-ai: Strategy System
//!
//! Decision policies for the evolving population: evolvable poker
//! strategies, movement behavior strategies, and the fixed reference
//! opponents the benchmark rates against.
//!
//! ## Core Components
//!
//! - [`params`] - [`ParameterizedPolicy`] trait, parameter specs and mutation
//! - [`poker`] - Evolvable poker strategies ([`PokerStrategy`])
//! - [`behavior`] - Movement behavior strategies ([`BehaviorStrategy`])
//! - [`baseline`] - Fixed reference opponents ([`BaselineOpponent`])
//! - [`create_ai`] - Factory for seatable players by name
//!
//! ## Quick Start
//!
//! ```rust
//! use evohold_ai::create_ai;
//! use evohold_engine::engine::{play_hand, TableConfig};
//!
//! let hero = create_ai("strategy/tight_aggressive").expect("known kind");
//! let villain = create_ai("always_call").expect("known opponent");
//! let outcome = play_hand(42, [hero.as_ref(), villain.as_ref()], &TableConfig::default())
//!     .expect("hand plays");
//! assert_eq!(outcome.deltas[0] + outcome.deltas[1], 0);
//! ```

pub mod baseline;
pub mod behavior;
pub mod errors;
pub mod params;
pub mod poker;

pub use baseline::BaselineOpponent;
pub use behavior::{BehaviorAction, BehaviorDecision, BehaviorKind, BehaviorState, BehaviorStrategy};
pub use errors::StrategyError;
pub use params::{ParamMap, ParamSpec, ParameterizedPolicy, StrategyKind};
pub use poker::{PokerKind, PokerStrategy};

use evohold_engine::player::PokerPlayer;

/// Prefix selecting an evolvable poker strategy with default parameters.
pub const STRATEGY_PREFIX: &str = "strategy/";

/// Factory function to create a seatable player by name.
///
/// # Arguments
///
/// * `name` - A baseline opponent id (e.g. `"balanced"`) or
///   `"strategy/<kind>"` for an evolvable strategy with default parameters
///
/// # Returns
///
/// A boxed `PokerPlayer`, or [`StrategyError::UnknownKind`]
///
/// # Example
///
/// ```rust
/// use evohold_ai::create_ai;
///
/// assert_eq!(create_ai("maniac").unwrap().name(), "maniac");
/// assert_eq!(create_ai("strategy/trapper").unwrap().name(), "trapper");
/// assert!(create_ai("gto").is_err());
/// ```
pub fn create_ai(name: &str) -> Result<Box<dyn PokerPlayer>, StrategyError> {
    if let Some(kind_id) = name.strip_prefix(STRATEGY_PREFIX) {
        let kind = PokerKind::from_id(kind_id)
            .ok_or_else(|| StrategyError::UnknownKind(kind_id.to_string()))?;
        return Ok(Box::new(PokerStrategy::from_parts(kind, ParamMap::new())));
    }
    BaselineOpponent::from_id(name)
        .map(|opp| Box::new(opp) as Box<dyn PokerPlayer>)
        .ok_or_else(|| StrategyError::UnknownKind(name.to_string()))
}
