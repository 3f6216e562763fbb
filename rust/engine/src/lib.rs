//! # evohold-engine: heads-up hand engine
//!
//! A deterministic heads-up no-limit hold'em engine used as the hand-dealing
//! and showdown collaborator of the benchmark pipeline. Given a seed and two
//! seated policies it plays one hand and reports the chip result per seat.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and deck construction
//! - [`deck`] - Deterministic deck shuffling with ChaCha20 RNG
//! - [`engine`] - One-hand runner ([`engine::play_hand`]) and its outcome
//! - [`hand`] - Hand evaluation and strength heuristics
//! - [`player`] - Actions, decision state and the [`player::PokerPlayer`] trait
//! - [`rules`] - Action validation and legalization
//! - [`seed`] - Stable seed derivation from string keys
//! - [`errors`] - Error types
//!
//! ## Deterministic Gameplay
//!
//! ```rust
//! use evohold_engine::deck::Deck;
//!
//! let mut a = Deck::shuffled(42);
//! let mut b = Deck::shuffled(42);
//! assert_eq!(a.deal_card(), b.deal_card());
//! ```

pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod hand;
pub mod player;
pub mod rules;
pub mod seed;
