use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// Seeded 52-card deck. The same seed always yields the same deal order,
/// which is what makes duplicate deals possible.
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
    rng: ChaCha20Rng,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        // initial order is kept until shuffle is called explicitly
        Self {
            cards: full_deck(),
            position: 0,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Convenience for the common "new deck, shuffle once" case.
    pub fn shuffled(seed: u64) -> Self {
        let mut deck = Self::new_with_seed(seed);
        deck.shuffle();
        deck
    }

    pub fn shuffle(&mut self) {
        self.cards = full_deck();
        self.cards.shuffle(&mut self.rng);
        self.position = 0;
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        let card = self.cards.get(self.position).copied()?;
        self.position += 1;
        Some(card)
    }

    /// Like [`Deck::deal_card`] but reports exhaustion as a [`GameError`].
    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.deal_card().ok_or(GameError::DeckExhausted)
    }

    pub fn burn_card(&mut self) {
        let _ = self.deal_card();
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }
}
