use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::hand::{evaluate_hand, relative_strength};
use crate::player::{DecisionState, PokerPlayer, Position, Street};
use crate::rules::{legalize, ValidatedAction};
use crate::seed::derive_seed;

pub const BIG_BLIND: u32 = 100;
pub const SMALL_BLIND: u32 = 50;
/// 100 big blinds.
pub const STARTING_STACK: u32 = 10_000;
pub const MAX_RAISES_PER_STREET: u8 = 4;

/// Upper bound on decisions in one betting round; the raise cap keeps real
/// rounds far below this.
const MAX_DECISIONS_PER_ROUND: usize = 64;

/// Stakes and limits for one heads-up hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    pub max_raises_per_street: u8,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            starting_stack: STARTING_STACK,
            small_blind: SMALL_BLIND,
            big_blind: BIG_BLIND,
            max_raises_per_street: MAX_RAISES_PER_STREET,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.big_blind == 0 {
            return Err(GameError::InvalidConfig("big_blind must be > 0".into()));
        }
        if self.small_blind > self.big_blind {
            return Err(GameError::InvalidConfig(
                "small_blind must not exceed big_blind".into(),
            ));
        }
        if self.starting_stack < self.big_blind {
            return Err(GameError::InvalidConfig(
                "starting_stack must cover the big blind".into(),
            ));
        }
        Ok(())
    }
}

/// One legal action taken during a hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seat: usize,
    pub street: Street,
    pub action: ValidatedAction,
}

/// Result of one hand: per-seat chip deltas (summing to zero) plus enough
/// detail to audit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandOutcome {
    pub seed: u64,
    pub deltas: [i64; 2],
    pub pot: u32,
    /// Seats that won chips at the end; both seats on a split pot.
    pub winners: Vec<usize>,
    pub showdown: bool,
    pub board: Vec<Card>,
    pub actions: Vec<ActionRecord>,
    pub big_blind: u32,
}

impl HandOutcome {
    /// Net result of `seat` in big blinds.
    pub fn bb_delta(&self, seat: usize) -> f64 {
        self.deltas[seat] as f64 / f64::from(self.big_blind)
    }
}

/// Deals and plays one heads-up hand.
///
/// Seat 0 holds the button and posts the small blind; seat 1 posts the big
/// blind. Preflop the button acts first, on later streets the big blind does.
/// The deck order depends only on `seed`, so replaying a seed with the seats
/// swapped hands each player the cards the other held (a duplicate deal).
///
/// # Errors
///
/// Returns [`GameError::InvalidConfig`] for unusable stakes. Player decisions
/// can never produce an error: they are legalized first.
///
/// # Examples
///
/// ```
/// use evohold_engine::engine::{play_hand, TableConfig};
/// use evohold_engine::player::{DecisionState, PlayerAction, PokerPlayer};
///
/// struct Caller;
/// impl PokerPlayer for Caller {
///     fn decide(&self, s: &DecisionState, _: &mut dyn rand::RngCore) -> PlayerAction {
///         s.check_or_call()
///     }
///     fn name(&self) -> &str { "caller" }
/// }
///
/// let outcome = play_hand(42, [&Caller, &Caller], &TableConfig::default()).unwrap();
/// assert_eq!(outcome.deltas[0] + outcome.deltas[1], 0);
/// assert!(outcome.showdown);
/// ```
pub fn play_hand(
    seed: u64,
    players: [&dyn PokerPlayer; 2],
    config: &TableConfig,
) -> Result<HandOutcome, GameError> {
    config.validate()?;
    let mut deck = Deck::shuffled(seed);
    let seed_bytes = seed.to_le_bytes();
    let mut decisions =
        ChaCha20Rng::seed_from_u64(derive_seed([b"decisions".as_slice(), seed_bytes.as_slice()]));

    let mut hand = HandState::new(config);
    for _ in 0..2 {
        for seat in 0..2 {
            let card = deck.draw()?;
            hand.give_card(seat, card)?;
        }
    }
    let holes = hand.hole_cards()?;
    hand.post(0, config.small_blind);
    hand.post(1, config.big_blind);

    for street in Street::ALL {
        match street {
            Street::Preflop => {}
            Street::Flop => {
                deck.burn_card();
                for _ in 0..3 {
                    hand.board.push(deck.draw()?);
                }
            }
            Street::Turn | Street::River => {
                deck.burn_card();
                hand.board.push(deck.draw()?);
            }
        }
        hand.street_committed = [0, 0];
        if street == Street::Preflop {
            hand.street_committed = hand.committed;
        }
        if hand.stacks.contains(&0) {
            continue;
        }
        if let Some(folder) = hand.betting_round(street, &holes, players, &mut decisions, config) {
            return Ok(hand.finish(seed, vec![1 - folder], false, config));
        }
    }

    hand.return_uncalled();
    let mut seven: [Vec<Card>; 2] = [holes[0].to_vec(), holes[1].to_vec()];
    for cards in &mut seven {
        cards.extend_from_slice(&hand.board);
    }
    let winners = match evaluate_hand(&seven[0]).cmp(&evaluate_hand(&seven[1])) {
        std::cmp::Ordering::Greater => vec![0],
        std::cmp::Ordering::Less => vec![1],
        std::cmp::Ordering::Equal => vec![0, 1],
    };
    Ok(hand.finish(seed, winners, true, config))
}

struct HandState {
    stacks: [u32; 2],
    committed: [u32; 2],
    street_committed: [u32; 2],
    hole: [[Option<Card>; 2]; 2],
    board: Vec<Card>,
    actions: Vec<ActionRecord>,
    starting_stack: u32,
}

impl HandState {
    fn new(config: &TableConfig) -> Self {
        Self {
            stacks: [config.starting_stack; 2],
            committed: [0, 0],
            street_committed: [0, 0],
            hole: [[None, None], [None, None]],
            board: Vec::with_capacity(5),
            actions: Vec::new(),
            starting_stack: config.starting_stack,
        }
    }

    fn give_card(&mut self, seat: usize, card: Card) -> Result<(), GameError> {
        let slot = self.hole[seat]
            .iter_mut()
            .find(|c| c.is_none())
            .ok_or(GameError::HoleCardsFull)?;
        *slot = Some(card);
        Ok(())
    }

    fn hole_cards(&self) -> Result<[[Card; 2]; 2], GameError> {
        let seat = |s: usize| match self.hole[s] {
            [Some(a), Some(b)] => Ok([a, b]),
            _ => Err(GameError::DeckExhausted),
        };
        Ok([seat(0)?, seat(1)?])
    }

    fn pot(&self) -> u32 {
        self.committed[0] + self.committed[1]
    }

    fn post(&mut self, seat: usize, amount: u32) {
        let paid = amount.min(self.stacks[seat]);
        self.stacks[seat] -= paid;
        self.committed[seat] += paid;
        self.street_committed[seat] += paid;
    }

    /// Runs one betting round. Returns the seat that folded, if any.
    fn betting_round(
        &mut self,
        street: Street,
        holes: &[[Card; 2]; 2],
        players: [&dyn PokerPlayer; 2],
        rng: &mut ChaCha20Rng,
        config: &TableConfig,
    ) -> Option<usize> {
        let mut actor = if street == Street::Preflop { 0 } else { 1 };
        let mut acted = [false, false];
        let mut raises = 0u8;
        let mut min_raise = config.big_blind;

        for _ in 0..MAX_DECISIONS_PER_ROUND {
            let opp = 1 - actor;
            let to_call = self.street_committed[opp].saturating_sub(self.street_committed[actor]);

            if self.stacks[actor] == 0 || (self.stacks[opp] == 0 && to_call == 0) {
                acted[actor] = true;
            } else {
                let can_raise = raises < config.max_raises_per_street && self.stacks[opp] > 0;
                let state = DecisionState {
                    street,
                    position: if actor == 0 { Position::Button } else { Position::BigBlind },
                    hole_cards: holes[actor],
                    board: self.board.clone(),
                    hand_strength: relative_strength(holes[actor], &self.board),
                    pot: self.pot(),
                    to_call,
                    stack: self.stacks[actor],
                    opponent_stack: self.stacks[opp],
                    big_blind: config.big_blind,
                    min_raise,
                    raises_this_street: raises,
                    can_raise,
                };
                let requested = players[actor].decide(&state, rng);
                let action = legalize(self.stacks[actor], to_call, min_raise, can_raise, requested);
                self.actions.push(ActionRecord {
                    seat: actor,
                    street,
                    action: action.clone(),
                });

                if action == ValidatedAction::Fold {
                    return Some(actor);
                }
                let paid = action.chips_paid(to_call).min(self.stacks[actor]);
                self.post(actor, paid);
                if paid > to_call {
                    let increment = paid - to_call;
                    if increment >= min_raise {
                        min_raise = increment;
                    }
                    raises = raises.saturating_add(1);
                    acted[opp] = false;
                }
                acted[actor] = true;
            }

            let settled = self.street_committed[0] == self.street_committed[1]
                || self.stacks[0] == 0
                || self.stacks[1] == 0;
            if acted[0] && acted[1] && settled {
                break;
            }
            actor = opp;
        }
        None
    }

    /// Gives back the part of a bet the all-in opponent could not match.
    fn return_uncalled(&mut self) {
        let (hi, lo) = if self.committed[0] >= self.committed[1] { (0, 1) } else { (1, 0) };
        let excess = self.committed[hi] - self.committed[lo];
        if excess > 0 {
            self.committed[hi] -= excess;
            self.stacks[hi] += excess;
        }
    }

    fn finish(
        mut self,
        seed: u64,
        winners: Vec<usize>,
        showdown: bool,
        config: &TableConfig,
    ) -> HandOutcome {
        let pot = self.pot();
        match winners.as_slice() {
            [single] => self.stacks[*single] += pot,
            _ => {
                // odd chip goes to the big blind
                let half = pot / 2;
                self.stacks[0] += half;
                self.stacks[1] += pot - half;
            }
        }
        let deltas = [
            i64::from(self.stacks[0]) - i64::from(self.starting_stack),
            i64::from(self.stacks[1]) - i64::from(self.starting_stack),
        ];
        HandOutcome {
            seed,
            deltas,
            pot,
            winners,
            showdown,
            board: self.board,
            actions: self.actions,
            big_blind: config.big_blind,
        }
    }
}
