use std::cmp::Ordering;

use crate::cards::Card;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

/// Category plus tiebreak ranks, ordered high to low. Derived ordering
/// compares category first, then kickers lexicographically.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct HandStrength {
    pub category: Category,
    pub kickers: [u8; 5],
}

const ACE: u8 = 14;

/// Evaluates the best five-card hand contained in `cards`.
///
/// Accepts anywhere from one to seven cards; with fewer than five cards the
/// result only reflects the made pairs/trips available, which is what the
/// pre-river strength heuristic needs.
///
/// # Examples
///
/// ```
/// use evohold_engine::cards::{Card, Rank, Suit};
/// use evohold_engine::hand::{evaluate_hand, Category};
///
/// let cards = [
///     Card::new(Rank::Ace, Suit::Hearts),
///     Card::new(Rank::King, Suit::Hearts),
///     Card::new(Rank::Queen, Suit::Hearts),
///     Card::new(Rank::Jack, Suit::Hearts),
///     Card::new(Rank::Ten, Suit::Hearts),
/// ];
/// assert_eq!(evaluate_hand(&cards).category, Category::StraightFlush);
/// ```
pub fn evaluate_hand(cards: &[Card]) -> HandStrength {
    let mut rank_counts = [0u8; 15];
    let mut rank_mask: u16 = 0;
    let mut suit_masks = [0u16; 4];
    let mut suit_counts = [0u8; 4];
    for card in cards {
        let r = card.rank.value();
        let s = card.suit.index();
        rank_counts[r as usize] += 1;
        rank_mask |= 1 << r;
        suit_masks[s] |= 1 << r;
        suit_counts[s] += 1;
    }

    let flush_suit = suit_counts.iter().position(|&n| n >= 5);

    if let Some(s) = flush_suit {
        if let Some(high) = straight_high(suit_masks[s]) {
            return strength(Category::StraightFlush, &[high]);
        }
    }

    let (quads, trips, pairs) = group_ranks(&rank_counts);

    if let Some(&quad) = quads.first() {
        let kicker = highest_excluding(&rank_counts, &[quad], 1);
        return strength(Category::FourOfAKind, &[quad, kicker[0]]);
    }

    // a second set of trips plays as the pair of a full house
    if let Some(&trip) = trips.first() {
        let pair = trips.get(1).copied().into_iter().chain(pairs.first().copied()).max();
        if let Some(pair) = pair {
            return strength(Category::FullHouse, &[trip, pair]);
        }
    }

    if let Some(s) = flush_suit {
        let mut ranks = ranks_in_mask(suit_masks[s]);
        ranks.truncate(5);
        return strength(Category::Flush, &ranks);
    }

    if let Some(high) = straight_high(rank_mask) {
        return strength(Category::Straight, &[high]);
    }

    if let Some(&trip) = trips.first() {
        let mut ks = vec![trip];
        ks.extend(highest_excluding(&rank_counts, &[trip], 2));
        return strength(Category::ThreeOfAKind, &ks);
    }

    if pairs.len() >= 2 {
        let (high, low) = (pairs[0], pairs[1]);
        let mut ks = vec![high, low];
        ks.extend(highest_excluding(&rank_counts, &[high, low], 1));
        return strength(Category::TwoPair, &ks);
    }

    if let Some(&pair) = pairs.first() {
        let mut ks = vec![pair];
        ks.extend(highest_excluding(&rank_counts, &[pair], 3));
        return strength(Category::OnePair, &ks);
    }

    strength(Category::HighCard, &highest_excluding(&rank_counts, &[], 5))
}

pub fn compare_hands(a: &HandStrength, b: &HandStrength) -> Ordering {
    a.cmp(b)
}

/// Preflop hand quality on a 0.0..=1.0 scale (premium pairs and AKs at the top).
pub fn preflop_strength(hole: [Card; 2]) -> f64 {
    let (r1, r2) = (hole[0].rank.value(), hole[1].rank.value());
    let (high, low) = if r1 >= r2 { (r1, r2) } else { (r2, r1) };
    let suited = hole[0].suit == hole[1].suit;

    let score: u8 = if high == low {
        match high {
            13..=14 => 10,
            11..=12 => 9,
            10 => 8,
            9 => 7,
            8 => 6,
            7 => 5,
            _ => 4,
        }
    } else {
        let base = match (high, low) {
            (14, 13) => 8,
            (14, 12) => 7,
            (14, 11) | (13, 12) => 6,
            (14, 10) | (13, 11) | (12, 11) => 5,
            (14, _) | (13, 10) | (12, 10) => 4,
            _ if high >= 11 && low >= 9 => 4,
            _ if high - low <= 2 && high >= 9 => 3,
            _ if high - low <= 2 => 2,
            _ => 1,
        };
        if suited {
            (base + 2).min(10)
        } else {
            base
        }
    };
    f64::from(score) / 10.0
}

/// Rough made-hand strength on a 0.0..=1.0 scale used by decision policies.
///
/// Preflop this is [`preflop_strength`]; once a board exists the category of
/// the best hand sets the base and the top kicker nudges it upward.
pub fn relative_strength(hole: [Card; 2], board: &[Card]) -> f64 {
    if board.len() < 3 {
        return preflop_strength(hole);
    }
    let mut cards = Vec::with_capacity(2 + board.len());
    cards.extend_from_slice(&hole);
    cards.extend_from_slice(board);
    let best = evaluate_hand(&cards);
    let board_only = evaluate_hand(board);

    let base = match best.category {
        Category::HighCard => 0.10,
        Category::OnePair => 0.35,
        Category::TwoPair => 0.55,
        Category::ThreeOfAKind => 0.65,
        Category::Straight => 0.75,
        Category::Flush => 0.82,
        Category::FullHouse => 0.90,
        Category::FourOfAKind => 0.97,
        Category::StraightFlush => 1.0,
    };
    let kicker = f64::from(best.kickers[0]) / f64::from(ACE) * 0.08;
    // playing the board is worth much less than the category suggests
    let shared = if board_only.category == best.category { 0.6 } else { 1.0 };
    ((base + kicker) * shared).clamp(0.0, 1.0)
}

fn strength(category: Category, ranks: &[u8]) -> HandStrength {
    let mut kickers = [0u8; 5];
    for (slot, &r) in kickers.iter_mut().zip(ranks) {
        *slot = r;
    }
    HandStrength { category, kickers }
}

/// Ranks grouped by multiplicity, each list high to low.
fn group_ranks(rank_counts: &[u8; 15]) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let mut quads = vec![];
    let mut trips = vec![];
    let mut pairs = vec![];
    for r in (2..=ACE).rev() {
        match rank_counts[r as usize] {
            4 => quads.push(r),
            3 => trips.push(r),
            2 => pairs.push(r),
            _ => {}
        }
    }
    (quads, trips, pairs)
}

fn highest_excluding(rank_counts: &[u8; 15], exclude: &[u8], n: usize) -> Vec<u8> {
    (2..=ACE)
        .rev()
        .filter(|r| rank_counts[*r as usize] > 0 && !exclude.contains(r))
        .take(n)
        .collect()
}

fn ranks_in_mask(mask: u16) -> Vec<u8> {
    (2..=ACE).rev().filter(|r| mask & (1 << r) != 0).collect()
}

fn straight_high(mask: u16) -> Option<u8> {
    let mut m = mask;
    // the wheel: ace also plays low
    if m & (1 << ACE) != 0 {
        m |= 1 << 1;
    }
    (5..=ACE).rev().find(|&high| {
        let window = 0b1_1111u16 << (high - 4);
        m & window == window
    })
}
