//! Card representation for five-card poker.
//!
//! - `Card`: A single playing card with rank and suit
//! - `Hand`: A player's five private cards
//! - `Deal`: Both players' hands for one traversal
//! - `Deck`: A deck of 52 cards with dealing functionality

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::Error;

// Rank of a card (0-12: 2-A).

/// Deuce.
pub const RANK_2: u8 = 0;
/// Three.
pub const RANK_3: u8 = 1;
/// Four.
pub const RANK_4: u8 = 2;
/// Five.
pub const RANK_5: u8 = 3;
/// Six.
pub const RANK_6: u8 = 4;
/// Seven.
pub const RANK_7: u8 = 5;
/// Eight.
pub const RANK_8: u8 = 6;
/// Nine.
pub const RANK_9: u8 = 7;
/// Ten.
pub const RANK_T: u8 = 8;
/// Jack.
pub const RANK_J: u8 = 9;
/// Queen.
pub const RANK_Q: u8 = 10;
/// King.
pub const RANK_K: u8 = 11;
/// Ace.
pub const RANK_A: u8 = 12;

// Suit of a card (0-3).

/// Clubs.
pub const SUIT_CLUBS: u8 = 0;
/// Diamonds.
pub const SUIT_DIAMONDS: u8 = 1;
/// Hearts.
pub const SUIT_HEARTS: u8 = 2;
/// Spades.
pub const SUIT_SPADES: u8 = 3;

/// Cards held by each player.
pub const HAND_SIZE: usize = 5;

const RANK_CHARS: [char; 13] = ['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];
const SUIT_CHARS: [char; 4] = ['c', 'd', 'h', 's'];

/// A single playing card.
///
/// Ordering follows the id, so it sorts by rank first and suit second.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card {
    /// Card index 0-51: rank * 4 + suit
    id: u8,
}

impl Card {
    /// Create a new card from rank (0-12) and suit (0-3).
    #[inline]
    pub fn new(rank: u8, suit: u8) -> Self {
        debug_assert!(rank < 13, "rank must be 0-12");
        debug_assert!(suit < 4, "suit must be 0-3");
        Self { id: rank * 4 + suit }
    }

    /// Create a card from its ID (0-51).
    #[inline]
    pub fn from_id(id: u8) -> Self {
        debug_assert!(id < 52, "card id must be 0-51");
        Self { id }
    }

    /// Get the card's ID (0-51).
    #[inline]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Get the card's rank (0-12: 2-A).
    #[inline]
    pub fn rank(&self) -> u8 {
        self.id / 4
    }

    /// Get the card's suit (0-3).
    #[inline]
    pub fn suit(&self) -> u8 {
        self.id % 4
    }

    /// Get rank character for display.
    pub fn rank_char(&self) -> char {
        RANK_CHARS[self.rank() as usize]
    }

    /// Get suit character for display.
    pub fn suit_char(&self) -> char {
        SUIT_CHARS[self.suit() as usize]
    }
}

impl FromStr for Card {
    type Err = Error;

    /// Parse a card from strings like "As", "Kh", "2c".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::CardParse(s.to_string());
        let mut chars = s.chars();
        let (Some(r), Some(u), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };

        let rank = RANK_CHARS
            .iter()
            .position(|&c| c == r.to_ascii_uppercase())
            .ok_or_else(invalid)?;
        let suit = SUIT_CHARS
            .iter()
            .position(|&c| c == u.to_ascii_lowercase())
            .ok_or_else(invalid)?;

        Ok(Self::new(rank as u8, suit as u8))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank_char(), self.suit_char())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// A player's five private cards.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hand {
    cards: [Card; HAND_SIZE],
}

impl Hand {
    /// Wrap five cards in the order dealt.
    pub fn new(cards: [Card; HAND_SIZE]) -> Self {
        Self { cards }
    }

    /// Cards in the order dealt.
    pub fn cards(&self) -> &[Card; HAND_SIZE] {
        &self.cards
    }

    /// Cards sorted highest first (rank, then suit).
    ///
    /// Two hands holding the same cards in any order produce the same
    /// result; info-set keys are built from this.
    pub fn sorted_desc(&self) -> [Card; HAND_SIZE] {
        let mut cards = self.cards;
        cards.sort_unstable_by(|a, b| b.cmp(a));
        cards
    }

    /// Canonical text of the holding, e.g. `AsKh9d5c2c`.
    pub fn canonical(&self) -> String {
        let mut s = String::with_capacity(HAND_SIZE * 2);
        for card in self.sorted_desc() {
            s.push(card.rank_char());
            s.push(card.suit_char());
        }
        s
    }

    /// Check whether a card is part of this hand.
    pub fn contains(&self, card: Card) -> bool {
        self.cards.iter().any(|&c| c == card)
    }
}

impl FromStr for Hand {
    type Err = Error;

    /// Parse a hand from strings like "AsKsQsJsTs" or "As Ks Qs Js Ts".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.len() != HAND_SIZE * 2 || !compact.is_ascii() {
            return Err(Error::CardParse(s.to_string()));
        }

        let mut cards = [Card::from_id(0); HAND_SIZE];
        for (i, slot) in cards.iter_mut().enumerate() {
            *slot = compact[i * 2..i * 2 + 2].parse()?;
        }
        Ok(Self { cards })
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for card in &self.cards {
            write!(f, "{}", card)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self)
    }
}

/// Both players' private hands for one traversal. Player 0 is `hands[0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Deal {
    /// Private hands indexed by player.
    pub hands: [Hand; 2],
}

impl Deal {
    /// Pair two hands.
    pub fn new(player0: Hand, player1: Hand) -> Self {
        Self {
            hands: [player0, player1],
        }
    }

    /// The hand held by `player`.
    #[inline]
    pub fn hand(&self, player: usize) -> &Hand {
        &self.hands[player]
    }
}

/// A deck of 52 playing cards.
#[derive(Clone)]
pub struct Deck {
    /// All 52 cards in current order.
    cards: [Card; 52],
    /// Index of next card to deal.
    index: usize,
}

impl Deck {
    /// Create a new deck in standard order.
    pub fn new() -> Self {
        Self {
            cards: std::array::from_fn(|i| Card::from_id(i as u8)),
            index: 0,
        }
    }

    /// Return every card to the deck and shuffle it.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        self.index = 0;
        self.cards.shuffle(rng);
    }

    /// Deal the next card from the deck.
    pub fn deal_one(&mut self) -> Option<Card> {
        let card = *self.cards.get(self.index)?;
        self.index += 1;
        Some(card)
    }

    /// Deal up to `n` cards without replacement.
    pub fn deal(&mut self, n: usize) -> Vec<Card> {
        let end = (self.index + n).min(self.cards.len());
        let cards = self.cards[self.index..end].to_vec();
        self.index = end;
        cards
    }

    /// Deal two five-card hands, alternating one card at a time starting
    /// with player 0. Returns `None` if fewer than ten cards remain.
    pub fn deal_hands(&mut self) -> Option<Deal> {
        if self.remaining() < HAND_SIZE * 2 {
            return None;
        }
        let cards = self.deal(HAND_SIZE * 2);
        let p0: [Card; HAND_SIZE] = std::array::from_fn(|i| cards[i * 2]);
        let p1: [Card; HAND_SIZE] = std::array::from_fn(|i| cards[i * 2 + 1]);
        Some(Deal::new(Hand::new(p0), Hand::new(p1)))
    }

    /// Reshuffle the full deck and deal a fresh pair of hands from the top.
    pub fn shuffle_and_deal<R: Rng>(&mut self, rng: &mut R) -> Deal {
        self.reset(rng);
        let p0: [Card; HAND_SIZE] = std::array::from_fn(|i| self.cards[i * 2]);
        let p1: [Card; HAND_SIZE] = std::array::from_fn(|i| self.cards[i * 2 + 1]);
        self.index = HAND_SIZE * 2;
        Deal::new(Hand::new(p0), Hand::new(p1))
    }

    /// Get the number of remaining cards.
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.index
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deck({} remaining)", self.remaining())
    }
}
