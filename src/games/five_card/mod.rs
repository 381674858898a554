//! Heads-up five-card poker: cards, deck and hand evaluation.
//!
//! Each player is dealt five private cards from one shuffled deck. There are
//! no draws and no community cards; a showdown compares the two hands as
//! dealt.

pub mod card;
pub mod hand_eval;

pub use card::{Card, Deal, Deck, Hand, HAND_SIZE};
pub use hand_eval::{
    CategoryEvaluator, FiveCardEvaluator, HandCategory, HandEvaluator, HandRank, RankGroups,
};
