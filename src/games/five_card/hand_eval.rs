//! Poker hand evaluation.
//!
//! Showdowns need two things from a hand: a totally ordered score and the
//! hand's ranks grouped by frequency for tie-breaking. [`HandEvaluator`] is
//! the seam; [`FiveCardEvaluator`] scores category plus kickers, while
//! [`CategoryEvaluator`] scores the category alone and leaves the rest to the
//! rank-group tie-break.

use std::cmp::Ordering;
use std::fmt::Debug;

use super::card::{Card, HAND_SIZE, RANK_2, RANK_3, RANK_4, RANK_5, RANK_A};

/// Hand rank categories, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    /// No pair.
    HighCard = 0,
    /// One pair.
    OnePair = 1,
    /// Two pairs.
    TwoPair = 2,
    /// Trips.
    ThreeOfAKind = 3,
    /// Five consecutive ranks.
    Straight = 4,
    /// Five cards of one suit.
    Flush = 5,
    /// Trips plus a pair.
    FullHouse = 6,
    /// Quads.
    FourOfAKind = 7,
    /// Straight in one suit.
    StraightFlush = 8,
}

impl HandCategory {
    /// Get the category name.
    pub fn name(&self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "One Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
        }
    }
}

/// A hand rank that can be compared.
/// Higher values are better hands.
/// Format: category (4 bits) | kicker1 (4 bits) | kicker2 (4 bits) | ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandRank(u32);

impl HandRank {
    fn new(category: HandCategory, kickers: &[u8]) -> Self {
        let mut value = (category as u32) << 20;
        for (i, &k) in kickers.iter().take(5).enumerate() {
            value |= (k as u32) << (16 - i * 4);
        }
        Self(value)
    }

    /// Get the hand category.
    pub fn category(&self) -> HandCategory {
        match self.0 >> 20 {
            0 => HandCategory::HighCard,
            1 => HandCategory::OnePair,
            2 => HandCategory::TwoPair,
            3 => HandCategory::ThreeOfAKind,
            4 => HandCategory::Straight,
            5 => HandCategory::Flush,
            6 => HandCategory::FullHouse,
            7 => HandCategory::FourOfAKind,
            _ => HandCategory::StraightFlush,
        }
    }
}

/// Ranks of a hand grouped by how often they occur.
///
/// Groups are ordered by descending frequency, then descending rank, so a
/// full house `KKK22` is `[(3, K), (2, 2)]`. In a wheel (`A5432`) the ace
/// plays low and is placed behind the deuce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankGroups {
    groups: Vec<(u8, u8)>,
}

impl RankGroups {
    /// Group the ranks of `cards`.
    pub fn from_cards(cards: &[Card]) -> Self {
        let mut counts = [0u8; 13];
        for card in cards {
            counts[card.rank() as usize] += 1;
        }
        let mut groups: Vec<(u8, u8)> = counts
            .iter()
            .enumerate()
            .filter(|&(_, &n)| n > 0)
            .map(|(rank, &n)| (n, rank as u8))
            .collect();
        groups.sort_unstable_by(|a, b| b.cmp(a));

        let wheel = [RANK_A, RANK_5, RANK_4, RANK_3, RANK_2];
        if groups.len() == wheel.len() && groups.iter().map(|&(_, r)| r).eq(wheel) {
            groups.rotate_left(1);
        }
        Self { groups }
    }

    /// `(count, rank)` pairs, most frequent first.
    pub fn groups(&self) -> &[(u8, u8)] {
        &self.groups
    }

    /// The represented rank of each group in tie-break order.
    pub fn ranks(&self) -> impl Iterator<Item = u8> + '_ {
        self.groups.iter().map(|&(_, rank)| rank)
    }

    /// Compare two holdings group by group, starting with the most frequent.
    ///
    /// The first position whose rank differs decides. If one side runs out
    /// of groups first, or every position matches, the holdings are equal.
    pub fn compare(&self, other: &RankGroups) -> Ordering {
        self.ranks()
            .zip(other.ranks())
            .map(|(a, b)| a.cmp(&b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// Scores a five-card hand.
///
/// Implementations only need to provide a total order; rank grouping for
/// tie-breaks is computed from the cards themselves.
pub trait HandEvaluator: Send + Sync {
    /// Comparable strength of a hand. Higher is better.
    type Score: Ord + Copy + Debug + Send;

    /// Score exactly five cards.
    fn score(&self, cards: &[Card; HAND_SIZE]) -> Self::Score;

    /// Best score over every five-card subset of `cards` and the subset that
    /// achieves it.
    ///
    /// # Panics
    /// Panics if fewer than five cards are given.
    fn best_score(&self, cards: &[Card]) -> (Self::Score, [Card; HAND_SIZE]) {
        assert!(cards.len() >= HAND_SIZE, "need at least five cards, got {}", cards.len());

        let n = cards.len();
        let mut idx: [usize; HAND_SIZE] = std::array::from_fn(|i| i);
        let first: [Card; HAND_SIZE] = std::array::from_fn(|i| cards[i]);
        let mut best = (self.score(&first), first);
        loop {
            // Advance to the next combination in lexicographic order.
            let Some(pos) = (0..HAND_SIZE).rev().find(|&i| idx[i] != i + n - HAND_SIZE) else {
                return best;
            };
            idx[pos] += 1;
            for j in pos + 1..HAND_SIZE {
                idx[j] = idx[j - 1] + 1;
            }

            let hand: [Card; HAND_SIZE] = std::array::from_fn(|i| cards[idx[i]]);
            let score = self.score(&hand);
            if score > best.0 {
                best = (score, hand);
            }
        }
    }
}

/// Hand evaluator for poker hands: category plus kickers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FiveCardEvaluator;

impl FiveCardEvaluator {
    /// Evaluate a 5-card hand.
    pub fn evaluate_5(&self, cards: &[Card; HAND_SIZE]) -> HandRank {
        // Build rank counts and suit counts
        let mut rank_counts = [0u8; 13];
        let mut suit_counts = [0u8; 4];
        let mut rank_bits = 0u16;

        for card in cards {
            rank_counts[card.rank() as usize] += 1;
            suit_counts[card.suit() as usize] += 1;
            rank_bits |= 1 << card.rank();
        }

        let is_flush = suit_counts.iter().any(|&c| c as usize == HAND_SIZE);
        let straight_high = find_straight(rank_bits);

        if let (true, Some(high)) = (is_flush, straight_high) {
            return HandRank::new(HandCategory::StraightFlush, &[high]);
        }

        // Categorize by rank counts
        let mut quads = Vec::new();
        let mut trips = Vec::new();
        let mut pairs = Vec::new();
        let mut singles = Vec::new();

        for rank in (0..13u8).rev() {
            match rank_counts[rank as usize] {
                4 => quads.push(rank),
                3 => trips.push(rank),
                2 => pairs.push(rank),
                1 => singles.push(rank),
                _ => {}
            }
        }

        if let Some(&quad) = quads.first() {
            let kicker = singles.first().copied().unwrap_or(0);
            return HandRank::new(HandCategory::FourOfAKind, &[quad, kicker]);
        }

        if let (Some(&trip), Some(&pair)) = (trips.first(), pairs.first()) {
            return HandRank::new(HandCategory::FullHouse, &[trip, pair]);
        }

        if is_flush {
            // Five distinct ranks, already descending
            return HandRank::new(HandCategory::Flush, &singles);
        }

        if let Some(high) = straight_high {
            return HandRank::new(HandCategory::Straight, &[high]);
        }

        if let Some(&trip) = trips.first() {
            let mut kickers = vec![trip];
            kickers.extend(singles.iter().take(2));
            return HandRank::new(HandCategory::ThreeOfAKind, &kickers);
        }

        if pairs.len() >= 2 {
            let kicker = singles.first().copied().unwrap_or(0);
            return HandRank::new(HandCategory::TwoPair, &[pairs[0], pairs[1], kicker]);
        }

        if let Some(&pair) = pairs.first() {
            let mut kickers = vec![pair];
            kickers.extend(singles.iter().take(3));
            return HandRank::new(HandCategory::OnePair, &kickers);
        }

        HandRank::new(HandCategory::HighCard, &singles)
    }
}

impl HandEvaluator for FiveCardEvaluator {
    type Score = HandRank;

    fn score(&self, cards: &[Card; HAND_SIZE]) -> HandRank {
        self.evaluate_5(cards)
    }
}

/// Scores only the hand category; equal categories fall through to the
/// rank-group tie-break at showdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryEvaluator;

impl HandEvaluator for CategoryEvaluator {
    type Score = HandCategory;

    fn score(&self, cards: &[Card; HAND_SIZE]) -> HandCategory {
        FiveCardEvaluator.evaluate_5(cards).category()
    }
}

/// Find the highest straight from a rank bitmask.
/// Returns the high card of the straight, or None if no straight.
fn find_straight(rank_bits: u16) -> Option<u8> {
    // Check from ace-high down
    for high in (4..=12u8).rev() {
        let mask = 0b11111u16 << (high - 4);
        if rank_bits & mask == mask {
            return Some(high);
        }
    }

    // Wheel: A-2-3-4-5, high card is the five
    let wheel = 0b1_0000_0000_1111u16;
    if rank_bits & wheel == wheel {
        return Some(3);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::five_card::card::{Hand, RANK_K};

    fn cards(s: &str) -> [Card; HAND_SIZE] {
        *s.parse::<Hand>().unwrap().cards()
    }

    fn category(s: &str) -> HandCategory {
        FiveCardEvaluator.evaluate_5(&cards(s)).category()
    }

    #[test]
    fn test_categories() {
        assert_eq!(category("As Kd Qh Jc 9s"), HandCategory::HighCard);
        assert_eq!(category("As Ad Kh Qc Js"), HandCategory::OnePair);
        assert_eq!(category("As Ad Kh Kc Js"), HandCategory::TwoPair);
        assert_eq!(category("As Ad Ah Kc Js"), HandCategory::ThreeOfAKind);
        assert_eq!(category("Ts 9d 8h 7c 6s"), HandCategory::Straight);
        assert_eq!(category("As Kd Qh Jc Ts"), HandCategory::Straight);
        assert_eq!(category("5s 4d 3h 2c As"), HandCategory::Straight);
        assert_eq!(category("As Ks 9s 7s 2s"), HandCategory::Flush);
        assert_eq!(category("As Ad Ah Kc Kd"), HandCategory::FullHouse);
        assert_eq!(category("As Ad Ah Ac Ks"), HandCategory::FourOfAKind);
        assert_eq!(category("9s 8s 7s 6s 5s"), HandCategory::StraightFlush);
        assert_eq!(category("As Ks Qs Js Ts"), HandCategory::StraightFlush);
    }

    #[test]
    fn test_kickers_order_hands() {
        let eval = FiveCardEvaluator;
        let aces_king = eval.score(&cards("As Ad Kh 7c 2s"));
        let aces_queen = eval.score(&cards("Ah Ac Qh 7d 2d"));
        assert!(aces_king > aces_queen);

        let wheel = eval.score(&cards("5s 4d 3h 2c As"));
        let six_high = eval.score(&cards("6s 5d 4h 3c 2s"));
        assert!(six_high > wheel);
    }

    #[test]
    fn test_rank_groups_order() {
        let groups = RankGroups::from_cards(&cards("2s Kd 2h Kc Kh"));
        assert_eq!(groups.groups(), &[(3, RANK_K), (2, RANK_2)]);

        let groups = RankGroups::from_cards(&cards("9s 4d 9h Ac 4h"));
        let ranks: Vec<u8> = groups.ranks().collect();
        assert_eq!(ranks, vec![7, 2, 12]);
    }

    #[test]
    fn test_rank_groups_wheel_ace_plays_low() {
        let wheel = RankGroups::from_cards(&cards("5s 4d 3h 2c As"));
        let ranks: Vec<u8> = wheel.ranks().collect();
        assert_eq!(ranks, vec![RANK_5, RANK_4, RANK_3, RANK_2, RANK_A]);

        let six_high = RankGroups::from_cards(&cards("6s 5d 4h 3c 2s"));
        assert_eq!(wheel.compare(&six_high), Ordering::Less);

        // Ace-high without the rest of the wheel keeps the ace on top.
        let ace_high = RankGroups::from_cards(&cards("As 5d 4h 3c 7s"));
        assert_eq!(ace_high.ranks().next(), Some(RANK_A));
    }

    #[test]
    fn test_category_names() {
        assert_eq!(HandCategory::HighCard.name(), "High Card");
        assert_eq!(category("As Ad Ah Kc Kd").name(), "Full House");
        assert_eq!(category("9s 8s 7s 6s 5s").name(), "Straight Flush");
    }

    #[test]
    fn test_rank_groups_compare_from_most_frequent() {
        // Pair of nines with an ace kicker loses to a pair of tens with a
        // low kicker: the pair rank is compared before any singleton.
        let nines = RankGroups::from_cards(&cards("9s 9d Ah 4c 2h"));
        let tens = RankGroups::from_cards(&cards("Ts Td 5h 4d 3h"));
        assert_eq!(nines.compare(&tens), Ordering::Less);
        assert_eq!(tens.compare(&nines), Ordering::Greater);

        let same = RankGroups::from_cards(&cards("9h 9c Ad 4s 2c"));
        assert_eq!(nines.compare(&same), Ordering::Equal);
    }

    #[test]
    fn test_best_score_over_subsets() {
        let eval = FiveCardEvaluator;
        let seven: Vec<Card> = ["Ah", "As", "Ad", "Ac", "Kh", "Qs", "Jd"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let (score, best) = eval.best_score(&seven);
        assert_eq!(score.category(), HandCategory::FourOfAKind);
        assert!(best.iter().any(|c| c.to_string() == "Kh"));

        let five = cards("As Ks 9s 7s 2s");
        let (score, best) = eval.best_score(&five);
        assert_eq!(score, eval.score(&five));
        assert_eq!(best, five);
    }

    #[test]
    fn test_category_evaluator_ignores_kickers() {
        let eval = CategoryEvaluator;
        assert_eq!(
            eval.score(&cards("As Ad Kh 7c 2s")),
            eval.score(&cards("3h 3c Qh 7d 2d"))
        );
    }
}
