//! Terminal-state resolution: pot size and winner of a finished hand.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cfr::action::{Action, History};
use crate::games::five_card::{Deal, HandEvaluator, RankGroups};

/// Fixed-limit pot arithmetic.
///
/// Starting from the ante, a raise adds one bet and leaves a call owed. A
/// raise made while a call is already owed adds a second bet for the call it
/// supersedes. A call adds one bet only when a call is owed and leaves the
/// flag set. A fold ends accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotLadder {
    /// Chips in the pot before any action.
    pub ante: u32,
    /// Fixed increment.
    pub bet: u32,
}

impl Default for PotLadder {
    fn default() -> Self {
        Self { ante: 50, bet: 20 }
    }
}

impl PotLadder {
    /// Create a ladder with the given ante and increment.
    pub fn new(ante: u32, bet: u32) -> Self {
        Self { ante, bet }
    }

    /// Pot size after `history`, ignoring anything after the first fold.
    pub fn pot(&self, history: &History) -> u32 {
        let mut pot = self.ante;
        let mut call_owed = false;
        for &action in history.actions() {
            match action {
                Action::Raise => {
                    if call_owed {
                        pot += self.bet;
                    }
                    pot += self.bet;
                    call_owed = true;
                }
                Action::Call => {
                    if call_owed {
                        pot += self.bet;
                    }
                }
                Action::Fold => break,
            }
        }
        pot
    }
}

/// Who took the pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The given player (0 or 1) wins the whole pot.
    Winner(usize),
    /// Identical hands; the pot is split.
    Tie,
}

/// Result of a finished hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Who won.
    pub outcome: Outcome,
    /// Full pot size.
    pub pot: u32,
}

impl Resolution {
    /// Amount at stake: the whole pot, or half of it on a tie.
    pub fn payout(&self) -> f64 {
        match self.outcome {
            Outcome::Winner(_) => self.pot as f64,
            Outcome::Tie => self.pot as f64 / 2.0,
        }
    }

    /// Signed utility for `player`.
    ///
    /// `+pot` for the winner and `-pot` for the loser. A tie is worth the
    /// unsigned half pot to whoever asks.
    pub fn utility_for(&self, player: usize) -> f64 {
        match self.outcome {
            Outcome::Winner(w) if w == player => self.payout(),
            Outcome::Winner(_) => -self.payout(),
            Outcome::Tie => self.payout(),
        }
    }
}

/// Whether a hand is over after `history`.
///
/// A hand is never over before two actions have been taken. After that it
/// ends at the action cap, on any fold, or when the last action was a call.
pub fn is_terminal(history: &History, max_actions: usize) -> bool {
    history.len() > 1
        && (history.len() >= max_actions
            || history.fold_position().is_some()
            || history.last() == Some(Action::Call))
}

/// Computes pot and winner for finished hands.
#[derive(Debug, Clone)]
pub struct TerminalResolver<E> {
    ladder: PotLadder,
    evaluator: E,
}

impl<E: HandEvaluator> TerminalResolver<E> {
    /// Create a resolver from a pot ladder and a hand evaluator.
    pub fn new(ladder: PotLadder, evaluator: E) -> Self {
        Self { ladder, evaluator }
    }

    /// Pot size after `history`.
    pub fn pot(&self, history: &History) -> u32 {
        self.ladder.pot(history)
    }

    /// Resolve a finished hand.
    ///
    /// A fold at position `k` hands the pot to player `(k + 1) % 2`.
    /// Otherwise the hands are compared at showdown.
    pub fn resolve(&self, history: &History, deal: &Deal) -> Resolution {
        let pot = self.ladder.pot(history);
        let outcome = match history.fold_position() {
            Some(k) => Outcome::Winner((k + 1) % 2),
            None => self.showdown(deal),
        };
        Resolution { outcome, pot }
    }

    /// Compare both hands: higher score wins, equal scores fall back to the
    /// rank groups, and a full match is a tie.
    pub fn showdown(&self, deal: &Deal) -> Outcome {
        let (score0, best0) = self.evaluator.best_score(deal.hand(0).cards());
        let (score1, best1) = self.evaluator.best_score(deal.hand(1).cards());

        let ordering = score0.cmp(&score1).then_with(|| {
            RankGroups::from_cards(&best0).compare(&RankGroups::from_cards(&best1))
        });

        match ordering {
            Ordering::Greater => Outcome::Winner(0),
            Ordering::Less => Outcome::Winner(1),
            Ordering::Equal => Outcome::Tie,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::five_card::{CategoryEvaluator, FiveCardEvaluator, Hand};

    fn h(s: &str) -> History {
        s.parse().unwrap()
    }

    fn deal(p0: &str, p1: &str) -> Deal {
        Deal::new(p0.parse::<Hand>().unwrap(), p1.parse::<Hand>().unwrap())
    }

    fn resolver() -> TerminalResolver<FiveCardEvaluator> {
        TerminalResolver::new(PotLadder::default(), FiveCardEvaluator)
    }

    #[test]
    fn test_pot_ladder_regression() {
        let ladder = PotLadder::default();
        let expected = [
            ("", 50),
            ("r", 70),
            ("c", 50),
            ("cc", 50),
            ("rc", 90),
            ("rr", 110),
            ("cr", 70),
            ("crc", 90),
            ("rrc", 130),
            ("rrr", 150),
            ("crrc", 130),
            ("rrrr", 190),
            ("f", 50),
            ("rf", 70),
            ("rrf", 110),
        ];
        for (history, pot) in expected {
            assert_eq!(ladder.pot(&h(history)), pot, "pot({:?})", history);
        }
        assert!(ladder.pot(&h("rr")) > ladder.pot(&h("rc")));
    }

    #[test]
    fn test_pot_ignores_actions_after_fold() {
        let ladder = PotLadder::default();
        assert_eq!(ladder.pot(&h("frr")), 50);
        assert_eq!(ladder.pot(&h("rfrrc")), 70);
    }

    #[test]
    fn test_custom_stakes() {
        let ladder = PotLadder::new(10, 5);
        assert_eq!(ladder.pot(&h("rr")), 25);
    }

    #[test]
    fn test_fold_winner_is_other_player() {
        let d = deal("2c3d4h5s7c", "AsAhAdAcKs");
        for (history, k) in [("f", 0), ("fc", 0), ("rf", 1), ("rrf", 2), ("crrf", 3)] {
            let res = resolver().resolve(&h(history), &d);
            assert_eq!(res.outcome, Outcome::Winner((k + 1) % 2), "history {:?}", history);
            assert_eq!(res.pot, PotLadder::default().pot(&h(&history[..k])));
        }
    }

    #[test]
    fn test_showdown_higher_hand_wins() {
        let d = deal("AsKsQsJsTs", "2c3d4h5s7c");
        let res = resolver().resolve(&h("rc"), &d);
        assert_eq!(res, Resolution { outcome: Outcome::Winner(0), pot: 90 });

        let d = deal("2c3d4h5s7c", "9h9d4c4d2h");
        assert_eq!(resolver().showdown(&d), Outcome::Winner(1));
    }

    #[test]
    fn test_identical_ranks_tie_and_split() {
        let d = deal("AsKd9h7c2s", "AhKc9d7s2d");
        let res = resolver().resolve(&h("rrc"), &d);
        assert_eq!(res.outcome, Outcome::Tie);
        assert_eq!(res.pot, 130);
        assert_eq!(res.payout(), 65.0);
        assert_eq!(res.utility_for(0), 65.0);
        assert_eq!(res.utility_for(1), 65.0);
    }

    #[test]
    fn test_category_score_falls_back_to_rank_groups() {
        let resolver = TerminalResolver::new(PotLadder::default(), CategoryEvaluator);

        // Both one pair; the higher pair wins even against a better kicker.
        let d = deal("9s9dAh4c2h", "TsTd5h4d3h");
        assert_eq!(resolver.showdown(&d), Outcome::Winner(1));

        // Same pair, kicker decides.
        let d = deal("9s9dAh4c2h", "9h9cKh4d2d");
        assert_eq!(resolver.showdown(&d), Outcome::Winner(0));

        // Fully symmetric: split pot.
        let d = deal("9s9dAh4c2h", "9h9cAd4d2d");
        assert_eq!(resolver.showdown(&d), Outcome::Tie);
    }

    #[test]
    fn test_category_score_ranks_wheel_low() {
        let category = TerminalResolver::new(PotLadder::default(), CategoryEvaluator);

        let d = deal("5s4d3h2cAs", "6s5d4h3c2s");
        assert_eq!(category.showdown(&d), Outcome::Winner(1));
        assert_eq!(resolver().showdown(&d), Outcome::Winner(1));

        let d = deal("6s5d4h3c2s", "5h4c3d2dAc");
        assert_eq!(category.showdown(&d), Outcome::Winner(0));

        // Two wheels split.
        let d = deal("5s4d3h2cAs", "5h4c3d2dAc");
        assert_eq!(category.showdown(&d), Outcome::Tie);
        assert_eq!(resolver().showdown(&d), Outcome::Tie);

        // Ace-high straight still beats king-high.
        let d = deal("AsKdQhJcTs", "KhQdJsTc9h");
        assert_eq!(category.showdown(&d), Outcome::Winner(0));
    }

    #[test]
    fn test_utility_zero_sum_on_decisive_outcomes() {
        let d = deal("AsKsQsJsTs", "2c3d4h5s7c");
        for history in ["rc", "rrc", "rrrr", "crc", "rf", "crf", "fc"] {
            let res = resolver().resolve(&h(history), &d);
            assert_eq!(res.utility_for(0), -res.utility_for(1), "history {:?}", history);
            assert!(res.utility_for(0) != 0.0);
        }
    }

    #[test]
    fn test_is_terminal() {
        let cap = 4;
        assert!(!is_terminal(&h(""), cap));
        assert!(!is_terminal(&h("c"), cap));
        assert!(!is_terminal(&h("f"), cap));
        assert!(!is_terminal(&h("r"), cap));
        assert!(!is_terminal(&h("rr"), cap));
        assert!(!is_terminal(&h("crr"), cap));
        assert!(is_terminal(&h("cc"), cap));
        assert!(is_terminal(&h("fr"), cap));
        assert!(is_terminal(&h("rc"), cap));
        assert!(is_terminal(&h("rrrr"), cap));
        assert!(is_terminal(&h("rr"), 2));
    }
}
