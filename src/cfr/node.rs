//! Regret-matching state for a single information set.

use serde::{Deserialize, Serialize};

use crate::cfr::action::ActionVec;

/// Cumulative regret and strategy weight for one information set.
///
/// `regret_sum` may go negative; `strategy_sum` only ever grows. Every
/// strategy handed out by this type is a probability distribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegretNode {
    /// Cumulative counterfactual regret per action.
    pub regret_sum: ActionVec,
    /// Cumulative reach-weighted strategy per action.
    pub strategy_sum: ActionVec,
}

impl RegretNode {
    /// A node with no accumulated regret or strategy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Regret matching: the strategy proportional to positive regret, or
    /// uniform when no action has positive regret.
    pub fn current_strategy(&self) -> ActionVec {
        self.regret_sum
            .positive_part()
            .normalized()
            .unwrap_or(ActionVec::UNIFORM)
    }

    /// Compute this iteration's strategy and add it to the strategy sum,
    /// weighted by `opponent_reach`.
    pub fn update_strategy(&mut self, opponent_reach: f64) -> ActionVec {
        debug_assert!(opponent_reach >= 0.0, "reach probability must be non-negative");

        let strategy = self.current_strategy();
        self.strategy_sum.add_scaled(&strategy, opponent_reach);
        strategy
    }

    /// Time-averaged strategy. This is what converges to equilibrium.
    pub fn average_strategy(&self) -> ActionVec {
        self.strategy_sum.normalized().unwrap_or(ActionVec::UNIFORM)
    }

    /// `regret_sum += regrets * weight`.
    pub fn accumulate_regret(&mut self, regrets: &ActionVec, weight: f64) {
        self.regret_sum.add_scaled(regrets, weight);
    }

    /// Add the change `updated - base` to this node.
    ///
    /// `base` is the state a worker started from and `updated` is where it
    /// finished; both sums are additive so deltas from several workers can be
    /// applied in any order.
    pub fn absorb_delta(&mut self, updated: &RegretNode, base: &RegretNode) {
        self.regret_sum
            .add_scaled(&updated.regret_sum.minus(&base.regret_sum), 1.0);
        self.strategy_sum
            .add_scaled(&updated.strategy_sum.minus(&base.strategy_sum), 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfr::action::Action;

    fn assert_distribution(s: &ActionVec) {
        assert!((s.sum() - 1.0).abs() < 1e-12, "strategy {} does not sum to 1", s);
        for (_, p) in s.iter() {
            assert!(p >= 0.0, "strategy {} has a negative component", s);
        }
    }

    #[test]
    fn test_fresh_node_is_uniform() {
        let node = RegretNode::new();
        assert_eq!(node.average_strategy(), ActionVec::UNIFORM);
        assert_eq!(node.current_strategy(), ActionVec::UNIFORM);
        for (_, p) in node.average_strategy().iter() {
            assert_eq!(p, 1.0 / 3.0);
        }
    }

    #[test]
    fn test_strategy_is_distribution_for_any_regret() {
        let cases = [
            [0.0, 0.0, 0.0],
            [-5.0, -1.0, -0.5],
            [3.0, -2.0, 1.0],
            [1e-300, 0.0, 0.0],
            [1e12, 1e12, -1e12],
            [-0.0, 4.0, 0.0],
        ];
        for regrets in cases {
            let mut node = RegretNode {
                regret_sum: ActionVec::new(regrets),
                strategy_sum: ActionVec::ZERO,
            };
            assert_distribution(&node.update_strategy(0.7));
            assert_distribution(&node.average_strategy());
        }
    }

    #[test]
    fn test_regret_matching_proportions() {
        let mut node = RegretNode {
            regret_sum: ActionVec::new([3.0, -2.0, 1.0]),
            strategy_sum: ActionVec::ZERO,
        };
        let s = node.update_strategy(1.0);
        assert!((s[Action::Raise] - 0.75).abs() < 1e-12);
        assert_eq!(s[Action::Call], 0.0);
        assert!((s[Action::Fold] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_strategy_sum_weighted_by_opponent_reach() {
        let mut node = RegretNode {
            regret_sum: ActionVec::new([0.0, 2.0, 0.0]),
            strategy_sum: ActionVec::ZERO,
        };
        node.update_strategy(0.25);
        node.update_strategy(0.5);
        assert_eq!(node.strategy_sum.values(), [0.0, 0.75, 0.0]);
        assert_eq!(node.average_strategy()[Action::Call], 1.0);

        // Zero opponent reach contributes nothing to the average.
        let mut unreachable = RegretNode::new();
        unreachable.update_strategy(0.0);
        assert_eq!(unreachable.strategy_sum, ActionVec::ZERO);
        assert_eq!(unreachable.average_strategy(), ActionVec::UNIFORM);
    }

    #[test]
    fn test_absorb_delta() {
        let base = RegretNode {
            regret_sum: ActionVec::new([1.0, 1.0, 1.0]),
            strategy_sum: ActionVec::new([2.0, 0.0, 0.0]),
        };
        let updated = RegretNode {
            regret_sum: ActionVec::new([4.0, 0.0, 1.0]),
            strategy_sum: ActionVec::new([2.5, 1.0, 0.0]),
        };
        let mut target = base.clone();
        target.absorb_delta(&updated, &base);
        target.absorb_delta(&updated, &base);
        assert_eq!(target.regret_sum.values(), [7.0, -1.0, 1.0]);
        assert_eq!(target.strategy_sum.values(), [3.0, 2.0, 0.0]);
    }
}
