//! Betting actions, per-action vectors and action histories.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Number of actions available at every decision point.
pub const NUM_ACTIONS: usize = 3;

/// A betting action.
///
/// The declaration order is the order every strategy, regret and utility
/// vector is laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    /// Bet one increment, or re-raise a pending bet.
    Raise,
    /// Match a pending bet, or check when nothing is owed.
    Call,
    /// Give up the hand.
    Fold,
}

impl Action {
    /// All actions, in vector order.
    pub const ALL: [Action; NUM_ACTIONS] = [Action::Raise, Action::Call, Action::Fold];

    /// Position of this action inside an [`ActionVec`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Action::Raise => 0,
            Action::Call => 1,
            Action::Fold => 2,
        }
    }

    /// Single-character symbol used in histories and info-set keys.
    #[inline]
    pub fn symbol(self) -> char {
        match self {
            Action::Raise => 'r',
            Action::Call => 'c',
            Action::Fold => 'f',
        }
    }

    /// Inverse of [`Action::symbol`].
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'r' => Some(Action::Raise),
            'c' => Some(Action::Call),
            'f' => Some(Action::Fold),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Raise => write!(f, "Raise"),
            Action::Call => write!(f, "Call"),
            Action::Fold => write!(f, "Fold"),
        }
    }
}

/// One `f64` per action, indexed by [`Action`].
///
/// Used for strategies, cumulative regrets, strategy sums and per-action
/// utilities alike.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionVec([f64; NUM_ACTIONS]);

impl ActionVec {
    /// All zeros.
    pub const ZERO: ActionVec = ActionVec([0.0; NUM_ACTIONS]);

    /// Equal weight on every action.
    pub const UNIFORM: ActionVec = ActionVec([1.0 / NUM_ACTIONS as f64; NUM_ACTIONS]);

    /// Wrap raw values laid out in [`Action::ALL`] order.
    pub fn new(values: [f64; NUM_ACTIONS]) -> Self {
        Self(values)
    }

    /// Raw values in [`Action::ALL`] order.
    pub fn values(&self) -> [f64; NUM_ACTIONS] {
        self.0
    }

    /// Sum of all components.
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Dot product with another vector.
    pub fn dot(&self, other: &ActionVec) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    /// Componentwise `max(x, 0)`.
    pub fn positive_part(&self) -> ActionVec {
        ActionVec(self.0.map(|x| x.max(0.0)))
    }

    /// Divide by the component sum, or `None` when the sum is not positive.
    pub fn normalized(&self) -> Option<ActionVec> {
        let total = self.sum();
        if total > 0.0 {
            Some(ActionVec(self.0.map(|x| x / total)))
        } else {
            None
        }
    }

    /// `self += other * weight`.
    pub fn add_scaled(&mut self, other: &ActionVec, weight: f64) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a += b * weight;
        }
    }

    /// Subtract `value` from every component.
    pub fn minus_scalar(&self, value: f64) -> ActionVec {
        ActionVec(self.0.map(|x| x - value))
    }

    /// Componentwise difference `self - other`.
    pub fn minus(&self, other: &ActionVec) -> ActionVec {
        let mut out = self.0;
        for (a, b) in out.iter_mut().zip(other.0.iter()) {
            *a -= b;
        }
        ActionVec(out)
    }

    /// Sum of absolute componentwise differences.
    pub fn l1_distance(&self, other: &ActionVec) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| (a - b).abs()).sum()
    }

    /// Iterate `(action, value)` pairs in action order.
    pub fn iter(&self) -> impl Iterator<Item = (Action, f64)> + '_ {
        Action::ALL.into_iter().map(move |a| (a, self[a]))
    }
}

impl Index<Action> for ActionVec {
    type Output = f64;

    #[inline]
    fn index(&self, action: Action) -> &f64 {
        &self.0[action.index()]
    }
}

impl IndexMut<Action> for ActionVec {
    #[inline]
    fn index_mut(&mut self, action: Action) -> &mut f64 {
        &mut self.0[action.index()]
    }
}

impl fmt::Display for ActionVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "r={:.3} c={:.3} f={:.3}",
            self[Action::Raise],
            self[Action::Call],
            self[Action::Fold]
        )
    }
}

/// The public sequence of actions taken so far in a hand.
///
/// The player to act is `len() % 2`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct History {
    actions: Vec<Action>,
}

impl History {
    /// Empty history (start of a hand).
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actions taken.
    #[inline]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True before the first action.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The actions in order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Most recent action.
    pub fn last(&self) -> Option<Action> {
        self.actions.last().copied()
    }

    /// Index of the first fold, if any.
    pub fn fold_position(&self) -> Option<usize> {
        self.actions.iter().position(|&a| a == Action::Fold)
    }

    /// Player due to act next (0 or 1).
    #[inline]
    pub fn acting_player(&self) -> usize {
        self.actions.len() % 2
    }

    /// A new history with `action` appended.
    pub fn with(&self, action: Action) -> History {
        let mut actions = Vec::with_capacity(self.actions.len() + 1);
        actions.extend_from_slice(&self.actions);
        actions.push(action);
        History { actions }
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for action in &self.actions {
            write!(f, "{}", action.symbol())?;
        }
        Ok(())
    }
}

impl FromStr for History {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let actions = s
            .chars()
            .map(|c| Action::from_symbol(c).ok_or(Error::HistoryParse(c)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(History { actions })
    }
}
