//! Storage for CFR regrets and strategies.
//!
//! This module provides the information-set table that owns every
//! [`RegretNode`] for a training run, along with strategy snapshots for the
//! convergence indicator and a serializable export format for checkpoints.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cfr::action::{ActionVec, History};
use crate::cfr::node::RegretNode;
use crate::games::five_card::Hand;

/// Identifies an information set: the acting player's cards (highest first)
/// followed by the public action history, e.g. `AsKh9d5c2c:rc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InfoSetKey(String);

impl InfoSetKey {
    /// Key for `hand` facing `history`.
    pub fn new(hand: &Hand, history: &History) -> Self {
        let mut key = hand.canonical();
        key.push(':');
        key.push_str(&history.to_string());
        Self(key)
    }

    /// Key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InfoSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InfoSetKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Owns one [`RegretNode`] per information set for the lifetime of a run.
///
/// Nodes are created lazily, zero-initialized, and never removed.
#[derive(Debug, Clone, Default)]
pub struct InfoSetTable {
    nodes: FxHashMap<InfoSetKey, RegretNode>,
}

impl InfoSetTable {
    /// Create new empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// The node for `key`, created zeroed if this is the first visit.
    pub fn get_or_create(&mut self, key: InfoSetKey) -> &mut RegretNode {
        self.nodes.entry(key).or_default()
    }

    /// The node for `key`, if it has been visited.
    pub fn get(&self, key: &InfoSetKey) -> Option<&RegretNode> {
        self.nodes.get(key)
    }

    /// Check if an info set exists in storage.
    pub fn contains(&self, key: &InfoSetKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Get the number of information sets stored.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True before any node has been created.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All entries, sorted by key.
    pub fn entries(&self) -> Vec<(&InfoSetKey, &RegretNode)> {
        let mut entries: Vec<_> = self.nodes.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Average strategy at `key`; uniform for unvisited info sets.
    pub fn average_strategy(&self, key: &InfoSetKey) -> ActionVec {
        self.nodes
            .get(key)
            .map_or(ActionVec::UNIFORM, RegretNode::average_strategy)
    }

    /// Apply the change a worker made, `updated - base`, to this table.
    ///
    /// Nodes the worker discovered that are missing here are created first.
    pub fn merge_delta(&mut self, updated: &InfoSetTable, base: &InfoSetTable) {
        let empty = RegretNode::new();
        for (key, node) in &updated.nodes {
            let before = base.nodes.get(key).unwrap_or(&empty);
            if node == before {
                continue;
            }
            self.nodes
                .entry(key.clone())
                .or_default()
                .absorb_delta(node, before);
        }
    }

    /// Export storage to serializable format.
    pub fn export(&self) -> StorageExport {
        StorageExport {
            nodes: self.nodes.clone(),
        }
    }

    /// Import storage from serialized format, replacing the current contents.
    pub fn import(&mut self, data: StorageExport) {
        self.nodes = data.nodes;
    }
}

/// Serializable export format for storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageExport {
    /// Regret and strategy sums per info set.
    pub nodes: FxHashMap<InfoSetKey, RegretNode>,
}

/// Snapshot of average strategies for CI calculation.
#[derive(Debug, Clone, Default)]
pub struct StrategySnapshot {
    /// Average strategies per info set.
    pub strategies: FxHashMap<InfoSetKey, ActionVec>,
    /// Strategy sum totals; zero means the info set was never reached with
    /// positive weight.
    pub totals: FxHashMap<InfoSetKey, f64>,
}

impl InfoSetTable {
    /// Create a snapshot of all current average strategies.
    ///
    /// Used for calculating the Convergence Indicator (CI).
    pub fn snapshot_strategies(&self) -> StrategySnapshot {
        let mut snapshot = StrategySnapshot::default();
        for (key, node) in &self.nodes {
            snapshot.strategies.insert(key.clone(), node.average_strategy());
            snapshot.totals.insert(key.clone(), node.strategy_sum.sum());
        }
        snapshot
    }

    /// Calculate the Convergence Indicator by comparing current average
    /// strategies to a snapshot.
    ///
    /// CI = 100 * mean over info sets of Σ|new − old|. Info sets with no
    /// strategy weight in either the table or the snapshot are skipped; info
    /// sets discovered after the snapshot are compared against uniform.
    /// Returns infinity when there is nothing to compare.
    pub fn calculate_ci(&self, snapshot: &StrategySnapshot) -> f64 {
        let mut total_change = 0.0;
        let mut counted = 0usize;

        for (key, node) in &self.nodes {
            let current_total = node.strategy_sum.sum();
            let old_total = snapshot.totals.get(key).copied().unwrap_or(0.0);
            if current_total == 0.0 && old_total == 0.0 {
                continue;
            }

            let old = snapshot
                .strategies
                .get(key)
                .copied()
                .unwrap_or(ActionVec::UNIFORM);
            total_change += node.average_strategy().l1_distance(&old);
            counted += 1;
        }

        if counted == 0 {
            return f64::INFINITY;
        }
        100.0 * total_change / counted as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfr::action::Action;

    fn key(s: &str) -> InfoSetKey {
        InfoSetKey::from(s)
    }

    #[test]
    fn test_key_canonicalizes_cards() {
        let a: Hand = "2c 9d As 5c Kh".parse().unwrap();
        let b: Hand = "As Kh 9d 5c 2c".parse().unwrap();
        let history: History = "rc".parse().unwrap();

        assert_eq!(InfoSetKey::new(&a, &history).as_str(), "AsKh9d5c2c:rc");
        assert_eq!(InfoSetKey::new(&a, &history), InfoSetKey::new(&b, &history));

        let other: Hand = "As Kh 9d 5c 2d".parse().unwrap();
        assert_ne!(InfoSetKey::new(&a, &history), InfoSetKey::new(&other, &history));
        assert_ne!(
            InfoSetKey::new(&a, &history),
            InfoSetKey::new(&a, &"r".parse().unwrap())
        );
    }

    #[test]
    fn test_get_or_create_returns_same_node() {
        let mut table = InfoSetTable::new();
        let first = table.get_or_create(key("A:")) as *const RegretNode;
        let again = table.get_or_create(key("A:")) as *const RegretNode;
        assert!(std::ptr::eq(first, again));
        assert_eq!(table.len(), 1);

        table.get_or_create(key("A:")).regret_sum[Action::Call] = 5.0;
        assert_eq!(table.get(&key("A:")).unwrap().regret_sum[Action::Call], 5.0);

        let other = table.get_or_create(key("B:")) as *const RegretNode;
        assert!(!std::ptr::eq(first, other));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&key("B:")), Some(&RegretNode::new()));
    }

    #[test]
    fn test_entries_sorted() {
        let mut table = InfoSetTable::new();
        for k in ["c:", "a:", "b:"] {
            table.get_or_create(key(k));
        }
        let keys: Vec<&str> = table.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a:", "b:", "c:"]);
    }

    #[test]
    fn test_unvisited_average_is_uniform() {
        let table = InfoSetTable::new();
        assert_eq!(table.average_strategy(&key("nope")), ActionVec::UNIFORM);
    }

    #[test]
    fn test_merge_delta_sums_worker_changes() {
        let mut main = InfoSetTable::new();
        main.get_or_create(key("x")).regret_sum = ActionVec::new([1.0, 0.0, 0.0]);
        let base = main.clone();

        let mut w1 = base.clone();
        w1.get_or_create(key("x")).regret_sum[Action::Raise] += 2.0;
        w1.get_or_create(key("y")).strategy_sum[Action::Fold] = 1.0;

        let mut w2 = base.clone();
        w2.get_or_create(key("x")).regret_sum[Action::Call] -= 3.0;

        main.merge_delta(&w1, &base);
        main.merge_delta(&w2, &base);

        assert_eq!(main.get(&key("x")).unwrap().regret_sum.values(), [3.0, -3.0, 0.0]);
        assert_eq!(main.get(&key("y")).unwrap().strategy_sum.values(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_ci_measures_strategy_change() {
        let mut table = InfoSetTable::new();
        assert!(table.calculate_ci(&table.snapshot_strategies()).is_infinite());

        table.get_or_create(key("x")).strategy_sum = ActionVec::new([1.0, 1.0, 0.0]);
        let snapshot = table.snapshot_strategies();
        assert_eq!(table.calculate_ci(&snapshot), 0.0);

        table.get_or_create(key("x")).strategy_sum = ActionVec::new([2.0, 0.0, 0.0]);
        // [1, 0, 0] vs [0.5, 0.5, 0] differs by 1.0 in total.
        assert!((table.calculate_ci(&snapshot) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_export_import_roundtrip_through_json() {
        let mut table = InfoSetTable::new();
        let node = table.get_or_create(key("AsKh9d5c2c:r"));
        node.regret_sum = ActionVec::new([1.5, -2.0, 0.25]);
        node.strategy_sum = ActionVec::new([3.0, 1.0, 0.0]);

        let json = serde_json::to_string(&table.export()).unwrap();
        assert!(json.contains("AsKh9d5c2c:r"));

        let mut restored = InfoSetTable::new();
        restored.import(serde_json::from_str(&json).unwrap());
        assert_eq!(restored.get(&key("AsKh9d5c2c:r")), table.get(&key("AsKh9d5c2c:r")));
    }
}
