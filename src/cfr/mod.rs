//! CFR (Counterfactual Regret Minimization) trainer for heads-up
//! fixed-limit five-card poker.
//!
//! # Overview
//!
//! Every iteration deals both players five cards and walks the full betting
//! tree. At each decision point the acting player's information set is
//! identified by their own cards plus the public action history. The trainer:
//! 1. Computes the current strategy from positive regrets (regret matching)
//! 2. Accumulates that strategy, weighted by the opponent's reach
//! 3. Accumulates counterfactual regret for every action
//!
//! The average strategy over all iterations is the training output.
//!
//! # Usage
//!
//! ```
//! use five_card_cfr::cfr::{Trainer, TrainerConfig};
//!
//! let config = TrainerConfig::default().with_seed(7);
//! let mut trainer = Trainer::new(config);
//!
//! let stats = trainer.train(200);
//! println!("Trained {} info sets in {:.2}s", stats.info_sets, stats.elapsed_seconds);
//! ```
//!
//! # Theory
//!
//! **Regret**: The difference between the value of an action and the value of the current strategy.
//! ```text
//! Regret(a) = Value(a) - Value(current_strategy)
//! ```
//!
//! **Regret Matching**: Set strategy proportional to positive regrets.
//! ```text
//! Strategy(a) = max(0, Regret(a)) / sum(max(0, Regret(a')))
//! ```
//!
//! # References
//!
//! - Zinkevich, M., et al. "Regret Minimization in Games with Incomplete Information" (2007)

pub mod action;
pub mod config;
pub mod node;
pub mod solver;
pub mod storage;
pub mod terminal;

// Re-export main types for convenient access
pub use action::{Action, ActionVec, History, NUM_ACTIONS};
pub use config::{ConfigError, ConvergencePoint, TrainerConfig, TrainingStats};
pub use node::RegretNode;
pub use solver::{
    ConvergenceResult, ConvergenceStats, StrategyEntry, Trainer, TrainerState, Traversal,
};
pub use storage::{InfoSetKey, InfoSetTable, StorageExport, StrategySnapshot};
pub use terminal::{is_terminal, Outcome, PotLadder, Resolution, TerminalResolver};
