//! # Five-Card CFR
//!
//! Counterfactual Regret Minimization for a two-player, fixed-limit,
//! five-card poker variant. Each player receives five private cards; the
//! betting round allows raise, call and fold with a fixed increment and a cap
//! on the number of actions.
//!
//! ## Features
//!
//! - **Vanilla CFR**: Full-width traversal with regret matching
//! - **Parallel Training**: Rayon workers whose table deltas are merged
//! - **Checkpointing**: Save and resume trainer state as JSON
//! - **Convergence Indicator**: Stop once average strategies stop moving
//! - **Exploitability**: Best-response gap on a set of deals
//!
//! ## Quick Start
//!
//! ```
//! use five_card_cfr::{Trainer, TrainerConfig};
//!
//! let mut trainer = Trainer::new(TrainerConfig::default().with_seed(1));
//! trainer.train(100);
//!
//! for entry in trainer.report().iter().take(5) {
//!     println!("{} {}", entry.key, entry.strategy);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`cfr`]: Betting model, regret storage and the trainer
//! - [`games`]: Cards, deck and hand evaluation
//! - [`error`]: Crate error type

#![warn(missing_docs)]

/// CFR (Counterfactual Regret Minimization) trainer module.
pub mod cfr;

pub mod error;

/// Cards, dealing and hand evaluation.
pub mod games;

// Re-export commonly used types at crate root for convenience
pub use cfr::{Action, ActionVec, History, InfoSetKey, Trainer, TrainerConfig, TrainingStats};
pub use error::{Error, Result};
