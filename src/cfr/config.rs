//! Configuration options for the CFR trainer.
//!
//! This module provides the configuration struct that controls the game
//! shape (action cap, ante, bet size) and how training is run (seed, threads,
//! parallel batch size), plus the statistics collected while training.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Error, Result};

/// Configuration for the CFR trainer.
///
/// # Example
/// ```
/// use five_card_cfr::cfr::TrainerConfig;
///
/// let config = TrainerConfig::default().with_seed(7);
/// assert_eq!(config.max_actions, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Maximum number of actions in one hand before a forced showdown.
    ///
    /// Must be at least 2: a hand can never end on its first action.
    pub max_actions: usize,

    /// Chips in the pot before any action.
    pub ante: u32,

    /// Fixed bet increment used by raises and calls.
    pub bet: u32,

    /// Random seed for reproducibility.
    ///
    /// If set, deals are drawn from a `StdRng` seeded with this value. If
    /// `None`, the generator is seeded from entropy.
    pub seed: Option<u64>,

    /// Number of rayon workers for parallel training.
    ///
    /// `None` uses all available cores.
    pub num_threads: Option<usize>,

    /// Deals each parallel worker trains on before its accumulators are
    /// merged back into the shared table.
    pub batch_size: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_actions: 4,
            ante: 50,
            bet: 20,
            seed: None,
            num_threads: None,
            batch_size: 1_000,
        }
    }
}

impl TrainerConfig {
    /// Builder method: set the action cap.
    pub fn with_max_actions(mut self, max_actions: usize) -> Self {
        self.max_actions = max_actions;
        self
    }

    /// Builder method: set ante and bet increment.
    pub fn with_stakes(mut self, ante: u32, bet: u32) -> Self {
        self.ante = ante;
        self.bet = bet;
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set number of threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    /// Builder method: set the per-worker batch size.
    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.max_actions < 2 {
            return Err(ConfigError::InvalidMaxActions(self.max_actions));
        }
        if self.ante == 0 {
            return Err(ConfigError::InvalidAnte(self.ante));
        }
        if self.bet == 0 {
            return Err(ConfigError::InvalidBet(self.bet));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        if self.num_threads == Some(0) {
            return Err(ConfigError::InvalidThreads);
        }
        Ok(())
    }

    /// Load and validate configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::Io(path.to_path_buf(), e))?;
        Self::from_json_str(&content)
    }

    /// Parse and validate configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Errors that can occur when validating trainer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The action cap would allow a hand to end before both players act.
    #[error("max_actions {0} must be at least 2")]
    InvalidMaxActions(usize),
    /// An empty starting pot makes every fold worthless.
    #[error("ante {0} must be positive")]
    InvalidAnte(u32),
    /// A zero increment collapses the pot ladder.
    #[error("bet {0} must be positive")]
    InvalidBet(u32),
    /// Parallel workers need at least one deal per batch.
    #[error("batch_size must be positive")]
    InvalidBatchSize,
    /// A thread pool cannot have zero workers.
    #[error("num_threads must be positive when set")]
    InvalidThreads,
}

/// Statistics tracked during training.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Total number of traversals completed.
    pub iterations: u64,

    /// Number of unique information sets discovered.
    pub info_sets: usize,

    /// Total time spent training (in seconds).
    pub elapsed_seconds: f64,

    /// Iterations per second.
    pub iterations_per_second: f64,

    /// History of convergence indicator measurements.
    pub convergence_history: Vec<ConvergencePoint>,
}

/// A single convergence indicator measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergencePoint {
    /// Iteration number when this measurement was taken.
    pub iteration: u64,
    /// Convergence indicator at that point.
    pub ci: f64,
}

impl TrainingStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update iterations per second based on elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.iterations_per_second = self.iterations as f64 / self.elapsed_seconds;
        }
    }

    /// Record a convergence indicator measurement.
    pub fn record_ci(&mut self, iteration: u64, ci: f64) {
        self.convergence_history.push(ConvergencePoint { iteration, ci });
    }
}
