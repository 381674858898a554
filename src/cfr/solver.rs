//! Counterfactual Regret Minimization traversal and training driver.
//!
//! [`Traversal`] is the recursive full-width CFR walk over one deal.
//! [`Trainer`] owns the information-set table, deals hands from a seeded
//! deck and runs traversals, either one after another or in parallel
//! batches whose accumulators are summed back into the shared table.

use std::fs;
use std::path::Path;
use std::time::Instant;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cfr::action::{Action, ActionVec, History};
use crate::cfr::config::{TrainerConfig, TrainingStats};
use crate::cfr::storage::{InfoSetKey, InfoSetTable, StorageExport, StrategySnapshot};
use crate::cfr::terminal::{is_terminal, PotLadder, TerminalResolver};
use crate::error::{Error, Result};
use crate::games::five_card::{Deal, Deck, FiveCardEvaluator, HandEvaluator};

/// One CFR pass over a single deal.
///
/// Borrows the table mutably for the duration of the walk; regrets and
/// strategy sums of every visited information set are updated in place.
pub struct Traversal<'a, E> {
    table: &'a mut InfoSetTable,
    resolver: &'a TerminalResolver<E>,
    max_actions: usize,
}

impl<'a, E: HandEvaluator> Traversal<'a, E> {
    /// Prepare a traversal writing into `table`.
    pub fn new(
        table: &'a mut InfoSetTable,
        resolver: &'a TerminalResolver<E>,
        max_actions: usize,
    ) -> Self {
        Self {
            table,
            resolver,
            max_actions,
        }
    }

    /// Counterfactual value of `history` for the player about to act.
    ///
    /// `reach0` and `reach1` are the probabilities that each player's own
    /// strategy leads to `history`. The returned utility is always from the
    /// perspective of `history.acting_player()`.
    pub fn cfr(&mut self, deal: &Deal, history: &History, reach0: f64, reach1: f64) -> f64 {
        let player = history.acting_player();

        if is_terminal(history, self.max_actions) {
            return self.resolver.resolve(history, deal).utility_for(player);
        }

        let opponent_reach = if player == 0 { reach1 } else { reach0 };
        let key = InfoSetKey::new(deal.hand(player), history);
        let strategy = self
            .table
            .get_or_create(key.clone())
            .update_strategy(opponent_reach);

        let mut utilities = ActionVec::ZERO;
        for action in Action::ALL {
            let next = history.with(action);
            let p = strategy[action];
            let child = if player == 0 {
                self.cfr(deal, &next, reach0 * p, reach1)
            } else {
                self.cfr(deal, &next, reach0, reach1 * p)
            };
            // Child values are from the opponent's point of view.
            utilities[action] = -child;
        }

        let node_utility = strategy.dot(&utilities);
        let regrets = utilities.minus_scalar(node_utility);
        self.table
            .get_or_create(key)
            .accumulate_regret(&regrets, opponent_reach);

        node_utility
    }
}

/// The CFR trainer.
///
/// Owns the information-set table for the whole run and the random source
/// used to deal hands.
///
/// # Example
/// ```
/// use five_card_cfr::cfr::{Trainer, TrainerConfig};
///
/// let mut trainer = Trainer::new(TrainerConfig::default().with_seed(42));
/// trainer.train(100);
/// assert!(trainer.num_info_sets() > 0);
/// for entry in trainer.report().iter().take(3) {
///     println!("{}: {}", entry.key, entry.strategy);
/// }
/// ```
pub struct Trainer<E = FiveCardEvaluator> {
    /// Configuration for the trainer.
    config: TrainerConfig,

    /// Pot ladder and showdown evaluation.
    resolver: TerminalResolver<E>,

    /// Regret and strategy sums.
    table: InfoSetTable,

    /// Deck reused for every deal.
    deck: Deck,

    /// Random number generator driving the shuffles.
    rng: StdRng,

    /// Traversals completed.
    iteration: u64,

    /// Statistics tracking.
    stats: TrainingStats,
}

impl Trainer<FiveCardEvaluator> {
    /// Create a trainer using the standard five-card evaluator.
    pub fn new(config: TrainerConfig) -> Self {
        Self::with_evaluator(config, FiveCardEvaluator)
    }
}

impl<E: HandEvaluator> Trainer<E> {
    /// Create a trainer with a custom hand evaluator.
    pub fn with_evaluator(config: TrainerConfig, evaluator: E) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let ladder = PotLadder::new(config.ante, config.bet);

        Self {
            resolver: TerminalResolver::new(ladder, evaluator),
            config,
            table: InfoSetTable::new(),
            deck: Deck::new(),
            rng,
            iteration: 0,
            stats: TrainingStats::new(),
        }
    }

    /// Shuffle and deal a fresh pair of hands.
    pub fn next_deal(&mut self) -> Deal {
        self.deck.shuffle_and_deal(&mut self.rng)
    }

    /// Run one traversal from the root on `deal` and return player 0's
    /// expected utility under the current strategies.
    pub fn traverse(&mut self, deal: &Deal) -> f64 {
        self.iteration += 1;
        Traversal::new(&mut self.table, &self.resolver, self.config.max_actions).cfr(
            deal,
            &History::new(),
            1.0,
            1.0,
        )
    }

    /// Deal a fresh hand and traverse it.
    pub fn run_iteration(&mut self) -> f64 {
        let deal = self.next_deal();
        self.traverse(&deal)
    }

    /// Train the trainer for a specified number of iterations, each on a
    /// freshly shuffled deal.
    ///
    /// # Returns
    /// Statistics from the training run.
    pub fn train(&mut self, iterations: u64) -> &TrainingStats {
        self.train_with_callback(iterations, u64::MAX, |_| {})
    }

    /// Train with a callback for progress tracking.
    ///
    /// # Arguments
    /// * `iterations` - Number of iterations to run
    /// * `callback_interval` - How often to call the callback
    /// * `callback` - Function called every `callback_interval` iterations
    pub fn train_with_callback<F>(
        &mut self,
        iterations: u64,
        callback_interval: u64,
        mut callback: F,
    ) -> &TrainingStats
    where
        F: FnMut(&TrainingStats),
    {
        let start_time = Instant::now();
        info!("training {} iterations on random deals", iterations);

        for i in 0..iterations {
            self.run_iteration();

            if (i + 1) % callback_interval.max(1) == 0 {
                self.refresh_stats(start_time);
                callback(&self.stats);
            }
        }

        self.refresh_stats(start_time);
        info!(
            "trained {} iterations, {} info sets, {:.0} it/s",
            self.stats.iterations, self.stats.info_sets, self.stats.iterations_per_second
        );
        &self.stats
    }

    /// Train repeatedly on the same deal.
    ///
    /// Used to study how the average strategy settles for one fixed pair of
    /// hands.
    pub fn train_fixed_deal(&mut self, deal: &Deal, iterations: u64) -> &TrainingStats {
        let start_time = Instant::now();
        info!(
            "training {} iterations on fixed deal {} vs {}",
            iterations, deal.hands[0], deal.hands[1]
        );

        for _ in 0..iterations {
            self.traverse(deal);
        }

        self.refresh_stats(start_time);
        &self.stats
    }

    /// Train until the Convergence Indicator (CI) reaches the target value.
    ///
    /// CI measures how much the average strategies moved during the last
    /// `ci_check_interval` iterations. The first interval only establishes a
    /// baseline snapshot.
    ///
    /// # Arguments
    /// * `ci_target` - Target CI value to reach
    /// * `ci_check_interval` - How many iterations between CI checks
    /// * `max_iterations` - Maximum iterations before giving up (0 = no limit)
    /// * `callback` - Optional callback for progress updates
    pub fn train_until_converged<F>(
        &mut self,
        ci_target: f64,
        ci_check_interval: u64,
        max_iterations: u64,
        mut callback: Option<F>,
    ) -> ConvergenceResult
    where
        F: FnMut(&ConvergenceStats),
    {
        let start_time = Instant::now();
        let interval = ci_check_interval.max(1);
        let mut snapshot: Option<StrategySnapshot> = None;
        let mut current_ci = f64::INFINITY;
        let mut run = 0u64;

        loop {
            for _ in 0..interval {
                self.run_iteration();
            }
            run += interval;

            if let Some(previous) = &snapshot {
                current_ci = self.table.calculate_ci(previous);
                self.stats.record_ci(self.iteration, current_ci);
            }
            snapshot = Some(self.table.snapshot_strategies());

            let elapsed = start_time.elapsed().as_secs_f64();
            let conv_stats = ConvergenceStats {
                iteration: self.iteration,
                ci: current_ci,
                info_sets: self.table.len(),
                elapsed_seconds: elapsed,
                iterations_per_second: if elapsed > 0.0 { run as f64 / elapsed } else { 0.0 },
            };
            if let Some(cb) = callback.as_mut() {
                cb(&conv_stats);
            }

            let converged = current_ci <= ci_target;
            if converged || (max_iterations > 0 && run >= max_iterations) {
                self.refresh_stats(start_time);
                info!(
                    "stopped after {} iterations, CI {:.3} (target {:.3})",
                    run, current_ci, ci_target
                );
                return ConvergenceResult {
                    converged,
                    final_ci: current_ci,
                    iterations: run,
                    elapsed_seconds: elapsed,
                };
            }
        }
    }

    /// Train with rayon workers.
    ///
    /// Each round hands every worker a copy of the table, `batch_size` deals
    /// and its own RNG seeded from the trainer's generator. When all workers
    /// finish, the change each one made is summed into the shared table.
    ///
    /// # Errors
    /// Fails only if the thread pool cannot be created.
    pub fn train_parallel(&mut self, iterations: u64) -> Result<&TrainingStats> {
        let start_time = Instant::now();
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = self.config.num_threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;
        let workers = pool.current_num_threads() as u64;
        let batch = self.config.batch_size.max(1);
        info!(
            "training {} iterations on {} workers, batch size {}",
            iterations, workers, batch
        );

        let mut remaining = iterations;
        while remaining > 0 {
            let mut jobs = Vec::with_capacity(workers as usize);
            while jobs.len() < workers as usize && remaining > 0 {
                let n = remaining.min(batch);
                remaining -= n;
                jobs.push((self.rng.gen::<u64>(), n));
            }

            let base = self.table.clone();
            let resolver = &self.resolver;
            let max_actions = self.config.max_actions;
            let tables: Vec<InfoSetTable> = pool.install(|| {
                jobs.par_iter()
                    .map(|&(seed, n)| {
                        let mut table = base.clone();
                        let mut rng = StdRng::seed_from_u64(seed);
                        let mut deck = Deck::new();
                        for _ in 0..n {
                            let deal = deck.shuffle_and_deal(&mut rng);
                            Traversal::new(&mut table, resolver, max_actions).cfr(
                                &deal,
                                &History::new(),
                                1.0,
                                1.0,
                            );
                        }
                        table
                    })
                    .collect()
            });

            for table in &tables {
                self.table.merge_delta(table, &base);
            }
            let done: u64 = jobs.iter().map(|&(_, n)| n).sum();
            self.iteration += done;
            debug!(
                "merged {} worker tables ({} deals), {} info sets",
                tables.len(),
                done,
                self.table.len()
            );
        }

        self.refresh_stats(start_time);
        Ok(&self.stats)
    }

    /// How much a best-responding opponent gains against the average
    /// strategy, averaged over `deals` and both seats.
    ///
    /// Each deal is treated as known to the exploiter, so this measures
    /// distance from equilibrium on those particular deals.
    pub fn exploitability(&self, deals: &[Deal]) -> f64 {
        if deals.is_empty() {
            return 0.0;
        }
        let root = History::new();
        let total: f64 = deals
            .iter()
            .map(|deal| {
                (0..2)
                    .map(|exploiter| {
                        self.best_response_value(deal, &root, exploiter)
                            - self.strategy_value(deal, &root, exploiter)
                    })
                    .sum::<f64>()
            })
            .sum();
        total / (deals.len() as f64 * 2.0)
    }

    /// Value for `exploiter` when they maximize and the other player follows
    /// the average strategy.
    fn best_response_value(&self, deal: &Deal, history: &History, exploiter: usize) -> f64 {
        if is_terminal(history, self.config.max_actions) {
            return self.resolver.resolve(history, deal).utility_for(exploiter);
        }

        let player = history.acting_player();
        let children = Action::ALL
            .map(|action| self.best_response_value(deal, &history.with(action), exploiter));

        if player == exploiter {
            children.into_iter().fold(f64::NEG_INFINITY, f64::max)
        } else {
            let key = InfoSetKey::new(deal.hand(player), history);
            self.table
                .average_strategy(&key)
                .dot(&ActionVec::new(children))
        }
    }

    /// Value for `player` when both sides follow the average strategy.
    fn strategy_value(&self, deal: &Deal, history: &History, player: usize) -> f64 {
        if is_terminal(history, self.config.max_actions) {
            return self.resolver.resolve(history, deal).utility_for(player);
        }

        let actor = history.acting_player();
        let key = InfoSetKey::new(deal.hand(actor), history);
        let children =
            Action::ALL.map(|action| self.strategy_value(deal, &history.with(action), player));
        self.table
            .average_strategy(&key)
            .dot(&ActionVec::new(children))
    }

    /// Average strategy of every visited information set, sorted by key.
    pub fn report(&self) -> Vec<StrategyEntry> {
        self.table
            .entries()
            .into_iter()
            .map(|(key, node)| StrategyEntry {
                key: key.to_string(),
                strategy: node.average_strategy(),
                weight: node.strategy_sum.sum(),
            })
            .collect()
    }

    /// Get the average strategy for an information set.
    ///
    /// This returns the time-averaged strategy which converges to Nash equilibrium.
    pub fn get_average_strategy(&self, key: &InfoSetKey) -> ActionVec {
        self.table.average_strategy(key)
    }

    /// Get the current iteration count.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Get the number of information sets discovered.
    pub fn num_info_sets(&self) -> usize {
        self.table.len()
    }

    /// Get current statistics.
    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// Get reference to the table for analysis.
    pub fn table(&self) -> &InfoSetTable {
        &self.table
    }

    /// Get reference to the terminal resolver.
    pub fn resolver(&self) -> &TerminalResolver<E> {
        &self.resolver
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Take a snapshot of current average strategies for CI calculation.
    pub fn snapshot_strategies(&self) -> StrategySnapshot {
        self.table.snapshot_strategies()
    }

    /// Get current CI compared to a snapshot.
    pub fn calculate_ci(&self, snapshot: &StrategySnapshot) -> f64 {
        self.table.calculate_ci(snapshot)
    }

    /// Export trainer state for checkpointing.
    pub fn export_state(&self) -> TrainerState {
        TrainerState {
            iteration: self.iteration,
            storage: self.table.export(),
            stats: self.stats.clone(),
        }
    }

    /// Import trainer state from checkpoint.
    pub fn import_state(&mut self, state: TrainerState) {
        self.iteration = state.iteration;
        self.table.import(state.storage);
        self.stats = state.stats;
    }

    /// Write the current state to `path` as JSON.
    pub fn save_checkpoint<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string(&self.export_state())?;
        fs::write(path, json).map_err(|e| Error::Io(path.to_path_buf(), e))?;
        debug!("saved checkpoint with {} info sets to {}", self.table.len(), path.display());
        Ok(())
    }

    /// Replace the current state with a checkpoint read from `path`.
    pub fn load_checkpoint<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::Io(path.to_path_buf(), e))?;
        let state: TrainerState = serde_json::from_str(&content)?;
        self.import_state(state);
        info!(
            "resumed from {} at iteration {} ({} info sets)",
            path.display(),
            self.iteration,
            self.table.len()
        );
        Ok(())
    }

    fn refresh_stats(&mut self, start_time: Instant) {
        self.stats.iterations = self.iteration;
        self.stats.info_sets = self.table.len();
        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        self.stats.update_rate();
    }
}

/// Average strategy of one information set, for reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyEntry {
    /// Info-set key.
    pub key: String,
    /// Average strategy.
    pub strategy: ActionVec,
    /// Total strategy weight accumulated; roughly how often the set was
    /// reached.
    pub weight: f64,
}

/// Serializable trainer state for checkpointing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerState {
    /// Current iteration.
    pub iteration: u64,
    /// Storage export.
    pub storage: StorageExport,
    /// Statistics.
    pub stats: TrainingStats,
}

/// Statistics during convergence-based training.
#[derive(Debug, Clone)]
pub struct ConvergenceStats {
    /// Current iteration count.
    pub iteration: u64,
    /// Current Convergence Indicator value.
    pub ci: f64,
    /// Number of information sets discovered.
    pub info_sets: usize,
    /// Elapsed time in seconds.
    pub elapsed_seconds: f64,
    /// Current solve speed.
    pub iterations_per_second: f64,
}

/// Result of convergence-based training.
#[derive(Debug, Clone)]
pub struct ConvergenceResult {
    /// Whether the target CI was reached.
    pub converged: bool,
    /// Final CI value achieved.
    pub final_ci: f64,
    /// Iterations run by this call.
    pub iterations: u64,
    /// Total elapsed time in seconds.
    pub elapsed_seconds: f64,
}
