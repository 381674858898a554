//! Five-card CFR training binary.
//!
//! Usage:
//!   cargo run --release --bin train -- [OPTIONS]
//!
//! Set `RUST_LOG=debug` to see per-batch merge logs in parallel mode.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde::Serialize;

use five_card_cfr::cfr::{ConvergenceStats, StrategyEntry, Trainer, TrainerConfig, TrainingStats};
use five_card_cfr::games::five_card::FiveCardEvaluator;
use five_card_cfr::{Error, Result};

#[derive(Parser)]
#[command(name = "train")]
#[command(about = "Train CFR strategies for heads-up fixed-limit five-card poker")]
struct Cli {
    /// Number of training iterations (max iterations when --ci is set; 0 = no limit)
    #[arg(short, long, default_value_t = 10_000)]
    iterations: u64,

    /// Random seed for reproducible deals
    #[arg(short, long)]
    seed: Option<u64>,

    /// Cap on actions per hand (overrides config)
    #[arg(long)]
    max_actions: Option<usize>,

    /// Deal one hand and train on it repeatedly
    #[arg(long)]
    fixed_deal: bool,

    /// Train with rayon workers
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel (default: all cores)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Train until the convergence indicator drops to this value
    #[arg(long)]
    ci: Option<f64>,

    /// Iterations between convergence checks
    #[arg(long, default_value_t = 1_000)]
    ci_interval: u64,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the strategy report as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Checkpoint file; resumed from if it exists and written after training
    #[arg(long)]
    checkpoint: Option<PathBuf>,

    /// Number of report entries to print
    #[arg(long, default_value_t = 20)]
    top: usize,
}

#[derive(Serialize)]
struct Report<'a> {
    config: &'a TrainerConfig,
    stats: &'a TrainingStats,
    strategies: Vec<StrategyEntry>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            println!("Loading configuration from: {}", path.display());
            TrainerConfig::from_json_file(path)?
        }
        None => TrainerConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(max_actions) = cli.max_actions {
        config = config.with_max_actions(max_actions);
    }
    if let Some(threads) = cli.threads {
        config = config.with_threads(threads);
    }
    config.validate()?;

    println!("=================================================");
    println!("  Five-Card CFR Trainer");
    println!("=================================================");
    println!();
    println!("Max actions: {}", config.max_actions);
    println!("Ante: {}  Bet: {}", config.ante, config.bet);
    if let Some(seed) = config.seed {
        println!("Seed: {}", seed);
    }
    println!();

    let mut trainer = Trainer::new(config);

    if let Some(path) = &cli.checkpoint {
        if path.exists() {
            trainer.load_checkpoint(path)?;
            println!(
                "Resumed from {} at iteration {}",
                path.display(),
                trainer.iteration()
            );
        }
    }

    if cli.fixed_deal {
        let deal = trainer.next_deal();
        let [p0, p1] = deal
            .hands
            .map(|hand| FiveCardEvaluator.evaluate_5(hand.cards()).category());
        println!(
            "Fixed deal: P0 {} ({})  P1 {} ({})",
            deal.hands[0],
            p0.name(),
            deal.hands[1],
            p1.name()
        );
        println!(
            "Exploitability before: {:.3}",
            trainer.exploitability(&[deal])
        );
        trainer.train_fixed_deal(&deal, cli.iterations);
        println!(
            "Exploitability after:  {:.3}",
            trainer.exploitability(&[deal])
        );
    } else if let Some(target) = cli.ci {
        println!("Target CI: {} (Convergence Indicator)", target);
        let result = trainer.train_until_converged(
            target,
            cli.ci_interval,
            cli.iterations,
            Some(|s: &ConvergenceStats| {
                println!(
                    "  iter {:>10}  CI {:>8.3}  info sets {:>8}  {:>8.0} it/s",
                    s.iteration, s.ci, s.info_sets, s.iterations_per_second
                );
            }),
        );
        println!();
        if result.converged {
            println!("Converged! Final CI: {:.2} (target: {:.2})", result.final_ci, target);
        } else {
            println!(
                "Stopped at max iterations. Final CI: {:.2} (target: {:.2})",
                result.final_ci, target
            );
        }
    } else if cli.parallel {
        trainer.train_parallel(cli.iterations)?;
    } else {
        let bar = ProgressBar::new(cli.iterations);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        let interval = (cli.iterations / 100).max(1);
        trainer.train_with_callback(cli.iterations, interval, |stats| {
            bar.set_position(stats.iterations.min(cli.iterations));
            bar.set_message(format!("{} info sets", stats.info_sets));
        });
        bar.finish_and_clear();
    }

    let stats = trainer.stats();
    println!();
    println!("Training complete!");
    println!("Total iterations: {}", trainer.iteration());
    println!("Info sets: {}", trainer.num_info_sets());
    println!("Total time: {:.2}s", stats.elapsed_seconds);
    println!("Average speed: {:.0} iterations/second", stats.iterations_per_second);
    println!();

    let mut report = trainer.report();
    report.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.key.cmp(&b.key)));

    println!("{:<24} {:>8} {:>8} {:>8} {:>12}", "info set", "raise", "call", "fold", "weight");
    for entry in report.iter().take(cli.top) {
        let [raise, call, fold] = entry.strategy.values();
        println!(
            "{:<24} {:>8.3} {:>8.3} {:>8.3} {:>12.1}",
            entry.key, raise, call, fold, entry.weight
        );
    }

    if let Some(path) = &cli.checkpoint {
        trainer.save_checkpoint(path)?;
        println!();
        println!("Checkpoint saved to {}", path.display());
    }

    if let Some(path) = &cli.output {
        let json = serde_json::to_string_pretty(&Report {
            config: trainer.config(),
            stats: trainer.stats(),
            strategies: report,
        })?;
        fs::write(path, json).map_err(|e| Error::Io(path.clone(), e))?;
        info!("wrote report to {}", path.display());
        println!("Report saved to {}", path.display());
    }

    Ok(())
}
