//! Benchmarks for the CFR trainer.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use five_card_cfr::cfr::{Trainer, TrainerConfig};
use five_card_cfr::games::five_card::{Deal, FiveCardEvaluator, Hand, HandEvaluator};

fn single_traversal_benchmark(c: &mut Criterion) {
    let mut trainer = Trainer::new(TrainerConfig::default().with_seed(42));

    c.bench_function("five_card_single_iteration", |b| {
        b.iter(|| black_box(trainer.run_iteration()))
    });
}

fn fixed_deal_benchmark(c: &mut Criterion) {
    let p0: Hand = "AsKsQsJsTs".parse().unwrap();
    let p1: Hand = "2c3d4h5s7c".parse().unwrap();
    let deal = Deal::new(p0, p1);
    let mut trainer = Trainer::new(TrainerConfig::default());

    c.bench_function("five_card_fixed_deal_traversal", |b| {
        b.iter(|| black_box(trainer.traverse(black_box(&deal))))
    });
}

fn thousand_iterations_benchmark(c: &mut Criterion) {
    c.bench_function("five_card_1000_iterations", |b| {
        b.iter(|| {
            let mut trainer = Trainer::new(TrainerConfig::default().with_seed(42));
            trainer.train(black_box(1000)).info_sets
        })
    });
}

fn showdown_benchmark(c: &mut Criterion) {
    let hand: Hand = "KhKd7s7c2d".parse().unwrap();
    let eval = FiveCardEvaluator;

    c.bench_function("five_card_best_score", |b| {
        b.iter(|| black_box(eval.best_score(black_box(hand.cards()))))
    });
}

criterion_group!(
    benches,
    single_traversal_benchmark,
    fixed_deal_benchmark,
    thousand_iterations_benchmark,
    showdown_benchmark
);
criterion_main!(benches);
