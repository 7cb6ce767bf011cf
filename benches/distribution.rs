//! Benchmarks for exhaustive hand-value enumeration.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use card_market::core::{DeckSchema, GameRng};
use card_market::distribution::enumerate_ordered_sums;
use card_market::round::{Round, RoundContext};

fn bench_enumeration(c: &mut Criterion) {
    let values: Vec<i64> = (2..=14).cycle().take(52).collect();
    let mut group = c.benchmark_group("ordered_sums");
    for draws in 1..=3 {
        group.bench_with_input(BenchmarkId::from_parameter(draws), &draws, |b, &draws| {
            b.iter(|| enumerate_ordered_sums(black_box(&values), draws, 0));
        });
    }
    group.finish();
}

fn bench_round_distribution(c: &mut Criterion) {
    let context = RoundContext::from_schema(&DeckSchema::standard()).unwrap();
    let mut deck = context.reference().clone();
    let mut rng = GameRng::new(42);
    deck.shuffle(&mut rng);

    let mut round = Round::new(1, context, 3);
    for _ in 0..3 {
        round.add_card(deck.draw().unwrap()).unwrap();
    }
    round.assign_visibility(&mut rng, 0.0).unwrap();

    c.bench_function("standard_deck_three_hidden", |b| {
        b.iter(|| round.compute_value_distribution(black_box(10_000_000)).unwrap());
    });
}

criterion_group!(benches, bench_enumeration, bench_round_distribution);
criterion_main!(benches);
