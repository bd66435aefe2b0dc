use std::hint::black_box;

use casino_rs::slots::{Grid, MachineConfig, SequenceSource, SlotMachine};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_spin(c: &mut Criterion) {
    let mut g = c.benchmark_group("spin");
    for seed in [1u64, 42] {
        let mut machine = SlotMachine::standard(seed);
        g.bench_with_input(BenchmarkId::new("seeded", seed), &10.0, |b, &wager| {
            b.iter(|| machine.spin(black_box(wager)))
        });
    }
    g.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let machine =
        SlotMachine::new(MachineConfig::default(), SequenceSource::constant(0.5)).unwrap();
    let cherry = machine.symbol("cherry").unwrap().clone();
    let wild = machine.symbol("wild").unwrap().clone();
    let all_cherry = Grid::filled(3, 5, cherry.clone());
    let mut cells = vec![cherry; 15];
    for i in [0, 6, 12] {
        cells[i] = wild.clone();
    }
    let mixed = Grid::from_cells(3, 5, cells).unwrap();

    let mut g = c.benchmark_group("evaluate_grid");
    g.bench_with_input(BenchmarkId::new("all_cherry", 15), &all_cherry, |b, grid| {
        b.iter(|| machine.evaluate_grid(black_box(grid)))
    });
    g.bench_with_input(BenchmarkId::new("wild_diagonal", 3), &mixed, |b, grid| {
        b.iter(|| machine.evaluate_grid(black_box(grid)))
    });
    g.finish();
}

criterion_group!(benches, bench_spin, bench_evaluate);
criterion_main!(benches);
