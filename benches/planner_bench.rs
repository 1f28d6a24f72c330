//! Criterion benchmarks for u-tempo.
//!
//! Synthetic task chains measure propagation and search overhead
//! independent of any real instance.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_tempo::consistency::{ArcConsistency, ArcSeed};
use u_tempo::temporal::{Bound, PlannerConfig, Relation, TemporalPlanner, TemporalProblem};

// ===========================================================================
// Chain: t0 before t1 before ... before t(n-1), each of duration 2
// ===========================================================================

fn chain(n: usize) -> TemporalProblem {
    let mut problem = TemporalProblem::new();
    for i in 0..n {
        problem.add_task(format!("t{i}"), 2).unwrap();
    }
    for i in 1..n {
        let rel = if i % 2 == 0 { Relation::Before } else { Relation::Meets };
        problem.add_relation(format!("t{}", i - 1), rel, format!("t{i}"));
    }
    problem.add_bound("t0", Bound::StartsAfter(1));
    problem
}

// ===========================================================================
// Cycle: the chain closed back on itself, infeasible after propagation
// ===========================================================================

fn cycle(n: usize) -> TemporalProblem {
    let mut problem = chain(n);
    problem.add_relation(format!("t{}", n - 1), Relation::Before, "t0");
    problem
}

fn bench_chain_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_solve");
    group.sample_size(10);
    let config = PlannerConfig::default();

    for n in [4, 8, 16] {
        let problem = chain(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &problem, |b, p| {
            b.iter(|| TemporalPlanner::solve(black_box(p), &config).unwrap());
        });
    }
    group.finish();
}

fn bench_cycle_refute(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycle_refute");
    group.sample_size(10);
    let config = PlannerConfig::default();

    for n in [4, 8, 16] {
        let problem = cycle(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &problem, |b, p| {
            b.iter(|| TemporalPlanner::solve(black_box(p), &config).unwrap());
        });
    }
    group.finish();
}

fn bench_root_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("root_propagation");
    group.sample_size(20);

    for n in [8, 32] {
        let model = chain(n).compile(100).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &model, |b, m| {
            let ac = ArcConsistency::new(m.csp());
            b.iter(|| {
                let mut domains = m.csp().initial_domains().clone();
                ac.propagate(black_box(&mut domains), ArcSeed::All)
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_chain_solve,
    bench_cycle_refute,
    bench_root_propagation
);
criterion_main!(benches);
