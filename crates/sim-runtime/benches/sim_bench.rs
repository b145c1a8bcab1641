use criterion::{criterion_group, criterion_main, Criterion};

fn bench_ticks(c: &mut Criterion) {
    let cfg = sim_core::SimConfig {
        n_households: 1000,
        persons_per_household: 2,
        rng_seed: 42,
    };
    let mut env = sim_runtime::Environment::new(sim_core::Policy::default(), &cfg);
    c.bench_function("sim_month", |b| {
        b.iter(|| {
            let _ = sim_runtime::run_months(&mut env, 1);
        })
    });
}

fn bench_full_run(c: &mut Criterion) {
    let cfg = sim_core::SimConfig {
        n_households: 100,
        persons_per_household: 2,
        rng_seed: 42,
    };
    c.bench_function("sim 100 households x 10y", |b| {
        b.iter(|| {
            let _ = sim_runtime::run_sim(sim_core::Policy::default(), &cfg, 10, 12);
        })
    });
}

criterion_group!(benches, bench_ticks, bench_full_run);
criterion_main!(benches);
