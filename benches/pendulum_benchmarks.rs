//! Pendulum Benchmarks
//!
//! Step throughput of both integrators, the cost of a ring wrap, and frame
//! assembly.
//!
//! Run with: cargo bench --bench pendulum_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pendulum::config::{IntegratorType, PendulumConfig};
use pendulum::engine::Simulation;
use pendulum::render::render_frame;

/// Single-step cost per integrator, ring far from full.
fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("Pendulum_Step");
    group.sample_size(100);
    group.confidence_level(0.95);

    for integrator in [IntegratorType::SemiImplicitEuler, IntegratorType::ExplicitEuler] {
        let config = PendulumConfig::builder().integrator(integrator).build();
        group.bench_with_input(
            BenchmarkId::new("step", format!("{integrator:?}")),
            &config,
            |b, config| {
                let mut sim = Simulation::new(config).expect("valid config");
                b.iter(|| {
                    if sim.ring().is_full() {
                        sim.reset();
                    }
                    black_box(sim.step().expect("finite run"))
                });
            },
        );
    }

    group.finish();
}

/// Steps through a full ring, wraps included.
fn bench_ring_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("Pendulum_Ring");
    group.sample_size(50);

    for total_time in [1.0, 10.0, 100.0] {
        let config = PendulumConfig::builder().total_time(total_time).build();
        let capacity = config.capacity().expect("capacity");
        group.bench_with_input(
            BenchmarkId::new("full_cycle", capacity),
            &config,
            |b, config| {
                let mut sim = Simulation::new(config).expect("valid config");
                b.iter(|| {
                    for _ in 0..capacity {
                        black_box(sim.step().expect("finite run"));
                    }
                });
            },
        );
    }

    group.finish();
}

/// Step plus draw-list assembly, as the frame loop does it.
fn bench_frame(c: &mut Criterion) {
    let config = PendulumConfig::default();
    let mut sim = Simulation::new(&config).expect("valid config");

    c.bench_function("Pendulum_Frame", |b| {
        b.iter(|| {
            let report = sim.step().expect("finite run");
            black_box(render_frame(&report.advance, &config.display))
        });
    });
}

criterion_group!(benches, bench_step, bench_ring_cycle, bench_frame);
criterion_main!(benches);
