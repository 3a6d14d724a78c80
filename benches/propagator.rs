//! Benchmarks for the stream-collide-save kernel.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use tgv_lbm::{compute::CpuPropagator, schema::SimulationConfig};

fn bench_propagator_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagator_step");

    for size in [64, 128, 256, 512, 1024] {
        let config = SimulationConfig {
            nx: size,
            ny: size,
            nu: 0.01,
            u_max: 0.01,
            ..Default::default()
        };

        let propagator = CpuPropagator::new(config).expect("valid benchmark config");
        let mut state = propagator.initial_state();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| {
                    propagator.step(black_box(&mut state), false).unwrap();
                });
            },
        );
    }

    group.finish();
}

fn bench_save_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("save_overhead");

    let config = SimulationConfig {
        nx: 256,
        ny: 256,
        nu: 0.01,
        u_max: 0.01,
        ..Default::default()
    };
    let propagator = CpuPropagator::new(config).expect("valid benchmark config");

    for save in [false, true] {
        let mut state = propagator.initial_state();

        group.bench_with_input(
            BenchmarkId::from_parameter(if save { "save" } else { "no_save" }),
            &save,
            |b, &save| {
                b.iter(|| {
                    propagator.step(black_box(&mut state), save).unwrap();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_propagator_step, bench_save_overhead);
criterion_main!(benches);
