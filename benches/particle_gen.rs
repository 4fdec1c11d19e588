//! Benchmarks for CPU-side particle generation and per-frame work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use drizzle::particles::ParticleCloud;
use drizzle::scene::scene_draws;
use drizzle::{AppState, WeatherConfig};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_generate");

    for count in [1_000u32, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(42);
                black_box(ParticleCloud::generate(count, 30.0, &mut rng))
            })
        });
    }

    group.finish();
}

fn bench_frame_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    group.bench_function("state_update", |b| {
        let mut state = AppState::new(WeatherConfig::new());
        b.iter(|| black_box(state.update(black_box(0.02))))
    });

    group.bench_function("scene_draws", |b| {
        b.iter(|| black_box(scene_draws(black_box(1.25))))
    });

    group.finish();
}

criterion_group!(benches, bench_generate, bench_frame_update);
criterion_main!(benches);
