use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::simulation::camera::Camera;
use crate::simulation::engine::Engine;
use crate::simulation::params::{GalaxyParams, Parameters};
use crate::simulation::projection::ProjectionParams;

/// Helper to build a seeded engine with `n` particles over `bh` black holes
fn make_engine(bh: usize, n: usize) -> Engine {
    let parameters = Parameters {
        seed: 42,
        ..Parameters::default()
    };
    let galaxy = GalaxyParams {
        bh_count: bh,
        particle_count: n,
        ..GalaxyParams::default()
    };
    Engine::new(parameters, galaxy, Camera::default(), ProjectionParams::default())
}

/// Time one engine step for a range of particle counts
/// Paste output directly into a spreadsheet to graph
pub fn bench_step() {
    let bh = GalaxyParams::default().bh_count;

    println!("N,ms_per_step");

    for n in (5_000..=80_000).step_by(5_000) {
        // Small n: average over a few steps to smooth noise
        let steps = if n <= 20_000 { 10 } else { 3 };
        let mut engine = make_engine(bh, n);

        // Warm-up one step
        engine.step();

        let t0 = Instant::now();
        for _ in 0..steps {
            engine.step();
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{n},{ms:.6}");
    }
}

/// Time the initializer alone, which dominates on count increases
pub fn bench_init() {
    println!("N,init_ms");

    for n in (10_000..=80_000).step_by(10_000) {
        let galaxy = GalaxyParams {
            particle_count: n,
            ..GalaxyParams::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let mut store = crate::simulation::states::BodyStore::new();

        let t0 = Instant::now();
        crate::simulation::galaxy::init_galaxies(&mut store, &Parameters::default(), &galaxy, &mut rng);
        let ms = t0.elapsed().as_secs_f64() * 1000.0;

        println!("{n},{ms:.6}");
    }
}
