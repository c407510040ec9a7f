//! Fixed-step semi-implicit Euler integrator
//!
//! Order within a step is fixed: particles are kicked and drifted against the
//! pre-step body positions, then the bodies are kicked against each other,
//! then the bodies drift.

use super::forces::AccelSet;
use super::states::BodyStore;
use super::vecmath::NVec3;

/// Scratch acceleration buffers reused across steps
#[derive(Debug, Default)]
pub struct StepBuffers {
    particle_a: Vec<NVec3>,
    body_a: Vec<NVec3>,
}

/// Advance the store by one step of `dt`
pub fn semi_implicit_euler(store: &mut BodyStore, forces: &AccelSet, dt: f64, buf: &mut StepBuffers) {
    if store.is_empty() {
        return;
    }

    // Particle kick from the current body positions
    buf.particle_a.resize(store.particle_count(), NVec3::zeros());
    forces.accumulate_particle_accels(store, &mut buf.particle_a);

    {
        let (_, particles) = store.split_mut();
        for (v, a) in particles.v.iter_mut().zip(&buf.particle_a) {
            *v += a * dt;
        }
        // Drift with the just-updated velocity
        for (x, v) in particles.x.iter_mut().zip(particles.v.iter()) {
            *x += v * dt;
        }
    }

    // Body kick, bodies have not moved yet
    buf.body_a.resize(store.bh_count(), NVec3::zeros());
    forces.accumulate_body_accels(store, &mut buf.body_a);

    let (bodies, _) = store.split_mut();
    for (v, a) in bodies.v.iter_mut().zip(&buf.body_a) {
        *v += a * dt;
    }
    for (x, v) in bodies.x.iter_mut().zip(bodies.v.iter()) {
        *x += v * dt;
    }
}
