//! Random multi-galaxy initial conditions
//!
//! Each massive body gets a random position, velocity, color and disk
//! orientation. Particles are dealt round-robin to the bodies and placed on a
//! tilted disk that puffs into a bulge near the centre, moving at the circular
//! speed of their host plus the host's bulk velocity.

use std::f64::consts::{PI, TAU};

use rand::Rng;

use super::params::{GalaxyParams, Parameters};
use super::states::{BodyInit, BodyStore};
use super::vecmath::{normalize, Frame, NVec3};

/// Out-of-plane jitter of the thin disk, as a fraction of `galaxy_size`
const THIN_DISK_FRACTION: f64 = 0.0625;

/// Uniform draw in `[-size/2, size/2)`
fn centered<R: Rng + ?Sized>(rng: &mut R, size: f64) -> f64 {
    size * (rng.gen::<f64>() - 0.5)
}

/// Regenerate the whole store: `bh_count` bodies, then `particle_count` particles
pub fn init_galaxies<R: Rng + ?Sized>(
    store: &mut BodyStore,
    params: &Parameters,
    galaxy: &GalaxyParams,
    rng: &mut R,
) {
    store.clear();
    for _ in 0..galaxy.bh_count {
        let (init, orientation) = random_body(galaxy, rng);
        store.push_body(init, orientation);
    }
    add_particles(store, params, galaxy, galaxy.particle_count, rng);

    log::info!(
        "initialized {} galaxies with {} particles",
        store.bh_count(),
        store.particle_count()
    );
}

/// One massive body with a random orientation frame
pub fn random_body<R: Rng + ?Sized>(galaxy: &GalaxyParams, rng: &mut R) -> (BodyInit, Frame) {
    let x = NVec3::new(
        centered(rng, galaxy.cosmo_size),
        centered(rng, galaxy.cosmo_size),
        centered(rng, galaxy.cosmo_size),
    );
    let v = NVec3::new(
        centered(rng, galaxy.bh_velocity_range),
        centered(rng, galaxy.bh_velocity_range),
        centered(rng, galaxy.bh_velocity_range),
    );
    let color = [rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>(), 1.0];
    let orientation = Frame::identity().rotated(TAU * rng.gen::<f64>(), TAU * rng.gen::<f64>());

    (
        BodyInit {
            x,
            v,
            color,
            point_size: galaxy.bh_point_size,
        },
        orientation,
    )
}

/// Append `count` particles after the existing ones, host `n % bh_count`
///
/// `n` is the particle's index within the particle set, so growing the set
/// continues the round-robin where it left off.
pub fn add_particles<R: Rng + ?Sized>(
    store: &mut BodyStore,
    params: &Parameters,
    galaxy: &GalaxyParams,
    count: usize,
    rng: &mut R,
) {
    let bh_count = store.bh_count();
    if bh_count == 0 {
        if count > 0 {
            log::warn!("no black holes to host {count} particles");
        }
        return;
    }
    let start = store.particle_count();
    for n in start..start + count {
        let host = n % bh_count;
        let init = disk_particle(store, host, params, galaxy, rng);
        store.push_particle(init, host);
    }
}

/// Offset of a particle in its host's disk plane, before tilting
pub fn disk_offset<R: Rng + ?Sized>(galaxy: &GalaxyParams, rng: &mut R) -> NVec3 {
    let x = centered(rng, galaxy.galaxy_size);
    let y = centered(rng, galaxy.galaxy_size);
    let r_xy = (x * x + y * y).sqrt();

    let z = if r_xy > galaxy.galaxy_center_radius {
        // thin disk
        centered(rng, THIN_DISK_FRACTION * galaxy.galaxy_size)
    } else {
        // bulge
        let bulge = (PI / 2.0 * r_xy / galaxy.galaxy_center_radius).cos();
        centered(rng, bulge * galaxy.galaxy_center_radius)
    };

    NVec3::new(x, y, z)
}

/// Circular-orbit speed around a point mass `m` at distance `r`
pub fn circular_speed(g: f64, m: f64, r: f64) -> f64 {
    (g * m / r).sqrt()
}

fn disk_particle<R: Rng + ?Sized>(
    store: &BodyStore,
    host: usize,
    params: &Parameters,
    galaxy: &GalaxyParams,
    rng: &mut R,
) -> BodyInit {
    let frame = store.orientations()[host];
    let host_x = store.body_positions()[host];
    let host_v = store.body_velocities()[host];

    let [r, g, b, _] = store.body_color(host).unwrap_or([1.0; 4]);
    let norm = (r * r + g * g + b * b).sqrt();
    let color = if norm > 0.0 {
        [r / norm, g / norm, b / norm, 1.0]
    } else {
        [r, g, b, 1.0]
    };

    let offset = frame.to_world(&disk_offset(galaxy, rng));
    let speed = circular_speed(params.g, params.m_bh, offset.norm());
    let dir = normalize(frame.z.cross(&offset));

    BodyInit {
        x: host_x + offset,
        v: dir * speed + host_v,
        color,
        point_size: galaxy.particle_point_size,
    }
}
