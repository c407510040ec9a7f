//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds the gravity and stepping constants, `GalaxyParams` the
//! shape of the generated initial condition.

#[derive(Debug, Clone)]
pub struct Parameters {
    pub g: f64,     // gravitational constant
    pub m_bh: f64,  // mass shared by every massive body
    pub r_min: f64, // floor on squared separation
    pub dt: f64,    // step size
    pub seed: u64,  // deterministic seed
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            g: 6.67259e-11,
            m_bh: 1.0e14,
            r_min: 0.1,
            dt: 0.1,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GalaxyParams {
    pub bh_count: usize,
    pub particle_count: usize,
    pub cosmo_size: f64,           // side of the cube bodies are scattered in
    pub galaxy_size: f64,          // side of the square a disk is drawn from
    pub galaxy_center_radius: f64, // bulge radius
    pub bh_velocity_range: f64,    // initial body velocity spread per axis
    pub bh_point_size: f32,
    pub particle_point_size: f32,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            bh_count: 7,
            particle_count: 40_000,
            cosmo_size: 800.0,
            galaxy_size: 200.0,
            galaxy_center_radius: 75.0,
            bh_velocity_range: 12.0,
            bh_point_size: 7000.0,
            particle_point_size: 1500.0,
        }
    }
}

/// Clamp a requested massive-body count to at least one
pub fn clamp_bh_count(requested: i64) -> usize {
    requested.max(1) as usize
}

/// Clamp a requested particle count to be non-negative
pub fn clamp_particle_count(requested: i64) -> usize {
    requested.max(0) as usize
}
