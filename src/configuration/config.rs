//! Configuration types for loading galaxy scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`ParametersConfig`] – physical constants, step size and seed
//! - [`GalaxyConfig`]     – counts and shape of the generated galaxies
//! - [`CameraConfig`]     – camera placement, projection and input sensitivity
//! - [`EngineConfig`]     – tick cadence and headless run length
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! Every field is optional and falls back to the defaults below.
//!
//! # YAML format
//!
//! ```yaml
//! parameters:
//!   G: 6.67259e-11          # gravitational constant
//!   m_bh: 1.0e14            # mass of every black hole
//!   r_min: 0.1              # floor on squared separation
//!   dt: 0.1                 # step size
//!   seed: 42                # deterministic seed
//!
//! galaxy:
//!   bh_count: 7
//!   particle_count: 40000
//!   cosmo_size: 800.0
//!   galaxy_size: 200.0
//!   galaxy_center_radius: 75.0
//!
//! camera:
//!   position: [0.0, 0.0, -1600.0]
//!   focal_length: 30.0
//!   chase_distance: 600.0
//!
//! engine:
//!   tick_ms: 50
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global physical and numerical parameters
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ParametersConfig {
    #[serde(rename = "G")]
    pub g: f64,     // gravitational constant
    pub m_bh: f64,  // black hole mass
    pub r_min: f64, // softening floor on r^2
    pub dt: f64,    // time step size
    pub seed: u64,  // deterministic seed to make runs reproducible
}

impl Default for ParametersConfig {
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

/// Shape of the generated initial condition
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GalaxyConfig {
    pub bh_count: i64,             // clamped to >= 1
    pub particle_count: i64,       // clamped to >= 0
    pub cosmo_size: f64,           // cube the black holes are scattered in
    pub galaxy_size: f64,          // square each disk is drawn from
    pub galaxy_center_radius: f64, // bulge radius
    pub bh_velocity_range: f64,    // initial black hole velocity spread
    pub bh_point_size: f32,
    pub particle_point_size: f32,
}

impl Default for GalaxyConfig {
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

/// Camera, projection and pointer sensitivity
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f64; 3],
    pub focal_length: f64,   // F
    pub chase_distance: f64, // distance kept behind a selected black hole
    pub z_scale: f64,        // depth scale used by the screen projection
    pub fov_degrees: f64,
    pub z_near: f64,
    pub z_far: f64,
    pub rot_degree: f64, // pixels of drag for a full turn
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, -1600.0],
            focal_length: 30.0,
            chase_distance: 600.0,
            z_scale: 0.05,
            fov_degrees: 45.0,
            z_near: 0.1,
            z_far: 10_000.0,
            rot_degree: 3600.0,
        }
    }
}

/// Runtime cadence
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub tick_ms: u64,    // fixed tick cadence
    pub max_ticks: u64,  // headless run length
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            max_ticks: 200,
        }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    pub parameters: ParametersConfig,
    pub galaxy: GalaxyConfig,
    pub camera: CameraConfig,
    pub engine: EngineConfig,
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("invalid scenario YAML")
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening scenario {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).with_context(|| format!("parsing scenario {}", path.display()))
    }
}
