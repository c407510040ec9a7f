//! Build a fully-initialized simulation from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! containing:
//! - the [`Engine`] with its galaxies generated
//! - the tick cadence and headless run length
//! - the pointer sensitivity used by input collaborators

use std::time::Duration;

use crate::configuration::config::ScenarioConfig;
use crate::simulation::camera::{Camera, CameraParams};
use crate::simulation::engine::Engine;
use crate::simulation::params::{clamp_bh_count, clamp_particle_count, GalaxyParams, Parameters};
use crate::simulation::projection::ProjectionParams;
use crate::simulation::vecmath::NVec3;

/// Runtime bundle built from a [`ScenarioConfig`]
pub struct Scenario {
    pub engine: Engine,
    pub tick_interval: Duration,
    pub max_ticks: u64,
    pub rot_degree: f64, // drag pixels per full turn
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Self {
        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            g: p_cfg.g,
            m_bh: p_cfg.m_bh,
            r_min: p_cfg.r_min,
            dt: p_cfg.dt,
            seed: p_cfg.seed,
        };

        // Galaxy shape, counts clamped like UI intents
        let g_cfg = cfg.galaxy;
        let bh_count = clamp_bh_count(g_cfg.bh_count);
        let particle_count = clamp_particle_count(g_cfg.particle_count);
        if bh_count as i64 != g_cfg.bh_count || particle_count as i64 != g_cfg.particle_count {
            log::warn!(
                "configured counts ({}, {}) clamped to ({bh_count}, {particle_count})",
                g_cfg.bh_count,
                g_cfg.particle_count
            );
        }
        let galaxy = GalaxyParams {
            bh_count,
            particle_count,
            cosmo_size: g_cfg.cosmo_size,
            galaxy_size: g_cfg.galaxy_size,
            galaxy_center_radius: g_cfg.galaxy_center_radius,
            bh_velocity_range: g_cfg.bh_velocity_range,
            bh_point_size: g_cfg.bh_point_size,
            particle_point_size: g_cfg.particle_point_size,
        };

        // Camera and projection
        let c_cfg = cfg.camera;
        let camera = Camera::new(&CameraParams {
            position: NVec3::from(c_cfg.position),
            focal_length: c_cfg.focal_length,
            chase_distance: c_cfg.chase_distance,
        });
        let projection = ProjectionParams {
            z_scale: c_cfg.z_scale,
            fov_degrees: c_cfg.fov_degrees,
            z_near: c_cfg.z_near,
            z_far: c_cfg.z_far,
        };

        let engine = Engine::new(parameters, galaxy, camera, projection);
        log::info!(
            "scenario built: {} black holes, {} particles, dt = {}",
            engine.store().bh_count(),
            engine.store().particle_count(),
            engine.parameters().dt
        );

        Self {
            engine,
            tick_interval: Duration::from_millis(cfg.engine.tick_ms),
            max_ticks: cfg.engine.max_ticks,
            rot_degree: c_cfg.rot_degree,
        }
    }
}
