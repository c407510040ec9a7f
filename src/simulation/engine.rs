//! Owned simulation state and the per-tick step
//!
//! `Engine` owns the body store, the camera and the random source. External
//! collaborators get read-only access and submit [`Intent`]s, which are only
//! applied at the start of the next step.

use nalgebra::{Matrix4, Vector2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::camera::Camera;
use super::command::{Intent, IntentQueue, StagedCounts, ViewMode};
use super::forces::{AccelSet, SoftenedGravity};
use super::galaxy::{add_particles, init_galaxies};
use super::integrator::{semi_implicit_euler, StepBuffers};
use super::params::{clamp_bh_count, clamp_particle_count, GalaxyParams, Parameters};
use super::projection::{pick_nearest, projection_matrix, view_matrix, ProjectionParams};
use super::states::{BodyStore, RenderBuffers};

/// What a call to [`Engine::step`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced,
    Paused,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub buffers: RenderBuffers,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub view_mode: ViewMode,
}

pub struct Engine {
    parameters: Parameters,
    galaxy: GalaxyParams,
    projection: ProjectionParams,
    store: BodyStore,
    camera: Camera,
    forces: AccelSet,
    rng: StdRng,
    intents: IntentQueue,
    buffers: StepBuffers,
    running: bool,
    view_mode: ViewMode,
    tick: u64,
    t: f64, // simulated time
}

impl Engine {
    /// Build an engine and generate the initial galaxies
    ///
    /// A black hole count of zero is raised to one, as for count intents.
    pub fn new(parameters: Parameters, mut galaxy: GalaxyParams, camera: Camera, projection: ProjectionParams) -> Self {
        if galaxy.bh_count == 0 {
            log::warn!("black hole count 0 clamped to 1");
            galaxy.bh_count = 1;
        }
        let rng = StdRng::seed_from_u64(parameters.seed);
        let mut engine = Self::with_store(parameters, galaxy, camera, projection, BodyStore::new(), rng);
        init_galaxies(&mut engine.store, &engine.parameters, &engine.galaxy, &mut engine.rng);
        engine
    }

    /// Build an engine around an existing store, e.g. a hand-placed scenario
    pub fn with_store(
        parameters: Parameters,
        mut galaxy: GalaxyParams,
        camera: Camera,
        projection: ProjectionParams,
        store: BodyStore,
        rng: StdRng,
    ) -> Self {
        if !store.is_empty() {
            galaxy.bh_count = store.bh_count();
            galaxy.particle_count = store.particle_count();
        }
        let forces = AccelSet::new().with(SoftenedGravity {
            g: parameters.g,
            m_bh: parameters.m_bh,
            r_min: parameters.r_min,
        });

        Self {
            parameters,
            galaxy,
            projection,
            store,
            camera,
            forces,
            rng,
            intents: IntentQueue::default(),
            buffers: StepBuffers::default(),
            running: true,
            view_mode: ViewMode::Normal,
            tick: 0,
            t: 0.0,
        }
    }

    pub fn store(&self) -> &BodyStore {
        &self.store
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn galaxy_params(&self) -> &GalaxyParams {
        &self.galaxy
    }

    pub fn projection_params(&self) -> &ProjectionParams {
        &self.projection
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Steps that advanced physics
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn pending_intents(&self) -> usize {
        self.intents.len()
    }

    /// Queue an intent for the next step
    pub fn submit(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    /// One tick: drain intents, apply staged counts, chase, integrate
    ///
    /// Intents are applied even while stopped so the view stays interactive.
    pub fn step(&mut self) -> StepOutcome {
        let staged = self.apply_intents();
        self.apply_counts(staged);

        if !self.running {
            return StepOutcome::Paused;
        }

        self.camera.pursue(self.store.body_positions());
        semi_implicit_euler(&mut self.store, &self.forces, self.parameters.dt, &mut self.buffers);
        self.tick += 1;
        self.t += self.parameters.dt;
        StepOutcome::Advanced
    }

    pub fn render_frame(&self, aspect: f64) -> RenderFrame {
        RenderFrame {
            buffers: self.store.render_buffers(),
            view: view_matrix(&self.camera).cast::<f32>(),
            projection: projection_matrix(&self.projection, aspect).cast::<f32>(),
            view_mode: self.view_mode,
        }
    }

    fn apply_intents(&mut self) -> StagedCounts {
        let mut staged = StagedCounts::default();
        let pending: Vec<Intent> = self.intents.drain().collect();

        for intent in pending {
            log::trace!("applying {intent:?}");
            match intent {
                Intent::Rotate { yaw, pitch } => self.camera.rotate(yaw, pitch),
                Intent::Pan { dx, dy } => self.camera.pan(dx, dy, 0.0),
                Intent::Dolly { dz } => self.camera.dolly(dz),
                Intent::Select(i) => {
                    if i < self.store.bh_count() {
                        self.camera.select(i);
                    } else {
                        log::debug!("ignoring select of missing body {i}");
                    }
                }
                Intent::SelectAt { x, y } => {
                    let hit = pick_nearest(
                        self.store.body_positions(),
                        &self.camera,
                        self.projection.z_scale,
                        &Vector2::new(x, y),
                    );
                    if let Some(i) = hit {
                        self.camera.select(i);
                    }
                }
                Intent::Deselect => self.camera.deselect(),
                Intent::SetBodyCount(n) => staged.bh_count = Some(n),
                Intent::SetParticleCount(n) => staged.particle_count = Some(n),
                Intent::SetRunning(on) => self.running = on,
                Intent::ToggleRunning => self.running = !self.running,
                Intent::CycleViewMode => {
                    self.view_mode = self.view_mode.next();
                    log::debug!("view mode {:?}", self.view_mode);
                }
            }
        }
        staged
    }

    /// Bodies first, then particles
    fn apply_counts(&mut self, staged: StagedCounts) {
        if let Some(requested) = staged.bh_count {
            let n = clamp_bh_count(requested);
            if n as i64 != requested {
                log::warn!("black hole count {requested} clamped to {n}");
            }
            self.resize_bodies(n);
        }
        if let Some(requested) = staged.particle_count {
            let n = clamp_particle_count(requested);
            if n as i64 != requested {
                log::warn!("particle count {requested} clamped to {n}");
            }
            self.resize_particles(n);
        }
    }

    /// Growth regenerates every galaxy, shrinking truncates
    fn resize_bodies(&mut self, n: usize) {
        let current = self.store.bh_count();
        self.galaxy.bh_count = n;
        if n > current {
            self.galaxy.particle_count = self.store.particle_count();
            init_galaxies(&mut self.store, &self.parameters, &self.galaxy, &mut self.rng);
        } else if n < current {
            self.store.truncate_bodies(n);
            log::info!("black holes truncated to {n}");
        }
        // drop a pursuit whose target went away
        if self.camera.target().is_some_and(|t| t >= n) {
            self.camera.deselect();
        }
    }

    /// Growth appends new particles only, shrinking truncates
    fn resize_particles(&mut self, n: usize) {
        let current = self.store.particle_count();
        self.galaxy.particle_count = n;
        if n > current {
            add_particles(&mut self.store, &self.parameters, &self.galaxy, n - current, &mut self.rng);
            log::info!("particles grown to {n}");
        } else if n < current {
            self.store.truncate_particles(n);
            log::info!("particles truncated to {n}");
        }
        self.galaxy.particle_count = self.store.particle_count();
    }
}
