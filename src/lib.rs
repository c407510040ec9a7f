pub mod simulation;
pub mod configuration;
pub mod benchmark;
#[cfg(feature = "viewer")]
pub mod visualization;

pub use simulation::vecmath::{Frame, NVec3};
pub use simulation::states::{BodyInit, BodyStore, RenderBuffers, Rgba};
pub use simulation::params::{GalaxyParams, Parameters};
pub use simulation::forces::{AccelSet, Acceleration, SoftenedGravity};
pub use simulation::integrator::{semi_implicit_euler, StepBuffers};
pub use simulation::camera::{Camera, CameraParams, Pursuit};
pub use simulation::projection::{world_to_screen, view_matrix, projection_matrix, ProjectionParams};
pub use simulation::command::{Intent, ViewMode};
pub use simulation::engine::{Engine, RenderFrame, StepOutcome};
pub use simulation::scheduler::{ManualScheduler, RealTimeScheduler, Scheduler, TickGate};
pub use simulation::scenario::Scenario;

pub use configuration::config::{ScenarioConfig, ParametersConfig, GalaxyConfig, CameraConfig, EngineConfig};

#[cfg(feature = "viewer")]
pub use visualization::galaxy_vis3d::run_3d;

pub use benchmark::benchmark::{bench_step, bench_init};
