pub mod vecmath;
pub mod states;
pub mod params;
pub mod forces;
pub mod integrator;
pub mod galaxy;
pub mod camera;
pub mod projection;
pub mod command;
pub mod engine;
pub mod scheduler;
pub mod scenario;
