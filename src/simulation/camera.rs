//! Camera frame and chase controller
//!
//! The camera looks along its frame's +Z with +Y pointing down the screen.
//! While a massive body is selected the camera drifts toward a point
//! `distance` behind it on the view axis, moving each axis by the square root
//! of the remaining error.

use super::vecmath::{Frame, NVec3};

#[derive(Debug, Clone)]
pub struct CameraParams {
    pub position: NVec3,
    pub focal_length: f64,   // F
    pub chase_distance: f64, // pursuit distance on select
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            position: NVec3::new(0.0, 0.0, -1600.0),
            focal_length: 30.0,
            chase_distance: 600.0,
        }
    }
}

/// Pursuit state of the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pursuit {
    Idle,
    Pursuing { target: usize, distance: f64 },
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: NVec3,
    pub view: Frame,
    focal_length: f64,
    chase_distance: f64,
    pursuit: Pursuit,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraParams::default())
    }
}

impl Camera {
    pub fn new(params: &CameraParams) -> Self {
        Self {
            position: params.position,
            view: Frame::identity(),
            focal_length: params.focal_length.max(f64::EPSILON),
            chase_distance: params.chase_distance,
            pursuit: Pursuit::Idle,
        }
    }

    pub fn focal_length(&self) -> f64 {
        self.focal_length
    }

    pub fn pursuit(&self) -> Pursuit {
        self.pursuit
    }

    pub fn target(&self) -> Option<usize> {
        match self.pursuit {
            Pursuit::Idle => None,
            Pursuit::Pursuing { target, .. } => Some(target),
        }
    }

    /// Closest the chase distance may get to the focal plane
    pub fn min_distance(&self) -> f64 {
        self.focal_length + 1.0
    }

    /// Toggle pursuit of `index`; selecting the current target releases it
    pub fn select(&mut self, index: usize) {
        self.pursuit = match self.pursuit {
            Pursuit::Pursuing { target, .. } if target == index => {
                log::debug!("released body {index}");
                Pursuit::Idle
            }
            _ => {
                log::debug!("pursuing body {index}");
                Pursuit::Pursuing {
                    target: index,
                    distance: self.chase_distance.max(self.min_distance()),
                }
            }
        };
    }

    pub fn deselect(&mut self) {
        self.pursuit = Pursuit::Idle;
    }

    /// Yaw about the view Y, then pitch about the new view X
    ///
    /// Pitch is applied inverted so that dragging down tilts the view up.
    pub fn rotate(&mut self, yaw: f64, pitch: f64) {
        self.view = self.view.rotated_local(yaw, -pitch);
    }

    /// Move along the camera axes; screen-down is +dy so Y is inverted
    ///
    /// `dz` also shortens the chase distance, floored at `F + 1`.
    pub fn pan(&mut self, dx: f64, dy: f64, dz: f64) {
        self.position += self.view.x * dx - self.view.y * dy + self.view.z * dz;

        let floor = self.min_distance();
        if let Pursuit::Pursuing { distance, .. } = &mut self.pursuit {
            *distance = (*distance - dz).max(floor);
        }
    }

    pub fn dolly(&mut self, dz: f64) {
        self.pan(0.0, 0.0, dz);
    }

    /// One chase step toward the target in `bodies`
    ///
    /// A target that no longer exists drops the camera back to idle.
    pub fn pursue(&mut self, bodies: &[NVec3]) {
        let Pursuit::Pursuing { target, distance } = self.pursuit else {
            return;
        };
        let Some(body) = bodies.get(target) else {
            log::debug!("pursuit target {target} is gone");
            self.pursuit = Pursuit::Idle;
            return;
        };

        let goal = body - self.view.z * distance;
        let err = goal - self.position;
        self.position += err.map(|e| e.signum() * e.abs().sqrt());
    }
}
