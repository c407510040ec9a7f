//! Vector helpers and orthonormal frames
//!
//! Positions, velocities and basis vectors are all `NVec3`. A `Frame` is an
//! ordered right-handed basis {X, Y, Z} used for galaxy disk tilt and for the
//! camera view.

use nalgebra::Vector3;

pub type NVec3 = Vector3<f64>;

/// Vectors at or below this norm are left untouched by [`normalize`]
pub const NORMALIZE_MIN_NORM: f64 = 0.1;

/// Unit vector along `v`, or `v` itself when it is too short to divide by
pub fn normalize(v: NVec3) -> NVec3 {
    let n = v.norm();
    if n > NORMALIZE_MIN_NORM {
        v / n
    } else {
        v
    }
}

/// Rotate `v` about the Y axis by `yaw`, then about the X axis by `pitch`
pub fn rotate(v: NVec3, yaw: f64, pitch: f64) -> NVec3 {
    let (sy, cy) = yaw.sin_cos();
    let (sp, cp) = pitch.sin_cos();

    // yaw
    let x = v.x * cy + v.z * sy;
    let z = v.z * cy - v.x * sy;

    // pitch, using the yawed z
    let y = v.y * cp - z * sp;
    let z = z * cp + v.y * sp;

    NVec3::new(x, y, z)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: NVec3,
    pub y: NVec3,
    pub z: NVec3,
}

impl Default for Frame {
    fn default() -> Self {
        Self::identity()
    }
}

impl Frame {
    pub fn identity() -> Self {
        Self {
            x: NVec3::x(),
            y: NVec3::y(),
            z: NVec3::z(),
        }
    }

    /// Rotate every basis vector about the world axes and re-orthonormalize
    pub fn rotated(&self, yaw: f64, pitch: f64) -> Self {
        Self {
            x: rotate(self.x, yaw, pitch),
            y: rotate(self.y, yaw, pitch),
            z: rotate(self.z, yaw, pitch),
        }
        .orthonormalized()
    }

    /// Rotate the frame about its own axes: yaw about Y, then pitch about the new X
    ///
    /// Same as [`rotate`] applied in the frame's local coordinates.
    pub fn rotated_local(&self, yaw: f64, pitch: f64) -> Self {
        let (sy, cy) = yaw.sin_cos();
        let (sp, cp) = pitch.sin_cos();

        let x = self.x * cy + self.z * sy;
        let z = self.z * cy - self.x * sy;
        let y = self.y * cp - z * sp;
        let z = z * cp + self.y * sp;

        Self { x, y, z }.orthonormalized()
    }

    /// Single-pass Gram-Schmidt: X first, Y against X, Z against X then Y
    ///
    /// No final renormalization; the subtraction residue is below float noise
    /// for inputs that were already close to orthonormal.
    pub fn orthonormalized(&self) -> Self {
        let x = normalize(self.x);
        let mut y = normalize(self.y);
        let mut z = normalize(self.z);

        y -= x * x.dot(&y);
        z -= x * x.dot(&z);
        z -= y * y.dot(&z);

        Self { x, y, z }
    }

    /// Local coordinates -> world space
    pub fn to_world(&self, local: &NVec3) -> NVec3 {
        self.x * local.x + self.y * local.y + self.z * local.z
    }

    /// World vector projected onto the basis
    pub fn to_local(&self, world: &NVec3) -> NVec3 {
        NVec3::new(self.x.dot(world), self.y.dot(world), self.z.dot(world))
    }
}
