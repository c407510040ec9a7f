//! World-to-screen mapping and renderer matrices

use nalgebra::{Matrix4, Perspective3, Vector2};

use super::camera::Camera;
use super::vecmath::NVec3;

#[derive(Debug, Clone)]
pub struct ProjectionParams {
    pub z_scale: f64,
    pub fov_degrees: f64,
    pub z_near: f64,
    pub z_far: f64,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            z_scale: 0.05,
            fov_degrees: 45.0,
            z_near: 0.1,
            z_far: 10_000.0,
        }
    }
}

/// Camera-space coordinates of `point`
pub fn to_camera_space(point: &NVec3, camera: &Camera) -> NVec3 {
    camera.view.to_local(&(point - camera.position))
}

/// Perspective screen coordinates relative to the viewport centre
///
/// Depth is floored at `f64::EPSILON`, so points at or behind the camera
/// still map somewhere (usually far off screen); culling is up to the caller.
pub fn world_to_screen(point: &NVec3, camera: &Camera, z_scale: f64) -> Vector2<f64> {
    let c = to_camera_space(point, camera);
    let w = (z_scale * c.z).max(f64::EPSILON) / camera.focal_length();
    Vector2::new(c.x / w, c.y / w)
}

/// Index of the point whose screen position is closest to `screen`
pub fn pick_nearest(points: &[NVec3], camera: &Camera, z_scale: f64, screen: &Vector2<f64>) -> Option<usize> {
    points
        .iter()
        .map(|p| (world_to_screen(p, camera, z_scale) - screen).norm_squared())
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
}

/// Right-handed view matrix: rows X, -Y, -Z so the renderer looks down -Z with Y up
pub fn view_matrix(camera: &Camera) -> Matrix4<f64> {
    let (x, y, z) = (camera.view.x, camera.view.y, camera.view.z);
    let p = camera.position;
    #[rustfmt::skip]
    let m = Matrix4::new(
         x.x,  x.y,  x.z, -x.dot(&p),
        -y.x, -y.y, -y.z,  y.dot(&p),
        -z.x, -z.y, -z.z,  z.dot(&p),
         0.0,  0.0,  0.0,  1.0,
    );
    m
}

pub fn projection_matrix(params: &ProjectionParams, aspect: f64) -> Matrix4<f64> {
    Perspective3::new(
        aspect.max(f64::EPSILON),
        params.fov_degrees.to_radians(),
        params.z_near,
        params.z_far,
    )
    .to_homogeneous()
}
