//! Model/view/projection for the fixed scene.
//!
//! All three matrices are pure functions of `SceneParams` (and the aspect
//! ratio for the projection), so recomputing them every frame is idempotent.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Fixed scene constants.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneParams {
    /// Rotation about the object's X axis, applied first.
    pub rotation_x_deg: f32,
    /// Rotation about the Y axis, applied after the X rotation.
    pub rotation_y_deg: f32,
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_deg: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            rotation_x_deg: 45.0,
            rotation_y_deg: 45.0,
            eye: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_deg: 45.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}

pub fn model_matrix(p: &SceneParams) -> Mat4 {
    Mat4::from_rotation_y(p.rotation_y_deg.to_radians())
        * Mat4::from_rotation_x(p.rotation_x_deg.to_radians())
}

pub fn view_matrix(p: &SceneParams) -> Mat4 {
    Mat4::look_at_rh(p.eye, p.target, p.up)
}

/// Perspective projection with wgpu's [0, 1] depth range.
///
/// A non-finite or non-positive `aspect` (minimized window) falls back to 1.
pub fn projection_matrix(p: &SceneParams, aspect: f32) -> Mat4 {
    let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
    Mat4::perspective_rh(p.fov_y_deg.to_radians(), aspect, p.z_near, p.z_far)
}

/// Uniform block consumed by `cube.wgsl` (`Transforms` at group 0, binding 0).
///
/// Column-major, matching WGSL `mat4x4<f32>`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Transforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl Transforms {
    pub fn new(p: &SceneParams, aspect: f32) -> Self {
        Self {
            model: model_matrix(p).to_cols_array_2d(),
            view: view_matrix(p).to_cols_array_2d(),
            projection: projection_matrix(p, aspect).to_cols_array_2d(),
        }
    }

    /// Combined object-to-clip transform, as the vertex shader applies it.
    pub fn model_view_projection(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.projection)
            * Mat4::from_cols_array_2d(&self.view)
            * Mat4::from_cols_array_2d(&self.model)
    }
}
