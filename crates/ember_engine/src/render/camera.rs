//! Camera state for view and projection

use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

/// Camera with a world position, view matrix, and projection matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    view: Mat4,
    projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Create a camera at the origin with identity matrices
    pub fn new() -> Self {
        Self {
            position: Vec3::zeros(),
            view: Mat4::identity(),
            projection: Mat4::identity(),
        }
    }

    /// Place the camera at `eye` looking at `target`
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.position = eye;
        self.view = Mat4::look_at(eye, target, up);
    }

    /// Set a perspective projection
    pub fn set_perspective(&mut self, fov_y: f32, aspect: f32, near: f32, far: f32) {
        self.projection = Mat4::perspective(fov_y, aspect, near, far);
    }

    /// Camera world position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// View matrix
    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    /// Projection matrix
    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}
