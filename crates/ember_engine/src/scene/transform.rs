//! Node-local transforms with cached world matrices
//!
//! Setters mark the transform dirty; the world matrix is recomputed on read
//! by the owning scene. A cached world matrix is reused only when the node
//! itself is clean AND the parent version it was computed against matches
//! the parent's current version, so ancestor changes always cascade without
//! eager invalidation walks.

use crate::foundation::math::{compose_trs, Mat4, Quat, Vec3};

/// Local translation/rotation/scale with a cached world matrix
///
/// Rotation is a quaternion throughout; the local matrix composes in fixed
/// TRS order (scale first, then rotation, then translation).
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,

    pub(super) dirty: bool,
    pub(super) world: Mat4,
    // Bumped each time `world` is recomputed; children compare against it.
    pub(super) version: u64,
    pub(super) parent_version: u64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// The identity transform
    pub fn identity() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            dirty: true,
            world: Mat4::identity(),
            version: 1,
            parent_version: 0,
        }
    }

    /// Create from translation, rotation, and scale
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
            ..Self::identity()
        }
    }

    /// Local translation
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Local rotation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Local scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Set the local translation, invalidating the cached world matrix
    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.dirty = true;
    }

    /// Set the local rotation, invalidating the cached world matrix
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.dirty = true;
    }

    /// Set the local scale, invalidating the cached world matrix
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty = true;
    }

    /// Compose the local matrix in TRS order
    pub fn local_matrix(&self) -> Mat4 {
        compose_trs(&self.translation, &self.rotation, &self.scale)
    }

    /// Whether the cached world matrix is stale relative to local state
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
