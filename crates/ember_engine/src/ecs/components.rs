//! Built-in engine components
//!
//! Pure data records; all logic lives in systems.

use crate::foundation::math::{compose_trs, Mat4, Quat, Vec3};
use crate::render::ModelKey;
use crate::scene::NodeKey;

use super::Component;

/// Spatial transform component
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    /// World space position
    pub position: Vec3,

    /// World space rotation quaternion
    pub rotation: Quat,

    /// World space scale factors
    pub scale: Vec3,
}

impl Component for TransformComponent {
    const NAME: &'static str = "transform";
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl TransformComponent {
    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        compose_trs(&self.position, &self.rotation, &self.scale)
    }
}

/// Linear and angular velocity component
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VelocityComponent {
    /// Linear velocity in units per second
    pub linear: Vec3,

    /// Angular velocity around each axis in radians per second
    pub angular: Vec3,
}

impl Component for VelocityComponent {
    const NAME: &'static str = "velocity";
}

/// Links an entity to a renderable model instance in the scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderableComponent {
    /// Model resource driven by this entity
    pub model: ModelKey,

    /// Scene node whose transform the entity controls
    pub node: NodeKey,
}

impl Component for RenderableComponent {
    const NAME: &'static str = "renderable";
}
