//! Rendering resources and the geometry submission pipeline
//!
//! GPU-facing resource records (images, samplers, textures, materials,
//! meshes, models) live in a slot-map backed [`ResourceArena`] and reference
//! each other through generation-checked keys. Submission goes through the
//! [`GeometrySubpass`], which sorts draw units by camera distance and binds
//! state through the external [`CommandRecorder`] and [`RenderDevice`]
//! collaborators.

pub mod arena;
pub mod bounds;
pub mod camera;
pub mod cache;
pub mod commands;
pub mod material;
pub mod mesh;
pub mod model;
pub mod shader;
pub mod subpass;
pub mod texture;
pub mod variant;

pub use arena::{ImageKey, MaterialKey, MeshKey, ModelKey, ResourceArena, SamplerKey, TextureKey};
pub use bounds::Aabb;
pub use camera::Camera;
pub use cache::ResourceCache;
pub use commands::{
    BlendFactor, BlendState, BufferHandle, ClearFlags, CommandRecorder, CullMode, FrontFace,
    IndexType, PipelineHandle, RasterState, RecordedCommand, RecordingRecorder, SamplerHandle,
    Scissor, ShaderModuleHandle, TextureHandle, Viewport,
};
pub use material::{AlphaMode, Material};
pub use mesh::{IndexBinding, Mesh, VertexAttribute, VertexFormat};
pub use model::Model;
pub use shader::{
    HeadlessDevice, PipelineLayout, RenderDevice, ShaderModule, ShaderResources, ShaderSource,
    ShaderStage, TextureBinding, VertexInput,
};
pub use subpass::{GeometrySubpass, GlobalUniform};
pub use texture::{Filter, Image, ImageFormat, Sampler, Texture, WrapMode};
pub use variant::ShaderVariant;

use thiserror::Error;

/// Errors raised by rendering operations
#[derive(Error, Debug)]
pub enum RenderError {
    /// A call into the external GPU collaborator failed
    #[error("render backend call `{op}` failed at {file}:{line}: {message}")]
    Backend {
        /// Operation name as exposed by the collaborator
        op: &'static str,
        /// Call site file
        file: &'static str,
        /// Call site line
        line: u32,
        /// Backend-provided failure description
        message: String,
    },

    /// A resource handle no longer points at a live resource
    #[error("stale {0} handle")]
    StaleHandle(&'static str),

    /// A scene graph failure surfaced during submission
    #[error(transparent)]
    Scene(#[from] crate::scene::SceneError),
}

/// Build a [`RenderError::Backend`] capturing the current call site
#[macro_export]
macro_rules! backend_error {
    ($op:expr, $message:expr) => {
        $crate::render::RenderError::Backend {
            op: $op,
            file: file!(),
            line: line!(),
            message: $message.to_string(),
        }
    };
}
