//! # Ember Engine
//!
//! A modular ECS rendering engine with a Vulkan-style submission pipeline.
//!
//! ## Features
//!
//! - **ECS Runtime**: dense component storage with signature-based system
//!   dispatch and recyclable entity ids
//! - **Scene Graph**: named node hierarchy with lazy, version-checked world
//!   transform propagation
//! - **Geometry Submission**: distance-sorted opaque/transparent subpass
//!   binding resources by reflected shader names
//! - **Collaborator Contracts**: the GPU device, command recorder, file
//!   access, and input polling stay behind traits, so the core runs headless
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ember_engine::input::NullInput;
//! use ember_engine::prelude::*;
//! use ember_engine::render::{HeadlessDevice, RecordingRecorder};
//!
//! fn main() -> Result<(), EngineError> {
//!     ember_engine::foundation::logging::init();
//!
//!     let config = EngineConfig::default();
//!     let mut engine = Engine::new(config, &DiskFileReader)?;
//!
//!     // Real applications pass their platform's windowing, device, and
//!     // command-recording collaborators here.
//!     let mut input = NullInput;
//!     let mut device = HeadlessDevice::default();
//!     let mut recorder = RecordingRecorder::new();
//!     while engine.is_running() {
//!         engine.tick(&mut input, &mut device, &mut recorder)?;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod ecs;
pub mod foundation;
pub mod input;
pub mod render;
pub mod scene;

mod engine;

pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{DiskFileReader, FileReader},
        config::{EngineConfig, RendererConfig, WindowConfig},
        ecs::{Component, Entity, Signature, System, World},
        foundation::{
            math::{Mat4, Quat, Vec3},
            time::Timer,
        },
        input::{InputCollaborator, InputEvent, KeyCode},
        render::{
            Aabb, AlphaMode, Camera, CommandRecorder, GeometrySubpass, Material, Mesh, Model,
            RenderDevice, ResourceArena, ResourceCache, ShaderSource, ShaderVariant,
        },
        scene::{Scene, SceneDescription, Transform},
        Engine, EngineError,
    };
}
