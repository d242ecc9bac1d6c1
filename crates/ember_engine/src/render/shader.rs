//! Shader sources, modules, and the render device contract
//!
//! Shader compilation and reflection happen in the external backend; the
//! core only sees opaque module handles plus the reflected resource names
//! the submission path matches mesh attributes and material textures
//! against.

use super::commands::{PipelineHandle, ShaderModuleHandle};
use super::variant::ShaderVariant;
use super::RenderError;

/// Pipeline stage a shader module compiles for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex stage
    Vertex,
    /// Fragment stage
    Fragment,
}

/// Shader source text with a stable identity used as a cache key
#[derive(Debug, Clone)]
pub struct ShaderSource {
    /// Stable identity (typically the source path)
    pub id: String,
    /// Source text handed to the backend compiler
    pub source: String,
}

impl ShaderSource {
    /// Create a source from an identity and its text
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
        }
    }
}

/// A reflected vertex input of a shader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexInput {
    /// Attribute name (e.g. `position`)
    pub name: String,
    /// Input location
    pub location: u32,
}

/// A reflected combined texture/sampler binding of a shader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureBinding {
    /// Binding name (e.g. `baseColor`)
    pub name: String,
    /// Descriptor set
    pub set: u32,
    /// Binding slot
    pub binding: u32,
}

/// Reflected resources of one or more shader modules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderResources {
    /// Vertex inputs, vertex stage only
    pub vertex_inputs: Vec<VertexInput>,
    /// Texture bindings across stages
    pub texture_bindings: Vec<TextureBinding>,
}

impl ShaderResources {
    /// Merge another stage's resources, dropping duplicates by name
    pub fn merge(&mut self, other: &ShaderResources) {
        for input in &other.vertex_inputs {
            if !self.vertex_inputs.iter().any(|seen| seen.name == input.name) {
                self.vertex_inputs.push(input.clone());
            }
        }
        for binding in &other.texture_bindings {
            if !self
                .texture_bindings
                .iter()
                .any(|seen| seen.name == binding.name)
            {
                self.texture_bindings.push(binding.clone());
            }
        }
    }
}

/// A compiled shader module with its reflection data
#[derive(Debug, Clone)]
pub struct ShaderModule {
    /// Backend module handle
    pub handle: ShaderModuleHandle,
    /// Stage the module compiles for
    pub stage: ShaderStage,
    /// Reflected resources
    pub resources: ShaderResources,
}

/// A pipeline built for a set of shader modules
///
/// Carries the bindable pipeline handle plus the merged reflection the
/// submission path uses to match vertex buffers and textures by name.
#[derive(Debug, Clone)]
pub struct PipelineLayout {
    /// Bindable pipeline
    pub pipeline: PipelineHandle,
    /// Merged reflected resources of all stages
    pub resources: ShaderResources,
}

/// GPU object factory implemented by the external backend
///
/// Both operations may be called repeatedly with identical arguments; the
/// [`super::ResourceCache`] guarantees each distinct key reaches the device
/// only once.
pub trait RenderDevice {
    /// Compile a shader module for a source and variant define set
    fn create_shader_module(
        &mut self,
        stage: ShaderStage,
        source: &ShaderSource,
        variant: &ShaderVariant,
    ) -> Result<ShaderModule, RenderError>;

    /// Build a pipeline (with merged reflection) for a module set
    fn create_pipeline_layout(
        &mut self,
        modules: &[&ShaderModule],
    ) -> Result<PipelineLayout, RenderError>;
}

/// Device that mints handles without a GPU
///
/// Modules carry no reflection, so the submission path binds nothing but
/// uniforms and draws. Serves headless runs and tests, like
/// [`super::RecordingRecorder`] does for the command stream.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    next_handle: u64,
}

impl HeadlessDevice {
    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl RenderDevice for HeadlessDevice {
    fn create_shader_module(
        &mut self,
        stage: ShaderStage,
        _source: &ShaderSource,
        _variant: &ShaderVariant,
    ) -> Result<ShaderModule, RenderError> {
        Ok(ShaderModule {
            handle: ShaderModuleHandle(self.next()),
            stage,
            resources: ShaderResources::default(),
        })
    }

    fn create_pipeline_layout(
        &mut self,
        modules: &[&ShaderModule],
    ) -> Result<PipelineLayout, RenderError> {
        let mut resources = ShaderResources::default();
        for module in modules {
            resources.merge(&module.resources);
        }
        Ok(PipelineLayout {
            pipeline: PipelineHandle(self.next()),
            resources,
        })
    }
}
