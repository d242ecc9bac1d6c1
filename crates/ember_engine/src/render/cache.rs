//! Memoizing cache over the render device
//!
//! Shader modules are keyed by (stage, source id, variant hash); pipelines
//! by their module handle set. Each distinct key reaches the device exactly
//! once; repeated requests return the cached object.

use std::collections::HashMap;

use super::commands::ShaderModuleHandle;
use super::shader::{PipelineLayout, RenderDevice, ShaderModule, ShaderSource, ShaderStage};
use super::variant::ShaderVariant;
use super::RenderError;

type ModuleCacheKey = (ShaderStage, String, u64);

/// Idempotent lookup cache for shader modules and pipelines
#[derive(Default)]
pub struct ResourceCache {
    modules: HashMap<ModuleCacheKey, ShaderModule>,
    layouts: HashMap<Vec<ShaderModuleHandle>, PipelineLayout>,
}

impl ResourceCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a shader module, compiling through the device on first use
    pub fn request_shader_module(
        &mut self,
        device: &mut dyn RenderDevice,
        stage: ShaderStage,
        source: &ShaderSource,
        variant: &ShaderVariant,
    ) -> Result<ShaderModule, RenderError> {
        let key = (stage, source.id.clone(), variant.hash_id());
        if let Some(module) = self.modules.get(&key) {
            return Ok(module.clone());
        }
        log::debug!(
            "compiling {stage:?} shader `{}` with {} defines",
            source.id,
            variant.len()
        );
        let module = device.create_shader_module(stage, source, variant)?;
        self.modules.insert(key, module.clone());
        Ok(module)
    }

    /// Request a pipeline for a module set, building on first use
    pub fn request_pipeline_layout(
        &mut self,
        device: &mut dyn RenderDevice,
        modules: &[&ShaderModule],
    ) -> Result<PipelineLayout, RenderError> {
        let key: Vec<ShaderModuleHandle> = modules.iter().map(|module| module.handle).collect();
        if let Some(layout) = self.layouts.get(&key) {
            return Ok(layout.clone());
        }
        let layout = device.create_pipeline_layout(modules)?;
        self.layouts.insert(key, layout.clone());
        Ok(layout)
    }

    /// Number of cached shader modules
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Number of cached pipelines
    pub fn layout_count(&self) -> usize {
        self.layouts.len()
    }

    /// Drop every cached object (e.g. after a device loss)
    pub fn clear(&mut self) {
        self.modules.clear();
        self.layouts.clear();
    }
}
