//! Material records

use std::collections::HashMap;

use super::arena::TextureKey;

/// How a material's alpha channel is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlphaMode {
    /// Alpha ignored, geometry rendered in the opaque phase
    #[default]
    Opaque,
    /// Alpha tested against a cutoff, still rendered opaque
    Mask,
    /// Alpha blended, rendered in the back-to-front transparent phase
    Blend,
}

/// Surface description binding named textures and blend behavior
///
/// Texture references are non-owning arena keys. Any change to the texture
/// set must be followed by rebuilding the shader variant of every mesh using
/// this material, or pipeline selection goes stale.
#[derive(Debug, Clone)]
pub struct Material {
    name: String,
    textures: HashMap<String, TextureKey>,

    /// Base color multiplier (RGBA)
    pub base_color_factor: [f32; 4],
    /// Alpha interpretation
    pub alpha_mode: AlphaMode,
    /// Cutoff threshold for [`AlphaMode::Mask`]
    pub alpha_cutoff: f32,
    /// Disable back-face culling for this material
    pub double_sided: bool,
}

impl Material {
    /// Create a material with default parameters and no textures
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            textures: HashMap::new(),
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: 0.5,
            double_sided: false,
        }
    }

    /// Material name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bind a texture under a slot name (e.g. `baseColor`)
    pub fn set_texture(&mut self, slot: impl Into<String>, texture: TextureKey) {
        self.textures.insert(slot.into(), texture);
    }

    /// Remove a texture slot
    pub fn remove_texture(&mut self, slot: &str) -> Option<TextureKey> {
        self.textures.remove(slot)
    }

    /// Look up a texture by slot name
    pub fn texture(&self, slot: &str) -> Option<TextureKey> {
        self.textures.get(slot).copied()
    }

    /// Iterate over bound (slot, texture) pairs
    pub fn textures(&self) -> impl Iterator<Item = (&str, TextureKey)> {
        self.textures.iter().map(|(slot, key)| (slot.as_str(), *key))
    }

    /// Slot names of bound textures
    pub fn texture_slots(&self) -> impl Iterator<Item = &str> {
        self.textures.keys().map(String::as_str)
    }
}
