//! Image, sampler, and texture records
//!
//! Thin descriptions of GPU-resident resources. The actual image memory and
//! sampler objects live in the external backend; these records pair the
//! opaque backend handles with the metadata the submission path needs.

use super::arena::{ImageKey, SamplerKey};
use super::commands::{SamplerHandle, TextureHandle};

/// Pixel format of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// 8-bit RGBA, linear
    Rgba8Unorm,
    /// 8-bit RGBA, sRGB encoded
    Rgba8Srgb,
    /// 16-bit float RGBA
    Rgba16Float,
}

/// GPU image description
#[derive(Debug, Clone)]
pub struct Image {
    /// Debug name
    pub name: String,
    /// Width and height in pixels
    pub extent: (u32, u32),
    /// Pixel format
    pub format: ImageFormat,
    /// Backend image handle
    pub handle: TextureHandle,
}

/// Texture filtering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Nearest-neighbor sampling
    Nearest,
    /// Linear interpolation
    Linear,
}

/// Texture addressing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Tile the texture
    Repeat,
    /// Clamp to the edge texel
    ClampToEdge,
    /// Tile with mirroring
    MirroredRepeat,
}

/// GPU sampler description
#[derive(Debug, Clone)]
pub struct Sampler {
    /// Minification filter
    pub min_filter: Filter,
    /// Magnification filter
    pub mag_filter: Filter,
    /// U addressing
    pub wrap_u: WrapMode,
    /// V addressing
    pub wrap_v: WrapMode,
    /// Backend sampler handle
    pub handle: SamplerHandle,
}

impl Sampler {
    /// Linear filtering with repeat addressing
    pub fn linear(handle: SamplerHandle) -> Self {
        Self {
            min_filter: Filter::Linear,
            mag_filter: Filter::Linear,
            wrap_u: WrapMode::Repeat,
            wrap_v: WrapMode::Repeat,
            handle,
        }
    }
}

/// An image/sampler pair bindable at a shader slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture {
    /// Sampled image
    pub image: ImageKey,
    /// Sampler used to read it
    pub sampler: SamplerKey,
}
