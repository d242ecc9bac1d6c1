//! Mesh records: vertex attribute bindings, index binding, shader variant

use std::collections::HashMap;

use super::arena::MaterialKey;
use super::commands::{BufferHandle, IndexType};
use super::material::Material;
use super::variant::ShaderVariant;

/// Element format of one vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// Two 32-bit floats
    Float2,
    /// Three 32-bit floats
    Float3,
    /// Four 32-bit floats
    Float4,
}

impl VertexFormat {
    /// Size of one element in bytes
    pub fn size(self) -> u32 {
        match self {
            Self::Float2 => 8,
            Self::Float3 => 12,
            Self::Float4 => 16,
        }
    }
}

/// One named vertex attribute backed by a GPU buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Backing buffer
    pub buffer: BufferHandle,
    /// Element format
    pub format: VertexFormat,
    /// Stride between elements in bytes
    pub stride: u32,
    /// Byte offset of the first element
    pub offset: u32,
}

/// Index buffer binding for indexed draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBinding {
    /// Backing buffer
    pub buffer: BufferHandle,
    /// Index element width
    pub index_type: IndexType,
    /// Number of indices to draw
    pub count: u32,
}

/// Drawable geometry: named attributes, optional index binding, material
///
/// The shader variant is derived from which attributes and material textures
/// are present. Mutating either set requires [`Mesh::rebuild_variant`], or
/// pipeline selection becomes stale.
#[derive(Debug, Clone)]
pub struct Mesh {
    name: String,
    attributes: HashMap<String, VertexAttribute>,
    vertex_count: u32,
    index_binding: Option<IndexBinding>,
    material: Option<MaterialKey>,
    variant: ShaderVariant,
}

impl Mesh {
    /// Create an empty mesh
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: HashMap::new(),
            vertex_count: 0,
            index_binding: None,
            material: None,
            variant: ShaderVariant::new(),
        }
    }

    /// Mesh name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add or replace a named vertex attribute (e.g. `position`, `normal`)
    pub fn set_attribute(&mut self, name: impl Into<String>, attribute: VertexAttribute) {
        self.attributes.insert(name.into(), attribute);
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&VertexAttribute> {
        self.attributes.get(name)
    }

    /// Iterate over (name, attribute) pairs
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &VertexAttribute)> {
        self.attributes
            .iter()
            .map(|(name, attribute)| (name.as_str(), attribute))
    }

    /// Number of vertices for non-indexed draws
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Set the vertex count
    pub fn set_vertex_count(&mut self, count: u32) {
        self.vertex_count = count;
    }

    /// Index binding, if the mesh draws indexed
    pub fn index_binding(&self) -> Option<&IndexBinding> {
        self.index_binding.as_ref()
    }

    /// Set or clear the index binding
    pub fn set_index_binding(&mut self, binding: Option<IndexBinding>) {
        self.index_binding = binding;
    }

    /// Material reference, if bound
    pub fn material(&self) -> Option<MaterialKey> {
        self.material
    }

    /// Bind or unbind the material
    pub fn set_material(&mut self, material: Option<MaterialKey>) {
        self.material = material;
    }

    /// Current shader variant
    pub fn variant(&self) -> &ShaderVariant {
        &self.variant
    }

    /// Recompute the shader variant from present vertex attributes and the
    /// bound material's texture slots
    pub fn rebuild_variant(&mut self, material: Option<&Material>) {
        self.variant.clear();
        for name in self.attributes.keys() {
            self.variant.add_present(name);
        }
        if let Some(material) = material {
            for slot in material.texture_slots() {
                self.variant.add_present(slot);
            }
        }
    }
}
