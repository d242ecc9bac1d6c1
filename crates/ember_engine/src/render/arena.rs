//! Slot-map backed storage for render resources
//!
//! Every cross-reference between resources goes through the generation
//! checked keys defined here, so growing or shrinking the backing storage
//! never invalidates live references, and a stale key reads as absent
//! instead of dangling.

use slotmap::{new_key_type, SlotMap};

use super::material::Material;
use super::mesh::Mesh;
use super::model::Model;
use super::texture::{Image, Sampler, Texture};

new_key_type! {
    /// Stable handle to an [`Image`]
    pub struct ImageKey;
    /// Stable handle to a [`Sampler`]
    pub struct SamplerKey;
    /// Stable handle to a [`Texture`]
    pub struct TextureKey;
    /// Stable handle to a [`Material`]
    pub struct MaterialKey;
    /// Stable handle to a [`Mesh`]
    pub struct MeshKey;
    /// Stable handle to a [`Model`]
    pub struct ModelKey;
}

/// Owning storage for every render resource kind
#[derive(Default)]
pub struct ResourceArena {
    images: SlotMap<ImageKey, Image>,
    samplers: SlotMap<SamplerKey, Sampler>,
    textures: SlotMap<TextureKey, Texture>,
    materials: SlotMap<MaterialKey, Material>,
    meshes: SlotMap<MeshKey, Mesh>,
    models: SlotMap<ModelKey, Model>,
}

impl ResourceArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an image
    pub fn insert_image(&mut self, image: Image) -> ImageKey {
        self.images.insert(image)
    }

    /// Store a sampler
    pub fn insert_sampler(&mut self, sampler: Sampler) -> SamplerKey {
        self.samplers.insert(sampler)
    }

    /// Store a texture
    pub fn insert_texture(&mut self, texture: Texture) -> TextureKey {
        self.textures.insert(texture)
    }

    /// Store a material
    pub fn insert_material(&mut self, material: Material) -> MaterialKey {
        self.materials.insert(material)
    }

    /// Store a mesh
    pub fn insert_mesh(&mut self, mesh: Mesh) -> MeshKey {
        self.meshes.insert(mesh)
    }

    /// Store a model
    pub fn insert_model(&mut self, model: Model) -> ModelKey {
        self.models.insert(model)
    }

    /// Look up an image
    pub fn image(&self, key: ImageKey) -> Option<&Image> {
        self.images.get(key)
    }

    /// Look up a sampler
    pub fn sampler(&self, key: SamplerKey) -> Option<&Sampler> {
        self.samplers.get(key)
    }

    /// Look up a texture
    pub fn texture(&self, key: TextureKey) -> Option<&Texture> {
        self.textures.get(key)
    }

    /// Look up a material
    pub fn material(&self, key: MaterialKey) -> Option<&Material> {
        self.materials.get(key)
    }

    /// Mutably look up a material
    pub fn material_mut(&mut self, key: MaterialKey) -> Option<&mut Material> {
        self.materials.get_mut(key)
    }

    /// Look up a mesh
    pub fn mesh(&self, key: MeshKey) -> Option<&Mesh> {
        self.meshes.get(key)
    }

    /// Mutably look up a mesh
    pub fn mesh_mut(&mut self, key: MeshKey) -> Option<&mut Mesh> {
        self.meshes.get_mut(key)
    }

    /// Look up a model
    pub fn model(&self, key: ModelKey) -> Option<&Model> {
        self.models.get(key)
    }

    /// Mutably look up a model
    pub fn model_mut(&mut self, key: ModelKey) -> Option<&mut Model> {
        self.models.get_mut(key)
    }

    /// Remove a mesh; existing keys elsewhere read as absent afterwards
    pub fn remove_mesh(&mut self, key: MeshKey) -> Option<Mesh> {
        self.meshes.remove(key)
    }

    /// Remove a material
    pub fn remove_material(&mut self, key: MaterialKey) -> Option<Material> {
        self.materials.remove(key)
    }

    /// Remove a model
    pub fn remove_model(&mut self, key: ModelKey) -> Option<Model> {
        self.models.remove(key)
    }

    /// Rebuild a mesh's shader variant against its currently bound material
    ///
    /// Convenience for the invariant that attribute or texture mutations
    /// must be followed by a variant recompute.
    pub fn rebuild_mesh_variant(&mut self, key: MeshKey) {
        let material = self
            .meshes
            .get(key)
            .and_then(|mesh| mesh.material())
            .and_then(|material| self.materials.get(material))
            .cloned();
        if let Some(mesh) = self.meshes.get_mut(key) {
            mesh.rebuild_variant(material.as_ref());
        }
    }
}
