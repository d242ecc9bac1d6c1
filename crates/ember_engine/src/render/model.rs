//! Model records

use crate::scene::NodeKey;

use super::arena::MeshKey;
use super::bounds::Aabb;

/// A drawable asset: local bounds plus references to scene nodes and meshes
///
/// Nodes and meshes are non-owning arena/scene keys; a model attached to a
/// scene is drawn once per referenced node, with the node's world transform
/// applied to every referenced mesh and to the model bounds.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    /// Local-space bounds enclosing every mesh
    pub bounds: Aabb,
    nodes: Vec<NodeKey>,
    meshes: Vec<MeshKey>,
}

impl Model {
    /// Create an empty model with inverted bounds
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Aabb::empty(),
            nodes: Vec::new(),
            meshes: Vec::new(),
        }
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reference a scene node this model is drawn at
    pub fn add_node(&mut self, node: NodeKey) {
        self.nodes.push(node);
    }

    /// Referenced scene nodes
    pub fn nodes(&self) -> &[NodeKey] {
        &self.nodes
    }

    /// Reference a mesh drawn for every node
    pub fn add_mesh(&mut self, mesh: MeshKey) {
        self.meshes.push(mesh);
    }

    /// Referenced meshes
    pub fn meshes(&self) -> &[MeshKey] {
        &self.meshes
    }
}
