//! Node tree storage and traversal

use std::collections::VecDeque;

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::Mat4;
use crate::render::ModelKey;

use super::{SceneError, Transform};

new_key_type! {
    /// Stable handle to a scene node
    pub struct NodeKey;
}

/// Scene graph tree node
///
/// Owns its transform and an ordered child list; the parent link is a
/// non-owning handle.
#[derive(Debug)]
pub struct Node {
    name: String,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    transform: Transform,
}

impl Node {
    /// Node name (not deduplicated across the scene)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent handle, if any
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Ordered child handles
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Borrow the local transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutably borrow the local transform
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }
}

/// Tree of nodes plus the list of models attached to the scene
pub struct Scene {
    nodes: SlotMap<NodeKey, Node>,
    roots: Vec<NodeKey>,
    models: Vec<ModelKey>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            models: Vec::new(),
        }
    }

    /// Add a node under `parent`, or as a root when `parent` is `None`
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        parent: Option<NodeKey>,
    ) -> Result<NodeKey, SceneError> {
        if let Some(parent) = parent {
            if !self.nodes.contains_key(parent) {
                return Err(SceneError::InvalidNode);
            }
        }
        let key = self.nodes.insert(Node {
            name: name.into(),
            parent,
            children: Vec::new(),
            transform,
        });
        match parent {
            Some(parent) => self.nodes[parent].children.push(key),
            None => self.roots.push(key),
        }
        Ok(key)
    }

    /// Remove a node and its whole subtree
    pub fn remove_node(&mut self, key: NodeKey) -> Result<(), SceneError> {
        let node = self.nodes.get(key).ok_or(SceneError::InvalidNode)?;
        match node.parent {
            Some(parent) => self.nodes[parent].children.retain(|child| *child != key),
            None => self.roots.retain(|root| *root != key),
        }
        let mut pending = vec![key];
        while let Some(current) = pending.pop() {
            if let Some(removed) = self.nodes.remove(current) {
                pending.extend(removed.children);
            }
        }
        Ok(())
    }

    /// Move a node under a new parent (or to the roots)
    ///
    /// Fails if the new parent is the node itself or one of its descendants.
    pub fn set_parent(&mut self, key: NodeKey, parent: Option<NodeKey>) -> Result<(), SceneError> {
        if !self.nodes.contains_key(key) {
            return Err(SceneError::InvalidNode);
        }
        if let Some(parent) = parent {
            if !self.nodes.contains_key(parent) {
                return Err(SceneError::InvalidNode);
            }
            // Walk up from the new parent; hitting `key` would close a cycle.
            let mut ancestor = Some(parent);
            while let Some(current) = ancestor {
                if current == key {
                    return Err(SceneError::InvalidNode);
                }
                ancestor = self.nodes[current].parent;
            }
        }
        let old_parent = self.nodes[key].parent;
        match old_parent {
            Some(old) => self.nodes[old].children.retain(|child| *child != key),
            None => self.roots.retain(|root| *root != key),
        }
        match parent {
            Some(parent) => self.nodes[parent].children.push(key),
            None => self.roots.push(key),
        }
        let node = &mut self.nodes[key];
        node.parent = parent;
        // Version counters are only comparable against one parent; force a
        // recompute under the new one.
        node.transform.dirty = true;
        Ok(())
    }

    /// Borrow a node
    pub fn node(&self, key: NodeKey) -> Result<&Node, SceneError> {
        self.nodes.get(key).ok_or(SceneError::InvalidNode)
    }

    /// Mutably borrow a node
    pub fn node_mut(&mut self, key: NodeKey) -> Result<&mut Node, SceneError> {
        self.nodes.get_mut(key).ok_or(SceneError::InvalidNode)
    }

    /// Root node handles
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Breadth-first name lookup starting from the roots
    ///
    /// Names are not deduplicated; the first match in BFS order wins.
    pub fn find_node(&self, name: &str) -> Option<NodeKey> {
        let mut queue: VecDeque<NodeKey> = self.roots.iter().copied().collect();
        while let Some(key) = queue.pop_front() {
            let node = &self.nodes[key];
            if node.name == name {
                return Some(key);
            }
            queue.extend(node.children.iter().copied());
        }
        None
    }

    /// Resolve a node's world matrix, recomputing stale caches along the
    /// parent chain
    ///
    /// A cached matrix is reused only when the node is clean and the parent
    /// version it was computed against still matches; otherwise the chain is
    /// recomputed top-down from the nearest valid ancestor.
    pub fn world_matrix(&mut self, key: NodeKey) -> Result<Mat4, SceneError> {
        let mut chain = Vec::new();
        let mut current = Some(key);
        while let Some(link) = current {
            let node = self.nodes.get(link).ok_or(SceneError::InvalidNode)?;
            chain.push(link);
            current = node.parent;
        }

        let mut parent_world = Mat4::identity();
        let mut parent_version = 0u64;
        for link in chain.into_iter().rev() {
            let transform = &mut self.nodes[link].transform;
            if transform.dirty || transform.parent_version != parent_version {
                transform.world = parent_world * transform.local_matrix();
                transform.parent_version = parent_version;
                transform.version = transform.version.wrapping_add(1);
                transform.dirty = false;
            }
            parent_world = transform.world;
            parent_version = transform.version;
        }
        Ok(parent_world)
    }

    /// Attach a model to the scene's draw list
    pub fn attach_model(&mut self, model: ModelKey) {
        self.models.push(model);
    }

    /// Detach a model from the scene's draw list
    pub fn detach_model(&mut self, model: ModelKey) {
        self.models.retain(|attached| *attached != model);
    }

    /// Models attached to the scene
    pub fn models(&self) -> &[ModelKey] {
        &self.models
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Vec3};
    use approx::assert_relative_eq;

    fn translation(x: f32, y: f32, z: f32) -> Transform {
        Transform::new(
            Vec3::new(x, y, z),
            Quat::identity(),
            Vec3::new(1.0, 1.0, 1.0),
        )
    }

    #[test]
    fn find_node_is_breadth_first() {
        let mut scene = Scene::new();
        let root = scene
            .add_node("root", Transform::identity(), None)
            .unwrap();
        let shallow = scene
            .add_node("target", Transform::identity(), Some(root))
            .unwrap();
        let branch = scene
            .add_node("branch", Transform::identity(), Some(root))
            .unwrap();
        // A deeper node with the same name must lose to the shallow one.
        scene
            .add_node("target", Transform::identity(), Some(branch))
            .unwrap();

        assert_eq!(scene.find_node("target"), Some(shallow));
        assert_eq!(scene.find_node("missing"), None);
    }

    #[test]
    fn world_matrix_composes_through_parents() {
        let mut scene = Scene::new();
        let root = scene.add_node("root", translation(1.0, 0.0, 0.0), None).unwrap();
        let child = scene
            .add_node("child", translation(0.0, 2.0, 0.0), Some(root))
            .unwrap();
        let grandchild = scene
            .add_node("grandchild", translation(0.0, 0.0, 3.0), Some(child))
            .unwrap();

        let world = scene.world_matrix(grandchild).unwrap();
        let origin = world.transform_point(&nalgebra::Point3::origin());
        assert_relative_eq!(origin.coords, Vec3::new(1.0, 2.0, 3.0), epsilon = 1e-6);
    }

    #[test]
    fn world_matrix_read_is_idempotent() {
        let mut scene = Scene::new();
        let root = scene.add_node("root", translation(1.0, 2.0, 3.0), None).unwrap();
        let child = scene
            .add_node("child", translation(4.0, 5.0, 6.0), Some(root))
            .unwrap();

        let first = scene.world_matrix(child).unwrap();
        let second = scene.world_matrix(child).unwrap();
        // Bit-identical: the second read must come straight from the cache.
        assert_eq!(first, second);
    }

    #[test]
    fn ancestor_change_cascades_through_three_levels() {
        let mut scene = Scene::new();
        let root = scene.add_node("root", translation(0.0, 0.0, 0.0), None).unwrap();
        let child = scene
            .add_node("child", translation(0.0, 1.0, 0.0), Some(root))
            .unwrap();
        let grandchild = scene
            .add_node("grandchild", translation(0.0, 0.0, 1.0), Some(child))
            .unwrap();

        // Prime every cache.
        let _ = scene.world_matrix(grandchild).unwrap();

        // Move the root only; the grandchild's cached matrix must not be
        // trusted even though its own flag is clean.
        scene
            .node_mut(root)
            .unwrap()
            .transform_mut()
            .set_translation(Vec3::new(10.0, 0.0, 0.0));

        let world = scene.world_matrix(grandchild).unwrap();
        let origin = world.transform_point(&nalgebra::Point3::origin());
        assert_relative_eq!(origin.coords, Vec3::new(10.0, 1.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn reparenting_invalidates_cached_world() {
        let mut scene = Scene::new();
        let a = scene.add_node("a", translation(1.0, 0.0, 0.0), None).unwrap();
        let b = scene.add_node("b", translation(2.0, 0.0, 0.0), None).unwrap();
        let child = scene
            .add_node("child", translation(0.0, 1.0, 0.0), Some(a))
            .unwrap();
        let _ = scene.world_matrix(child).unwrap();

        scene.set_parent(child, Some(b)).unwrap();
        let world = scene.world_matrix(child).unwrap();
        let origin = world.transform_point(&nalgebra::Point3::origin());
        assert_relative_eq!(origin.coords, Vec3::new(2.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn reparenting_under_a_descendant_is_rejected() {
        let mut scene = Scene::new();
        let root = scene.add_node("root", Transform::identity(), None).unwrap();
        let child = scene
            .add_node("child", Transform::identity(), Some(root))
            .unwrap();

        assert_eq!(
            scene.set_parent(root, Some(child)),
            Err(SceneError::InvalidNode)
        );
        assert_eq!(scene.set_parent(root, Some(root)), Err(SceneError::InvalidNode));
    }

    #[test]
    fn remove_node_drops_subtree() {
        let mut scene = Scene::new();
        let root = scene.add_node("root", Transform::identity(), None).unwrap();
        let child = scene
            .add_node("child", Transform::identity(), Some(root))
            .unwrap();
        let grandchild = scene
            .add_node("grandchild", Transform::identity(), Some(child))
            .unwrap();

        scene.remove_node(child).unwrap();
        assert_eq!(scene.node_count(), 1);
        assert!(scene.node(child).is_err());
        assert!(scene.node(grandchild).is_err());
        assert!(scene.node(root).unwrap().children().is_empty());
    }
}
