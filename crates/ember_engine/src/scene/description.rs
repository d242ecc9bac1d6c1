//! Declarative scene descriptions loadable from RON
//!
//! A description is a tree of named nodes with TRS values; instantiating it
//! builds the corresponding node hierarchy in a [`Scene`].

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Quaternion, Unit, Vec3};

use super::{NodeKey, Scene, SceneError, Transform};

/// One node in a scene description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDescription {
    /// Node name, used for [`Scene::find_node`] lookups
    pub name: String,

    /// Local translation
    #[serde(default)]
    pub translation: [f32; 3],

    /// Local rotation quaternion as `[x, y, z, w]`
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],

    /// Local scale
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],

    /// Child nodes
    #[serde(default)]
    pub children: Vec<NodeDescription>,
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl NodeDescription {
    fn to_transform(&self) -> Transform {
        let [x, y, z, w] = self.rotation;
        Transform::new(
            Vec3::from(self.translation),
            Unit::new_normalize(Quaternion::new(w, x, y, z)),
            Vec3::from(self.scale),
        )
    }
}

/// A full scene description: a forest of node trees
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Root nodes
    pub nodes: Vec<NodeDescription>,
}

impl SceneDescription {
    /// Parse a description from RON text
    pub fn from_ron(source: &str) -> Result<Self, SceneError> {
        ron::from_str(source).map_err(|err| SceneError::Description(err.to_string()))
    }
}

impl Scene {
    /// Instantiate a description, returning the created root node handles
    pub fn instantiate(&mut self, description: &SceneDescription) -> Result<Vec<NodeKey>, SceneError> {
        description
            .nodes
            .iter()
            .map(|node| self.instantiate_node(node, None))
            .collect()
    }

    fn instantiate_node(
        &mut self,
        description: &NodeDescription,
        parent: Option<NodeKey>,
    ) -> Result<NodeKey, SceneError> {
        let key = self.add_node(description.name.clone(), description.to_transform(), parent)?;
        for child in &description.children {
            self.instantiate_node(child, Some(key))?;
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SCENE: &str = r#"(
        nodes: [
            (
                name: "hull",
                translation: (1.0, 0.0, 0.0),
                children: [
                    (name: "turret", translation: (0.0, 2.0, 0.0)),
                ],
            ),
        ],
    )"#;

    #[test]
    fn ron_round_trip_builds_hierarchy() {
        let description = SceneDescription::from_ron(SCENE).unwrap();
        let mut scene = Scene::new();
        let roots = scene.instantiate(&description).unwrap();
        assert_eq!(roots.len(), 1);

        let turret = scene.find_node("turret").unwrap();
        let world = scene.world_matrix(turret).unwrap();
        let origin = world.transform_point(&nalgebra::Point3::origin());
        assert_relative_eq!(
            origin.coords,
            Vec3::new(1.0, 2.0, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn malformed_description_is_an_error() {
        assert!(matches!(
            SceneDescription::from_ron("(nodes: oops)"),
            Err(SceneError::Description(_))
        ));
    }
}
