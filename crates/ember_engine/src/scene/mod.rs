//! Scene graph and transform propagation
//!
//! A [`Scene`] owns a tree of named nodes in slot-map backed storage, so node
//! handles stay valid while the backing arena grows. Each node carries a
//! [`Transform`] with a lazily recomputed, version-checked world matrix;
//! resolution always walks the parent chain, never trusting a child's cache
//! alone.

pub mod description;
pub mod graph;
pub mod transform;

pub use description::{NodeDescription, SceneDescription};
pub use graph::{Node, NodeKey, Scene};
pub use transform::Transform;

use thiserror::Error;

/// Errors raised by scene graph operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// A node handle no longer points at a live node
    #[error("scene node handle is stale or invalid")]
    InvalidNode,

    /// A scene description failed to parse or validate
    #[error("failed to parse scene description: {0}")]
    Description(String),
}
