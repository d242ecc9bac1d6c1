//! Entity-Component-System runtime
//!
//! Entities are recyclable integer ids with no intrinsic data. Components are
//! plain data records held in per-type dense stores. Systems declare a
//! required-component [`Signature`] and receive the set of matching entities
//! every tick. The [`World`] facade composes the three registries and keeps
//! them consistent across every structural operation.
//!
//! The world is an explicitly constructed context object: nothing in this
//! module is global, and independent worlds can coexist in one process.

pub mod components;
pub mod entity;
pub mod signature;
pub mod storage;
pub mod system;
pub mod world;

pub use entity::{Entity, EntityRegistry, MAX_ENTITIES};
pub use signature::{ComponentTypeId, Signature, MAX_COMPONENT_TYPES};
pub use storage::{Component, ComponentManager, ComponentStore};
pub use system::{System, SystemHandle, SystemManager};
pub use world::World;

use thiserror::Error;

/// Errors raised by ECS structural operations
///
/// Capacity and missing-entry violations indicate a broken caller contract;
/// they are surfaced as explicit errors so production builds can fail fast
/// without undefined behavior.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// No free entity id remains
    #[error("entity capacity exhausted ({max} live entities)")]
    EntityCapacity {
        /// The configured live-entity bound
        max: usize,
    },

    /// The entity id is out of range or not currently alive
    #[error("entity {0:?} is not alive")]
    DeadEntity(Entity),

    /// No component-type id remains to assign
    #[error("component type capacity exhausted ({max} registered types)")]
    ComponentTypeCapacity {
        /// The maximum number of concurrently registered component types
        max: usize,
    },

    /// The component type was registered twice
    #[error("component type `{0}` is already registered")]
    ComponentAlreadyRegistered(&'static str),

    /// The component type was never registered
    #[error("component type `{0}` is not registered")]
    UnregisteredComponent(&'static str),

    /// The entity already holds a component of this type
    #[error("entity {entity:?} already has a `{name}` component")]
    DuplicateComponent {
        /// Offending entity
        entity: Entity,
        /// Component type name
        name: &'static str,
    },

    /// The entity holds no component of this type
    #[error("entity {entity:?} has no `{name}` component")]
    MissingComponent {
        /// Offending entity
        entity: Entity,
        /// Component type name
        name: &'static str,
    },

    /// The system type was registered twice
    #[error("system `{0}` is already registered")]
    SystemAlreadyRegistered(&'static str),

    /// The system type was never registered
    #[error("system `{0}` is not registered")]
    UnregisteredSystem(&'static str),
}
