//! World facade over the entity, component, and system registries
//!
//! Every structural operation runs in a fixed order: mutate the component
//! store, recompute the entity signature, then notify system dispatch. A
//! system therefore never observes a signature that does not reflect the
//! store's actual contents.

use super::{
    Component, ComponentManager, ComponentStore, ComponentTypeId, EcsError, Entity,
    EntityRegistry, Signature, System, SystemHandle, SystemManager, MAX_ENTITIES,
};

/// An independent ECS world
///
/// Explicitly constructed and passed by reference; multiple worlds can
/// coexist, which keeps tests hermetic.
pub struct World {
    entities: EntityRegistry,
    components: ComponentManager,
    systems: SystemManager,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a world with the default entity bound
    pub fn new() -> Self {
        Self::with_capacity(MAX_ENTITIES)
    }

    /// Create a world bounded to `max_entities` live entities
    pub fn with_capacity(max_entities: usize) -> Self {
        Self {
            entities: EntityRegistry::with_capacity(max_entities),
            components: ComponentManager::new(),
            systems: SystemManager::new(),
        }
    }

    /// Create a new entity
    pub fn create_entity(&mut self) -> Result<Entity, EcsError> {
        self.entities.create()
    }

    /// Destroy an entity, cascading removal through every component store
    /// and every system's membership set
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        // Liveness check up front so a dead id mutates nothing.
        self.entities.signature(entity)?;
        self.components.entity_destroyed(entity);
        self.entities.destroy(entity)?;
        self.systems.entity_destroyed(entity);
        Ok(())
    }

    /// Register a component type
    pub fn register_component<T: Component>(&mut self) -> Result<ComponentTypeId, EcsError> {
        self.components.register::<T>()
    }

    /// Look up the type id of a registered component type
    pub fn component_type_id<T: Component>(&self) -> Result<ComponentTypeId, EcsError> {
        self.components.type_id::<T>()
    }

    /// Attach a component to an entity
    pub fn add_component<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<(), EcsError> {
        let id = self.components.type_id::<T>()?;
        let mut signature = self.entities.signature(entity)?;
        self.components.add(entity, component)?;
        signature.insert(id);
        self.entities.set_signature(entity, signature)?;
        self.systems.entity_signature_changed(entity, signature);
        Ok(())
    }

    /// Detach and return an entity's component
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<T, EcsError> {
        let id = self.components.type_id::<T>()?;
        let mut signature = self.entities.signature(entity)?;
        let component = self.components.remove::<T>(entity)?;
        signature.remove(id);
        self.entities.set_signature(entity, signature)?;
        self.systems.entity_signature_changed(entity, signature);
        Ok(component)
    }

    /// Borrow an entity's component
    pub fn component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.components.get(entity)
    }

    /// Mutably borrow an entity's component
    ///
    /// References do not survive structural mutation (add/remove) on the
    /// same store; re-fetch after such calls.
    pub fn component_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.components.get_mut(entity)
    }

    /// Check whether an entity holds a component type
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.components
            .store::<T>()
            .map(|store| store.contains(entity))
            .unwrap_or(false)
    }

    /// Borrow the dense store for a component type
    pub fn component_store<T: Component>(&self) -> Result<&ComponentStore<T>, EcsError> {
        self.components.store::<T>()
    }

    /// Get an entity's current signature
    pub fn signature(&self, entity: Entity) -> Result<Signature, EcsError> {
        self.entities.signature(entity)
    }

    /// Register a system instance, returning a shared handle to it
    pub fn register_system<S: System>(&mut self, system: S) -> Result<SystemHandle<S>, EcsError> {
        self.systems.register(system)
    }

    /// Set a system's required signature and re-evaluate every live entity
    /// against it, so registration order does not matter
    pub fn set_system_signature<S: System>(&mut self, signature: Signature) -> Result<(), EcsError> {
        self.systems.set_signature::<S>(signature)?;
        for (entity, entity_signature) in self.entities.iter_live() {
            self.systems
                .entity_signature_changed(entity, entity_signature);
        }
        Ok(())
    }

    /// Get the membership set of a registered system
    pub fn system_members<S: System>(&self) -> Result<Vec<Entity>, EcsError> {
        Ok(self.systems.members::<S>()?.iter().copied().collect())
    }

    /// Number of live entities
    pub fn live_count(&self) -> usize {
        self.entities.live_count()
    }

    /// Tick every registered system over a snapshot of its membership set
    pub fn update(&mut self, dt: f32) {
        let scheduled = self.systems.snapshot();
        for (system, members) in scheduled {
            system.borrow_mut().update(self, &members, dt);
        }
    }
}
