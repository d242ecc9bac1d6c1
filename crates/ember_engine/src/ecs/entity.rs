//! Entity identifiers and the entity registry

use super::{EcsError, Signature};

/// Default live-entity bound for a registry
pub const MAX_ENTITIES: usize = 4096;

/// Entity identifier
///
/// Opaque integer handle, unique while alive, recycled after destruction.
/// All meaning comes from attached components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    id: u32,
}

impl Entity {
    pub(super) fn new(id: u32) -> Self {
        Self { id }
    }

    /// Get the entity id
    pub fn id(&self) -> u32 {
        self.id
    }
}

/// Issues and recycles entity ids and tracks per-entity signatures
pub struct EntityRegistry {
    // Stack of unissued ids; the top is the next id handed out.
    free: Vec<u32>,
    signatures: Vec<Signature>,
    alive: Vec<bool>,
    live_count: usize,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    /// Create a registry with the default entity bound
    pub fn new() -> Self {
        Self::with_capacity(MAX_ENTITIES)
    }

    /// Create a registry bounded to `capacity` live entities
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            // Reversed so ids are first issued in ascending order.
            free: (0..capacity as u32).rev().collect(),
            signatures: vec![Signature::EMPTY; capacity],
            alive: vec![false; capacity],
            live_count: 0,
        }
    }

    /// Issue a fresh entity id from the free pool
    pub fn create(&mut self) -> Result<Entity, EcsError> {
        let id = self.free.pop().ok_or(EcsError::EntityCapacity {
            max: self.capacity(),
        })?;
        self.alive[id as usize] = true;
        self.live_count += 1;
        Ok(Entity::new(id))
    }

    /// Destroy a live entity, clearing its signature and recycling its id
    pub fn destroy(&mut self, entity: Entity) -> Result<(), EcsError> {
        let index = self.check(entity)?;
        self.signatures[index] = Signature::EMPTY;
        self.alive[index] = false;
        self.free.push(entity.id());
        self.live_count -= 1;
        Ok(())
    }

    /// Get a live entity's signature
    pub fn signature(&self, entity: Entity) -> Result<Signature, EcsError> {
        let index = self.check(entity)?;
        Ok(self.signatures[index])
    }

    /// Replace a live entity's signature
    pub fn set_signature(&mut self, entity: Entity, signature: Signature) -> Result<(), EcsError> {
        let index = self.check(entity)?;
        self.signatures[index] = signature;
        Ok(())
    }

    /// Check whether an entity id is currently alive
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive
            .get(entity.id() as usize)
            .copied()
            .unwrap_or(false)
    }

    /// Number of live entities
    pub fn live_count(&self) -> usize {
        self.live_count
    }

    /// Configured live-entity bound
    pub fn capacity(&self) -> usize {
        self.signatures.len()
    }

    /// Iterate over live entities and their signatures
    pub fn iter_live(&self) -> impl Iterator<Item = (Entity, Signature)> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(index, _)| (Entity::new(index as u32), self.signatures[index]))
    }

    fn check(&self, entity: Entity) -> Result<usize, EcsError> {
        let index = entity.id() as usize;
        if index < self.alive.len() && self.alive[index] {
            Ok(index)
        } else {
            Err(EcsError::DeadEntity(entity))
        }
    }
}
