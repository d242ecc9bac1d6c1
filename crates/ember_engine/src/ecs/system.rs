//! System registry and signature-based dispatch
//!
//! Each registered system is a singleton per type with a required-component
//! [`Signature`] and a membership set. Membership is recomputed whenever an
//! entity's signature changes or the entity is destroyed: an entity belongs
//! to a system iff its signature contains every required bit.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::{EcsError, Entity, Signature, World};

/// Per-frame logic over entities matching a required signature
///
/// Iteration order over `entities` carries no guarantee; membership sets are
/// unordered.
pub trait System: 'static {
    /// Tick the system over its current membership set
    fn update(&mut self, world: &mut World, entities: &[Entity], dt: f32);
}

/// Shared handle to a registered system instance
///
/// The runtime is single-threaded by contract, so shared ownership uses
/// `Rc<RefCell<_>>`; re-entrant world updates from inside a system tick are
/// a caller error and abort via the borrow check.
pub type SystemHandle<S> = Rc<RefCell<S>>;

struct SystemEntry {
    name: &'static str,
    signature: Signature,
    members: HashSet<Entity>,
    system: Rc<RefCell<dyn System>>,
}

/// Registry of systems with their signatures and membership sets
pub struct SystemManager {
    entries: Vec<SystemEntry>,
    index: HashMap<&'static str, usize>,
}

impl Default for SystemManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a system instance (singleton per type)
    pub fn register<S: System>(&mut self, system: S) -> Result<SystemHandle<S>, EcsError> {
        let name = std::any::type_name::<S>();
        if self.index.contains_key(name) {
            return Err(EcsError::SystemAlreadyRegistered(name));
        }
        let handle = Rc::new(RefCell::new(system));
        self.index.insert(name, self.entries.len());
        self.entries.push(SystemEntry {
            name,
            signature: Signature::EMPTY,
            members: HashSet::new(),
            system: handle.clone(),
        });
        Ok(handle)
    }

    /// Associate a required-component signature with a registered system
    pub fn set_signature<S: System>(&mut self, signature: Signature) -> Result<(), EcsError> {
        let entry = self.entry_mut::<S>()?;
        entry.signature = signature;
        Ok(())
    }

    /// Get the membership set of a registered system
    pub fn members<S: System>(&self) -> Result<&HashSet<Entity>, EcsError> {
        let name = std::any::type_name::<S>();
        let index = self
            .index
            .get(name)
            .ok_or(EcsError::UnregisteredSystem(name))?;
        Ok(&self.entries[*index].members)
    }

    /// Recompute every system's membership for one entity's new signature
    pub fn entity_signature_changed(&mut self, entity: Entity, signature: Signature) {
        for entry in &mut self.entries {
            if signature.matches(&entry.signature) {
                entry.members.insert(entity);
            } else {
                entry.members.remove(&entity);
            }
        }
    }

    /// Drop a destroyed entity from every membership set
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for entry in &mut self.entries {
            entry.members.remove(&entity);
        }
    }

    /// Snapshot every system with its current members, in registration order
    ///
    /// The snapshot decouples dispatch from the registry so a running system
    /// can perform structural world mutations without invalidating the tick.
    pub fn snapshot(&self) -> Vec<(Rc<RefCell<dyn System>>, Vec<Entity>)> {
        self.entries
            .iter()
            .map(|entry| {
                (
                    entry.system.clone(),
                    entry.members.iter().copied().collect(),
                )
            })
            .collect()
    }

    /// Names of registered systems, in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    fn entry_mut<S: System>(&mut self) -> Result<&mut SystemEntry, EcsError> {
        let name = std::any::type_name::<S>();
        let index = self
            .index
            .get(name)
            .ok_or(EcsError::UnregisteredSystem(name))?;
        Ok(&mut self.entries[*index])
    }
}
