//! Component signatures
//!
//! A [`Signature`] is a fixed-size bitset keyed by registry-assigned
//! [`ComponentTypeId`]s. One signature per entity records which component
//! types it currently holds; one per system records which types it requires.

/// Maximum number of concurrently registered component types
pub const MAX_COMPONENT_TYPES: usize = 128;

const WORDS: usize = MAX_COMPONENT_TYPES / 64;

/// Small integer id assigned to a component type at registration
///
/// Ids index into [`Signature`] bits and into the component manager's store
/// table; they are never reused within one manager's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentTypeId(u8);

impl ComponentTypeId {
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index < MAX_COMPONENT_TYPES);
        Self(index as u8)
    }

    /// Get the id as a dense index
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// Bitset over registered component type ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Signature {
    bits: [u64; WORDS],
}

impl Signature {
    /// The empty signature (no component types)
    pub const EMPTY: Self = Self { bits: [0; WORDS] };

    /// Builder-style insertion, convenient for composing required signatures
    #[must_use]
    pub fn with(mut self, id: ComponentTypeId) -> Self {
        self.insert(id);
        self
    }

    /// Mark a component type as present
    pub fn insert(&mut self, id: ComponentTypeId) {
        self.bits[id.index() / 64] |= 1 << (id.index() % 64);
    }

    /// Mark a component type as absent
    pub fn remove(&mut self, id: ComponentTypeId) {
        self.bits[id.index() / 64] &= !(1 << (id.index() % 64));
    }

    /// Check whether a component type is present
    pub fn contains(&self, id: ComponentTypeId) -> bool {
        self.bits[id.index() / 64] & (1 << (id.index() % 64)) != 0
    }

    /// Reset to the empty signature
    pub fn clear(&mut self) {
        self.bits = [0; WORDS];
    }

    /// Check whether no component types are present
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|word| *word == 0)
    }

    /// System membership rule: an entity signature matches a required
    /// signature iff every required bit is set, i.e.
    /// `(entity & required) == required`.
    pub fn matches(&self, required: &Signature) -> bool {
        self.bits
            .iter()
            .zip(required.bits.iter())
            .all(|(entity, required)| entity & required == *required)
    }
}
