//! Entity type and allocation utilities.
//!
//! An [`Entity`] is a lightweight `u64` identifier with no inherent data.
//! Identifiers are handed out by a single [`EntityAllocator`] per world and
//! are never reused, so a stale handle can always be told apart from a live
//! one.

use serde::{Deserialize, Serialize};

/// A unique entity identifier.
///
/// Entities are pure identifiers: they carry no data of their own. Components
/// are attached to entities to give them meaning.
///
/// Ordering follows the raw id, which is also allocation order. Queries rely
/// on this to enumerate entities deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u64);

impl Entity {
    /// The null / invalid entity sentinel.
    pub const INVALID: Entity = Entity(0);

    /// Create an entity from a raw `u64` identifier.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is a valid (non-zero) entity.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Errors raised while allocating entity identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    /// Every representable identifier has been handed out.
    #[error("entity id space exhausted")]
    IdsExhausted,
}

/// Allocates monotonically increasing entity IDs.
///
/// IDs are never recycled: once an entity is removed its identifier stays
/// retired for the lifetime of the allocator.
#[derive(Debug)]
pub struct EntityAllocator {
    next_id: u64,
}

impl EntityAllocator {
    /// Creates a new allocator. IDs start at 1 (0 is reserved for [`Entity::INVALID`]).
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Allocates a fresh entity ID.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::IdsExhausted`] once `u64::MAX` has been handed out.
    pub fn allocate(&mut self) -> Result<Entity, AllocError> {
        let id = self.next_id;
        if id == 0 {
            return Err(AllocError::IdsExhausted);
        }
        // Wraps to 0 after u64::MAX, which is the exhausted marker.
        self.next_id = id.wrapping_add(1);
        Ok(Entity(id))
    }

    /// Returns the number of entities allocated so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.next_id.wrapping_sub(1)
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_creation() {
        let e = Entity::from_raw(42);
        assert_eq!(e.id(), 42);
        assert!(e.is_valid());
    }

    #[test]
    fn test_entity_invalid() {
        assert!(!Entity::INVALID.is_valid());
        assert_eq!(Entity::INVALID.id(), 0);
    }

    #[test]
    fn test_entity_display() {
        assert_eq!(Entity::from_raw(7).to_string(), "Entity(7)");
    }

    #[test]
    fn test_allocator_produces_unique_ids() {
        let mut alloc = EntityAllocator::new();
        let e1 = alloc.allocate().unwrap();
        let e2 = alloc.allocate().unwrap();
        let e3 = alloc.allocate().unwrap();
        assert_eq!(e1.id(), 1);
        assert_eq!(e2.id(), 2);
        assert_eq!(e3.id(), 3);
        assert_eq!(alloc.count(), 3);
    }

    #[test]
    fn test_allocator_reports_exhaustion() {
        let mut alloc = EntityAllocator { next_id: u64::MAX };
        assert_eq!(alloc.allocate().unwrap().id(), u64::MAX);
        assert_eq!(alloc.allocate(), Err(AllocError::IdsExhausted));
        // Stays exhausted rather than wrapping back to reused ids.
        assert_eq!(alloc.allocate(), Err(AllocError::IdsExhausted));
    }

    #[test]
    fn test_entity_serialization_roundtrip() {
        let entity = Entity::from_raw(999);
        let json = serde_json::to_string(&entity).unwrap();
        let restored: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(entity, restored);
    }
}
