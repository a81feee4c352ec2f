//! Sparse, per-component storage.
//!
//! Every declared component name owns one storage. A value exists for an
//! entity if and only if it was explicitly set, so rows are sparse and
//! heterogeneous: there are no archetypes and no default-filled slots.
//!
//! Storages are held behind the object-safe [`ComponentStorage`] trait so the
//! entity store can keep many value types in one map. Typed access goes
//! through [`ComponentStorage::as_any`] and a downcast to [`SparseStorage<T>`].

use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;

use crate::entity::Entity;

/// Type-erased capability shared by every component storage.
pub trait ComponentStorage: 'static {
    /// Detach the value stored for `entity`. Returns `true` if one existed.
    fn remove(&mut self, entity: Entity) -> bool;

    /// Returns `true` if `entity` has a value in this storage.
    fn contains(&self, entity: Entity) -> bool;

    /// Number of entities holding a value.
    fn len(&self) -> usize;

    /// Returns `true` if no entity holds a value.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entities holding a value, in ascending id order.
    fn entities(&self) -> Box<dyn Iterator<Item = Entity> + '_>;

    /// The Rust type of the stored values.
    fn value_type(&self) -> TypeId;

    /// Human-readable name of the stored value type.
    fn value_type_name(&self) -> &'static str;

    /// Upcast for downcasting to the concrete storage.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete storage.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Entity → value map for a single component, iterated in entity order.
#[derive(Debug, Clone)]
pub struct SparseStorage<T> {
    values: BTreeMap<Entity, T>,
}

impl<T> SparseStorage<T> {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Store `value` for `entity`, returning the value it replaced.
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        self.values.insert(entity, value)
    }

    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.values.get(&entity)
    }

    #[must_use]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.values.get_mut(&entity)
    }

    /// Detach and return the value stored for `entity`.
    pub fn take(&mut self, entity: Entity) -> Option<T> {
        self.values.remove(&entity)
    }

    /// Iterate `(entity, value)` pairs in ascending entity order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.values.iter().map(|(&e, v)| (e, v))
    }
}

impl<T> Default for SparseStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> ComponentStorage for SparseStorage<T> {
    fn remove(&mut self, entity: Entity) -> bool {
        self.values.remove(&entity).is_some()
    }

    fn contains(&self, entity: Entity) -> bool {
        self.values.contains_key(&entity)
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn entities(&self) -> Box<dyn Iterator<Item = Entity> + '_> {
        Box::new(self.values.keys().copied())
    }

    fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn value_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_overwrites_and_returns_previous() {
        let mut storage = SparseStorage::new();
        assert_eq!(storage.insert(Entity(1), 10i32), None);
        assert_eq!(storage.insert(Entity(1), 20), Some(10));
        assert_eq!(storage.get(Entity(1)), Some(&20));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_sparse_rows() {
        let mut storage = SparseStorage::new();
        storage.insert(Entity(3), "c");
        storage.insert(Entity(1), "a");
        assert!(storage.contains(Entity(1)));
        assert!(!storage.contains(Entity(2)));
        assert!(storage.get(Entity(2)).is_none());
    }

    #[test]
    fn test_entities_are_ascending() {
        let mut storage = SparseStorage::new();
        for id in [9, 2, 5, 1] {
            storage.insert(Entity(id), ());
        }
        let order: Vec<u64> = storage.entities().map(Entity::id).collect();
        assert_eq!(order, vec![1, 2, 5, 9]);
    }

    #[test]
    fn test_erased_remove() {
        let mut storage: Box<dyn ComponentStorage> = Box::new(SparseStorage::<f64>::new());
        storage
            .as_any_mut()
            .downcast_mut::<SparseStorage<f64>>()
            .unwrap()
            .insert(Entity(4), 1.5);
        assert!(storage.remove(Entity(4)));
        assert!(!storage.remove(Entity(4)));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_downcast_rejects_wrong_type() {
        let storage: Box<dyn ComponentStorage> = Box::new(SparseStorage::<u32>::new());
        assert!(storage.as_any().downcast_ref::<SparseStorage<i32>>().is_none());
        assert_eq!(storage.value_type_name(), "u32");
    }

    #[test]
    fn test_get_mut_and_take() {
        let mut storage = SparseStorage::new();
        storage.insert(Entity(1), vec![1u8]);
        storage.get_mut(Entity(1)).unwrap().push(2);
        assert_eq!(storage.take(Entity(1)), Some(vec![1, 2]));
        assert!(storage.take(Entity(1)).is_none());
    }
}
