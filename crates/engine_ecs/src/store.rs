//! Entity Store: entity identities plus one sparse storage per composed
//! component.
//!
//! Components are addressed by name. The store is built from a
//! [`Composition`], so its set of component names and value types is fixed
//! for its whole lifetime; only values change.
//!
//! Every operation on an entity checks that the entity is alive. Using a
//! removed or never-created entity fails with [`StoreError::NoSuchEntity`]
//! and leaves every storage untouched.

use std::any::type_name;
use std::collections::{BTreeSet, HashMap};

use engine_component::{
    AllocError, ComponentId, ComponentStorage, Entity, EntityAllocator, FieldMeta,
    QueryDescriptor, SparseStorage,
};
use thiserror::Error;

use crate::compose::Composition;

/// Errors from entity and component operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The entity was never created or has been removed.
    #[error("{0} does not exist")]
    NoSuchEntity(Entity),
    /// The component name is not part of the composition.
    #[error("unknown component: {0}")]
    UnknownComponent(String),
    /// The value type does not match the component's declared type.
    #[error("component '{component}' stores {expected}, not {found}")]
    TypeMismatch {
        component: String,
        expected: &'static str,
        found: &'static str,
    },
    /// The configured `max_entities` limit is reached.
    #[error("entity capacity of {limit} exhausted")]
    CapacityExhausted { limit: usize },
    /// The entity id space is used up.
    #[error(transparent)]
    Alloc(#[from] AllocError),
}

struct Slot {
    meta: FieldMeta,
    storage: Box<dyn ComponentStorage>,
}

/// Owns entity identities and all component values.
pub struct EntityStore {
    allocator: EntityAllocator,
    alive: BTreeSet<Entity>,
    /// One slot per field, in composition order.
    slots: Vec<Slot>,
    index: HashMap<ComponentId, usize>,
    /// Maximum number of live entities; 0 means unbounded.
    max_entities: usize,
}

impl EntityStore {
    /// Build an empty store with one storage per field in `composition`.
    #[must_use]
    pub fn new(composition: &Composition) -> Self {
        Self::with_limit(composition, 0)
    }

    /// Like [`EntityStore::new`], refusing to hold more than `max_entities`
    /// live entities (0 = unbounded).
    #[must_use]
    pub fn with_limit(composition: &Composition, max_entities: usize) -> Self {
        let slots: Vec<Slot> = composition
            .fields()
            .iter()
            .map(|meta| Slot {
                meta: meta.clone(),
                storage: (meta.new_storage)(),
            })
            .collect();
        let index = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (slot.meta.id, i))
            .collect();

        Self {
            allocator: EntityAllocator::new(),
            alive: BTreeSet::new(),
            slots,
            index,
            max_entities,
        }
    }

    // -- Entity lifecycle --

    /// Allocate a fresh entity with no components.
    ///
    /// # Errors
    ///
    /// [`StoreError::CapacityExhausted`] when the configured limit is reached,
    /// [`StoreError::Alloc`] when the id space runs out.
    pub fn create_entity(&mut self) -> Result<Entity, StoreError> {
        if self.max_entities != 0 && self.alive.len() >= self.max_entities {
            return Err(StoreError::CapacityExhausted {
                limit: self.max_entities,
            });
        }
        let entity = self.allocator.allocate()?;
        self.alive.insert(entity);
        Ok(entity)
    }

    /// Remove `entity` and every component value attached to it.
    ///
    /// # Errors
    ///
    /// [`StoreError::NoSuchEntity`] if `entity` is not alive.
    pub fn remove_entity(&mut self, entity: Entity) -> Result<(), StoreError> {
        if !self.alive.remove(&entity) {
            return Err(StoreError::NoSuchEntity(entity));
        }
        for slot in &mut self.slots {
            slot.storage.remove(entity);
        }
        Ok(())
    }

    /// Check if an entity exists.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.alive.contains(&entity)
    }

    /// Return the count of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.alive.len()
    }

    /// Live entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive.iter().copied()
    }

    // -- Component operations --

    /// Store `value` under `component` for `entity`, returning the value it
    /// replaced.
    ///
    /// # Errors
    ///
    /// Fails if the entity is not alive, the component is unknown, or `T` is
    /// not the component's declared value type.
    pub fn set_component<T: 'static>(
        &mut self,
        entity: Entity,
        component: &str,
        value: T,
    ) -> Result<Option<T>, StoreError> {
        self.ensure_alive(entity)?;
        Ok(self.typed_mut::<T>(component)?.insert(entity, value))
    }

    /// Read `component` for `entity`; `None` if it was never set or was
    /// removed.
    ///
    /// # Errors
    ///
    /// Same conditions as [`EntityStore::set_component`].
    pub fn get_component<T: 'static>(
        &self,
        entity: Entity,
        component: &str,
    ) -> Result<Option<&T>, StoreError> {
        self.ensure_alive(entity)?;
        Ok(self.typed::<T>(component)?.get(entity))
    }

    /// Mutable variant of [`EntityStore::get_component`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`EntityStore::set_component`].
    pub fn get_component_mut<T: 'static>(
        &mut self,
        entity: Entity,
        component: &str,
    ) -> Result<Option<&mut T>, StoreError> {
        self.ensure_alive(entity)?;
        Ok(self.typed_mut::<T>(component)?.get_mut(entity))
    }

    /// Detach `component` from `entity`. Returns `false` if it was absent.
    ///
    /// # Errors
    ///
    /// Fails if the entity is not alive or the component is unknown.
    pub fn remove_component(
        &mut self,
        entity: Entity,
        component: &str,
    ) -> Result<bool, StoreError> {
        self.ensure_alive(entity)?;
        Ok(self.slot_mut(component)?.storage.remove(entity))
    }

    /// Returns `true` if `entity` is alive and holds `component`.
    #[must_use]
    pub fn has_component(&self, entity: Entity, component: &str) -> bool {
        self.slot(component)
            .map(|slot| slot.storage.contains(entity))
            .unwrap_or(false)
    }

    /// Declared component fields, in composition order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldMeta> + '_ {
        self.slots.iter().map(|slot| &slot.meta)
    }

    // -- Query --

    /// Entities holding every component in `components`.
    ///
    /// An empty list matches every live entity.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownComponent`] for a name outside the composition.
    pub fn query<S: AsRef<str>>(&self, components: &[S]) -> Result<Query<'_>, StoreError> {
        self.query_with(&QueryDescriptor::from_names(components))
    }

    /// Entities matching `descriptor`.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownComponent`] for a name outside the composition.
    pub fn query_with(&self, descriptor: &QueryDescriptor) -> Result<Query<'_>, StoreError> {
        let with = descriptor
            .with
            .iter()
            .map(|name| self.slot(name).map(|slot| slot.storage.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let without = descriptor
            .without
            .iter()
            .map(|name| self.slot(name).map(|slot| slot.storage.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        // Drive iteration from the smallest required storage.
        let driver = with
            .iter()
            .enumerate()
            .min_by_key(|(_, storage)| storage.len())
            .map(|(i, _)| i);

        Ok(Query {
            alive: &self.alive,
            with,
            without,
            driver,
        })
    }

    // -- Internals --

    fn ensure_alive(&self, entity: Entity) -> Result<(), StoreError> {
        if self.alive.contains(&entity) {
            Ok(())
        } else {
            Err(StoreError::NoSuchEntity(entity))
        }
    }

    fn slot(&self, component: &str) -> Result<&Slot, StoreError> {
        self.index
            .get(&ComponentId::from_name(component))
            .map(|&i| &self.slots[i])
            .filter(|slot| slot.meta.name == component)
            .ok_or_else(|| StoreError::UnknownComponent(component.to_string()))
    }

    fn slot_mut(&mut self, component: &str) -> Result<&mut Slot, StoreError> {
        let slot = match self.index.get(&ComponentId::from_name(component)) {
            Some(&i) => &mut self.slots[i],
            None => return Err(StoreError::UnknownComponent(component.to_string())),
        };
        if slot.meta.name == component {
            Ok(slot)
        } else {
            Err(StoreError::UnknownComponent(component.to_string()))
        }
    }

    fn typed<T: 'static>(&self, component: &str) -> Result<&SparseStorage<T>, StoreError> {
        let slot = self.slot(component)?;
        slot.storage
            .as_any()
            .downcast_ref::<SparseStorage<T>>()
            .ok_or_else(|| mismatch::<T>(component, &slot.meta))
    }

    fn typed_mut<T: 'static>(
        &mut self,
        component: &str,
    ) -> Result<&mut SparseStorage<T>, StoreError> {
        let Slot { meta, storage } = self.slot_mut(component)?;
        storage
            .as_any_mut()
            .downcast_mut::<SparseStorage<T>>()
            .ok_or_else(|| mismatch::<T>(component, meta))
    }
}

fn mismatch<T>(component: &str, meta: &FieldMeta) -> StoreError {
    StoreError::TypeMismatch {
        component: component.to_string(),
        expected: meta.value_type_name,
        found: type_name::<T>(),
    }
}

impl std::fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("entities", &self.alive.len())
            .field("components", &self.slots.len())
            .field("max_entities", &self.max_entities)
            .finish()
    }
}

/// A resolved query over an [`EntityStore`].
///
/// Matching is evaluated lazily while iterating. The query borrows the store,
/// so no entity or component can be added or removed until every query and
/// iterator derived from it has been dropped; collect the results first when
/// a loop needs to mutate.
///
/// A query is restartable: each call to [`Query::iter`] starts a fresh pass.
/// Entities are yielded in ascending id order.
#[derive(Clone)]
pub struct Query<'a> {
    alive: &'a BTreeSet<Entity>,
    with: Vec<&'a dyn ComponentStorage>,
    without: Vec<&'a dyn ComponentStorage>,
    driver: Option<usize>,
}

impl<'a> Query<'a> {
    /// Start a new pass over the matching entities.
    #[must_use]
    pub fn iter(&self) -> QueryIter<'a> {
        let source: Box<dyn Iterator<Item = Entity> + 'a> = match self.driver {
            Some(i) => {
                let storage: &'a dyn ComponentStorage = self.with[i];
                storage.entities()
            }
            None => {
                let alive: &'a BTreeSet<Entity> = self.alive;
                Box::new(alive.iter().copied())
            }
        };
        QueryIter {
            source,
            with: self.with.clone(),
            without: self.without.clone(),
        }
    }

    /// Returns `true` if `entity` currently matches.
    #[must_use]
    pub fn matches(&self, entity: Entity) -> bool {
        self.alive.contains(&entity)
            && self.with.iter().all(|s| s.contains(entity))
            && !self.without.iter().any(|s| s.contains(entity))
    }
}

impl<'a> IntoIterator for Query<'a> {
    type Item = Entity;
    type IntoIter = QueryIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &Query<'a> {
    type Item = Entity;
    type IntoIter = QueryIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entities matched by a [`Query`].
pub struct QueryIter<'a> {
    source: Box<dyn Iterator<Item = Entity> + 'a>,
    with: Vec<&'a dyn ComponentStorage>,
    without: Vec<&'a dyn ComponentStorage>,
}

impl Iterator for QueryIter<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        loop {
            let entity = self.source.next()?;
            if self.with.iter().all(|s| s.contains(entity))
                && !self.without.iter().any(|s| s.contains(entity))
            {
                return Some(entity);
            }
        }
    }
}
