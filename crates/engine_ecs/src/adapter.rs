//! The capability handle passed to a running system.
//!
//! An [`Adapter`] is created fresh for every system call and borrows the
//! world's entity store and module state for exactly that call. It holds no
//! state of its own, so nothing a system does through it can outlive the
//! tick that created it.

use engine_component::{Entity, QueryDescriptor};

use crate::module::Module;
use crate::state::{ModuleState, StateError};
use crate::store::{EntityStore, Query, StoreError};

/// Scoped access to one world during one system invocation.
pub struct Adapter<'w> {
    store: &'w mut EntityStore,
    state: &'w ModuleState,
    tick: u64,
}

impl<'w> Adapter<'w> {
    pub(crate) fn new(store: &'w mut EntityStore, state: &'w ModuleState, tick: u64) -> Self {
        Self { store, state, tick }
    }

    /// The number of the tick currently running (the first tick is 1).
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Entities holding every component in `components`.
    ///
    /// The returned query borrows this adapter; collect it before mutating.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownComponent`] for an undeclared name.
    pub fn query<S: AsRef<str>>(&self, components: &[S]) -> Result<Query<'_>, StoreError> {
        self.store.query(components)
    }

    /// Entities matching `descriptor`.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownComponent`] for an undeclared name.
    pub fn query_with(&self, descriptor: &QueryDescriptor) -> Result<Query<'_>, StoreError> {
        self.store.query_with(descriptor)
    }

    /// Read the state of module `M`.
    ///
    /// # Errors
    ///
    /// See [`ModuleState::get`].
    pub fn state<M: Module>(&self) -> Result<&'w M::State, StateError> {
        self.state.get::<M>()
    }

    pub fn create_entity(&mut self) -> Result<Entity, StoreError> {
        self.store.create_entity()
    }

    pub fn remove_entity(&mut self, entity: Entity) -> Result<(), StoreError> {
        self.store.remove_entity(entity)
    }

    /// Forwards to [`EntityStore::set_component`].
    pub fn set<T: 'static>(
        &mut self,
        entity: Entity,
        component: &str,
        value: T,
    ) -> Result<Option<T>, StoreError> {
        self.store.set_component(entity, component, value)
    }

    /// Forwards to [`EntityStore::get_component`].
    pub fn get<T: 'static>(
        &self,
        entity: Entity,
        component: &str,
    ) -> Result<Option<&T>, StoreError> {
        self.store.get_component(entity, component)
    }

    /// Forwards to [`EntityStore::get_component_mut`].
    pub fn get_mut<T: 'static>(
        &mut self,
        entity: Entity,
        component: &str,
    ) -> Result<Option<&mut T>, StoreError> {
        self.store.get_component_mut(entity, component)
    }

    /// Forwards to [`EntityStore::remove_component`].
    pub fn remove(&mut self, entity: Entity, component: &str) -> Result<bool, StoreError> {
        self.store.remove_component(entity, component)
    }

    #[must_use]
    pub fn has(&self, entity: Entity, component: &str) -> bool {
        self.store.has_component(entity, component)
    }

    /// Direct read access to the entity store.
    #[must_use]
    pub fn store(&self) -> &EntityStore {
        self.store
    }

    /// Direct write access to the entity store.
    pub fn store_mut(&mut self) -> &mut EntityStore {
        self.store
    }
}

impl std::fmt::Debug for Adapter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapter")
            .field("tick", &self.tick)
            .field("entities", &self.store.entity_count())
            .finish()
    }
}
