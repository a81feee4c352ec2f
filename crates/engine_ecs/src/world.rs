//! The World: entity store, merged module state and the system registry.
//!
//! A world is built from a [`Composition`]. Module state starts empty and is
//! installed by the embedding application before the first tick that needs
//! it. Each [`World::tick`] runs every registered system once, in
//! registration order, on the calling thread. Systems see each other's
//! writes immediately; there is no per-system snapshot.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::adapter::Adapter;
use crate::compose::Composition;
use crate::module::Module;
use crate::registry::{BoxError, SystemRegistry, SystemResult};
use crate::state::{ModuleState, StateError};
use crate::store::EntityStore;

/// Tunables for a world.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Maximum number of live entities (0 = unbounded).
    pub max_entities: usize,
}

/// The two phases a world moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldPhase {
    /// No tick has run yet; module state may still be missing.
    Unticked,
    /// At least one tick has started.
    Ticking,
}

#[derive(Debug, Error)]
pub enum WorldError {
    /// A system returned an error. Systems after it did not run this tick.
    #[error("system '{name}' failed during tick {tick}: {source}")]
    System {
        name: String,
        tick: u64,
        source: BoxError,
    },
}

/// The runtime aggregate owning entity storage, module state and systems.
pub struct World {
    composition: Composition,
    store: EntityStore,
    state: ModuleState,
    systems: SystemRegistry,
    tick_count: u64,
}

impl World {
    /// Build an empty world over `composition`.
    #[must_use]
    pub fn new(composition: Composition, config: WorldConfig) -> Self {
        let store = EntityStore::with_limit(&composition, config.max_entities);
        let state = ModuleState::new(&composition);

        debug!(
            modules = composition.modules().len(),
            components = composition.fields().len(),
            max_entities = config.max_entities,
            "world created"
        );

        Self {
            composition,
            store,
            state,
            systems: SystemRegistry::new(),
            tick_count: 0,
        }
    }

    /// Build a world with the default [`WorldConfig`].
    #[must_use]
    pub fn from_composition(composition: Composition) -> Self {
        Self::new(composition, WorldConfig::default())
    }

    #[must_use]
    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    // -- Systems --

    /// Register `system` under `name`.
    ///
    /// A name that is already registered is overwritten: the new system takes
    /// the old one's place in the run order and the old one never runs again.
    pub fn register<F>(&mut self, name: impl Into<String>, system: F)
    where
        F: FnMut(&mut Adapter<'_>) -> SystemResult + 'static,
    {
        let name = name.into();
        let replaced = self.systems.register(name.clone(), Box::new(system));
        debug!(system = %name, replaced, "registered system");
    }

    /// Remove the system registered under `name`. Unknown names are ignored.
    pub fn unregister(&mut self, name: &str) {
        if self.systems.unregister(name) {
            debug!(system = name, "unregistered system");
        }
    }

    #[must_use]
    pub fn systems(&self) -> &SystemRegistry {
        &self.systems
    }

    /// Run every registered system once, in order.
    ///
    /// # Errors
    ///
    /// Returns the first system failure; the remaining systems are skipped
    /// for this tick. The tick still counts as started.
    pub fn tick(&mut self) -> Result<(), WorldError> {
        self.tick_count += 1;
        let tick = self.tick_count;

        debug!(
            tick,
            systems = self.systems.len(),
            entities = self.store.entity_count(),
            "tick start"
        );

        for (name, system) in self.systems.iter_mut() {
            trace!(tick, system = name, "running system");
            let mut adapter = Adapter::new(&mut self.store, &self.state, tick);
            system(&mut adapter).map_err(|source| WorldError::System {
                name: name.to_string(),
                tick,
                source,
            })?;
        }
        Ok(())
    }

    /// Number of ticks started so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn phase(&self) -> WorldPhase {
        if self.tick_count == 0 {
            WorldPhase::Unticked
        } else {
            WorldPhase::Ticking
        }
    }

    // -- Entity store --

    #[must_use]
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    // -- Module state --

    /// Install the state of module `M`, returning whatever it replaced.
    ///
    /// # Errors
    ///
    /// [`StateError::UnknownModule`] if `M` has no state in this world.
    pub fn set_state<M: Module>(
        &mut self,
        value: M::State,
    ) -> Result<Option<M::State>, StateError> {
        self.state.set::<M>(value)
    }

    /// Read the state of module `M`.
    ///
    /// # Errors
    ///
    /// See [`ModuleState::get`].
    pub fn state<M: Module>(&self) -> Result<&M::State, StateError> {
        self.state.get::<M>()
    }

    /// Mutably borrow the state of module `M`. Only possible between ticks.
    ///
    /// # Errors
    ///
    /// See [`ModuleState::get`].
    pub fn state_mut<M: Module>(&mut self) -> Result<&mut M::State, StateError> {
        self.state.get_mut::<M>()
    }

    #[must_use]
    pub fn is_state_ready<M: Module>(&self) -> bool {
        self.state.is_ready::<M>()
    }

    /// The merged module state.
    #[must_use]
    pub fn module_state(&self) -> &ModuleState {
        &self.state
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("store", &self.store)
            .field("state", &self.state)
            .field("systems", &self.systems)
            .field("tick_count", &self.tick_count)
            .finish()
    }
}
