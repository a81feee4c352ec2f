//! Merged module state (globals and singletons).
//!
//! Each stateful module gets one slot, created empty when the world is built.
//! The embedding application fills the slots after construction; systems read
//! them through the [`Adapter`](crate::Adapter). Slots are keyed by the
//! module *type*, so `state::<Physics>()` resolves to `Physics::State` and
//! any field access on it is checked by the compiler.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use thiserror::Error;

use crate::compose::{Composition, StateDecl};
use crate::module::Module;

/// Errors from reading or installing module state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The module is not part of the composition, or it declares no state.
    #[error("module '{0}' is not composed into this world or declares no state")]
    UnknownModule(&'static str),
    /// The state is declared but no value has been installed yet.
    #[error("state of module '{0}' has not been initialised")]
    Uninitialized(&'static str),
}

struct StateSlot {
    decl: StateDecl,
    value: Option<Box<dyn Any>>,
}

/// Owned aggregate of every module's state for one world.
pub struct ModuleState {
    /// Slots in composition order.
    slots: Vec<StateSlot>,
    index: HashMap<TypeId, usize>,
}

impl ModuleState {
    /// Create an empty slot for every state declared in `composition`.
    #[must_use]
    pub fn new(composition: &Composition) -> Self {
        let slots: Vec<StateSlot> = composition
            .states()
            .iter()
            .map(|decl| StateSlot {
                decl: decl.clone(),
                value: None,
            })
            .collect();
        let index = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (slot.decl.module_type, i))
            .collect();
        Self { slots, index }
    }

    /// Install (or replace) the state of module `M`, returning the previous
    /// value.
    ///
    /// # Errors
    ///
    /// [`StateError::UnknownModule`] if `M` has no state slot in this world.
    pub fn set<M: Module>(&mut self, value: M::State) -> Result<Option<M::State>, StateError> {
        let slot = self.slot_mut::<M>()?;
        let previous = slot
            .value
            .replace(Box::new(value))
            .and_then(|old| old.downcast::<M::State>().ok())
            .map(|old| *old);
        Ok(previous)
    }

    /// Borrow the state of module `M`.
    ///
    /// # Errors
    ///
    /// [`StateError::UnknownModule`] if `M` has no slot,
    /// [`StateError::Uninitialized`] if the slot was never filled.
    pub fn get<M: Module>(&self) -> Result<&M::State, StateError> {
        self.slot::<M>()?
            .value
            .as_ref()
            .and_then(|value| value.downcast_ref::<M::State>())
            .ok_or(StateError::Uninitialized(M::NAME))
    }

    /// Mutably borrow the state of module `M`.
    ///
    /// # Errors
    ///
    /// Same as [`ModuleState::get`].
    pub fn get_mut<M: Module>(&mut self) -> Result<&mut M::State, StateError> {
        self.slot_mut::<M>()?
            .value
            .as_mut()
            .and_then(|value| value.downcast_mut::<M::State>())
            .ok_or(StateError::Uninitialized(M::NAME))
    }

    /// Returns `true` if module `M`'s state has been installed.
    #[must_use]
    pub fn is_ready<M: Module>(&self) -> bool {
        self.slot::<M>().is_ok_and(|slot| slot.value.is_some())
    }

    /// Names of modules whose state is still missing, in composition order.
    pub fn uninitialized(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots
            .iter()
            .filter(|slot| slot.value.is_none())
            .map(|slot| slot.decl.module)
    }

    fn slot<M: Module>(&self) -> Result<&StateSlot, StateError> {
        self.index
            .get(&TypeId::of::<M>())
            .map(|&i| &self.slots[i])
            .ok_or(StateError::UnknownModule(M::NAME))
    }

    fn slot_mut<M: Module>(&mut self) -> Result<&mut StateSlot, StateError> {
        match self.index.get(&TypeId::of::<M>()) {
            Some(&i) => Ok(&mut self.slots[i]),
            None => Err(StateError::UnknownModule(M::NAME)),
        }
    }
}

impl std::fmt::Debug for ModuleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.slots
                    .iter()
                    .map(|slot| (slot.decl.module, slot.value.is_some())),
            )
            .finish()
    }
}
