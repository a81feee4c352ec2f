//! Module Composer: merges module declarations into one component table and
//! one state layout.
//!
//! Composition happens once, before a [`World`](crate::World) is built. Every
//! configuration problem (a component name declared twice, a module added
//! twice) is reported here, so a world can only ever be constructed from a
//! consistent [`Composition`].

use std::any::{TypeId, type_name};
use std::collections::HashMap;

use engine_component::{ComponentId, FieldMeta};
use thiserror::Error;
use tracing::debug;

use crate::module::{ComponentSchema, Module, StateKind};

/// Configuration errors found while composing modules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// A component name is declared more than once.
    #[error("component '{name}' declared by both '{first}' and '{second}'")]
    DuplicateComponent {
        name: &'static str,
        first: &'static str,
        second: &'static str,
    },
    /// Two different component names hash to the same [`ComponentId`].
    #[error("component names '{first}' and '{second}' hash to the same id")]
    ComponentIdCollision {
        first: &'static str,
        second: &'static str,
    },
    /// The same module type was added twice.
    #[error("module '{0}' composed more than once")]
    DuplicateModule(&'static str),
    /// A module declares a component with an empty name.
    #[error("module '{0}' declares a component with an empty name")]
    EmptyComponentName(&'static str),
}

/// The declared state of one module.
#[derive(Debug, Clone)]
pub struct StateDecl {
    /// Name of the declaring module.
    pub module: &'static str,
    /// Globals or singleton.
    pub kind: StateKind,
    /// `TypeId` of the module type itself; the key states are stored under.
    pub module_type: TypeId,
    /// `TypeId` of the state value.
    pub state_type: TypeId,
    pub state_type_name: &'static str,
}

/// One module as seen by the composer.
#[derive(Debug)]
struct ModuleEntry {
    name: &'static str,
    module_type: TypeId,
    fields: Vec<FieldMeta>,
    state: Option<StateDecl>,
}

/// Collects modules in order and merges them with [`Composer::compose`].
#[derive(Debug, Default)]
pub struct Composer {
    modules: Vec<ModuleEntry>,
}

impl Composer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add module `M` to the composition.
    #[must_use]
    pub fn with<M: Module>(mut self) -> Self {
        let mut schema = ComponentSchema::new();
        M::components(&mut schema);

        let state = match M::STATE {
            StateKind::None => None,
            kind => Some(StateDecl {
                module: M::NAME,
                kind,
                module_type: TypeId::of::<M>(),
                state_type: TypeId::of::<M::State>(),
                state_type_name: type_name::<M::State>(),
            }),
        };

        self.modules.push(ModuleEntry {
            name: M::NAME,
            module_type: TypeId::of::<M>(),
            fields: schema.into_fields(),
            state,
        });
        self
    }

    /// Merge every added module.
    ///
    /// # Errors
    ///
    /// Fails on the first configuration conflict found, in module order.
    /// Nothing is ever silently overwritten.
    pub fn compose(self) -> Result<Composition, ComposeError> {
        let mut modules: Vec<&'static str> = Vec::with_capacity(self.modules.len());
        let mut seen_types: Vec<TypeId> = Vec::with_capacity(self.modules.len());
        let mut fields: Vec<FieldMeta> = Vec::new();
        // Declaring module per field, parallel to `fields`.
        let mut owners: Vec<&'static str> = Vec::new();
        let mut index: HashMap<ComponentId, usize> = HashMap::new();
        let mut states: Vec<StateDecl> = Vec::new();

        for module in self.modules {
            if modules.contains(&module.name) || seen_types.contains(&module.module_type) {
                return Err(ComposeError::DuplicateModule(module.name));
            }
            modules.push(module.name);
            seen_types.push(module.module_type);

            for field in module.fields {
                if field.name.is_empty() {
                    return Err(ComposeError::EmptyComponentName(module.name));
                }
                if let Some(&existing) = index.get(&field.id) {
                    let prior = &fields[existing];
                    if prior.name == field.name {
                        return Err(ComposeError::DuplicateComponent {
                            name: field.name,
                            first: owners[existing],
                            second: module.name,
                        });
                    }
                    return Err(ComposeError::ComponentIdCollision {
                        first: prior.name,
                        second: field.name,
                    });
                }
                index.insert(field.id, fields.len());
                fields.push(field);
                owners.push(module.name);
            }

            if let Some(state) = module.state {
                states.push(state);
            }
        }

        debug!(
            modules = modules.len(),
            components = fields.len(),
            states = states.len(),
            "composed modules"
        );

        Ok(Composition {
            modules,
            fields,
            owners,
            index,
            states,
        })
    }
}

/// The merged result of composing modules: one flat component table and the
/// per-module state layout.
#[derive(Debug, Clone)]
pub struct Composition {
    modules: Vec<&'static str>,
    fields: Vec<FieldMeta>,
    owners: Vec<&'static str>,
    index: HashMap<ComponentId, usize>,
    states: Vec<StateDecl>,
}

impl Composition {
    /// Module names in composition order.
    #[must_use]
    pub fn modules(&self) -> &[&'static str] {
        &self.modules
    }

    /// Every component field, in module then declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldMeta] {
        &self.fields
    }

    /// Look up a component field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.index
            .get(&ComponentId::from_name(name))
            .map(|&i| &self.fields[i])
            .filter(|f| f.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// The module that declared component `name`.
    #[must_use]
    pub fn owner_of(&self, name: &str) -> Option<&'static str> {
        self.index
            .get(&ComponentId::from_name(name))
            .filter(|&&i| self.fields[i].name == name)
            .map(|&i| self.owners[i])
    }

    /// Declared module states, in composition order.
    #[must_use]
    pub fn states(&self) -> &[StateDecl] {
        &self.states
    }

    /// The state declaration of module `module`, if it declares one.
    #[must_use]
    pub fn state_decl(&self, module: &str) -> Option<&StateDecl> {
        self.states.iter().find(|s| s.module == module)
    }
}
