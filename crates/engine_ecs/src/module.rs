//! Module declarations.
//!
//! A module is a named unit that contributes component fields and/or a piece
//! of world-wide state. Modules are plain types implementing [`Module`]; the
//! [`Composer`](crate::Composer) reads their declarations once and merges
//! them before any world exists.
//!
//! ```rust
//! use engine_ecs::{ComponentSchema, Module, StateKind};
//!
//! pub struct Physics;
//!
//! pub struct PhysicsGlobals {
//!     pub gravity: f32,
//! }
//!
//! impl Module for Physics {
//!     const NAME: &'static str = "physics";
//!     type State = PhysicsGlobals;
//!     const STATE: StateKind = StateKind::Globals;
//!
//!     fn components(schema: &mut ComponentSchema) {
//!         schema.field::<[f32; 3]>("velocity").field::<f32>("mass");
//!     }
//! }
//! ```

use engine_component::FieldMeta;

/// What kind of state, if any, a module contributes to the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// The module only declares components.
    None,
    /// A struct of named globals, read field by field.
    Globals,
    /// A single aggregate value.
    Singleton,
}

/// A statically declared module.
pub trait Module: 'static {
    /// Unique module name. Also the namespace of the module's state.
    const NAME: &'static str;

    /// The module's state type. Use `()` for modules without state.
    type State: 'static;

    /// Whether [`Module::State`] is globals, a singleton, or absent.
    const STATE: StateKind = StateKind::None;

    /// Declare this module's component fields.
    fn components(_schema: &mut ComponentSchema) {}
}

/// Collects the component fields one module declares.
#[derive(Debug, Default)]
pub struct ComponentSchema {
    fields: Vec<FieldMeta>,
}

impl ComponentSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a component called `name` storing values of type `T`.
    pub fn field<T: 'static>(&mut self, name: &'static str) -> &mut Self {
        self.fields.push(FieldMeta::of::<T>(name));
        self
    }

    /// The declared fields, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldMeta] {
        &self.fields
    }

    pub(crate) fn into_fields(self) -> Vec<FieldMeta> {
        self.fields
    }
}
