//! # engine_ecs
//!
//! The entity-component-system core: modules are declared statically,
//! composed once into a flat component table plus per-module state, and run
//! by a [`World`] that ticks an ordered set of named systems.
//!
//! ```rust
//! use engine_ecs::{Composer, ComponentSchema, Module, StateKind, World};
//!
//! struct Motion;
//!
//! impl Module for Motion {
//!     const NAME: &'static str = "motion";
//!     type State = f32;
//!     const STATE: StateKind = StateKind::Singleton;
//!
//!     fn components(schema: &mut ComponentSchema) {
//!         schema.field::<f32>("speed");
//!     }
//! }
//!
//! let composition = Composer::new().with::<Motion>().compose().unwrap();
//! let mut world = World::from_composition(composition);
//! world.set_state::<Motion>(2.0).unwrap();
//!
//! world.register("accelerate", |adapter| {
//!     let factor = *adapter.state::<Motion>()?;
//!     let movers: Vec<_> = adapter.query(&["speed"])?.into_iter().collect();
//!     for entity in movers {
//!         if let Some(speed) = adapter.get_mut::<f32>(entity, "speed")? {
//!             *speed *= factor;
//!         }
//!     }
//!     Ok(())
//! });
//!
//! let e = world.store_mut().create_entity().unwrap();
//! world.store_mut().set_component(e, "speed", 1.5f32).unwrap();
//! world.tick().unwrap();
//! assert_eq!(world.store().get_component::<f32>(e, "speed").unwrap(), Some(&3.0));
//! ```

pub mod adapter;
pub mod compose;
pub mod module;
pub mod registry;
pub mod state;
pub mod store;
pub mod world;

pub use adapter::Adapter;
pub use compose::{ComposeError, Composer, Composition, StateDecl};
pub use module::{ComponentSchema, Module, StateKind};
pub use registry::{BoxError, SystemFn, SystemRegistry, SystemResult};
pub use state::{ModuleState, StateError};
pub use store::{EntityStore, Query, QueryIter, StoreError};
pub use world::{World, WorldConfig, WorldError, WorldPhase};

pub use engine_component::{Entity, QueryDescriptor};
