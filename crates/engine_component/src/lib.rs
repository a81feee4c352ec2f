//! # engine_component
//!
//! The "C" in ECS: defines how entities are identified, how component
//! fields are described, and how their values are stored.
//!
//! This crate provides:
//!
//! - [`Entity`]: lightweight `u64` entity identifiers.
//! - [`EntityAllocator`]: monotonically increasing, never-reused ID allocator.
//! - [`ComponentId`] / [`FieldMeta`]: name-keyed component field descriptions.
//! - [`ComponentStorage`] / [`SparseStorage`]: sparse, type-erased value storage.
//! - [`QueryDescriptor`]: declarative entity selection by component name.

pub mod component;
pub mod entity;
pub mod query;
pub mod storage;

pub use component::{ComponentId, FieldMeta};
pub use entity::{AllocError, Entity, EntityAllocator};
pub use query::QueryDescriptor;
pub use storage::{ComponentStorage, SparseStorage};
