//! Component identity and field metadata.
//!
//! Components are identified by **name**, not by Rust type: two modules may
//! store the same value type (say `Vec3`) under different names such as
//! `location` and `velocity`. Each declared name becomes a [`FieldMeta`]
//! which knows how to build an empty storage for its value type.
//!
//! ## Name hashing
//!
//! [`ComponentId`] is derived from the component's string name using the
//! FNV-1a 64-bit hash. The id is stable across runs and platforms, so it can
//! be used as a map key without carrying the string around.

use std::any::{TypeId, type_name};

use serde::{Deserialize, Serialize};

use crate::storage::{ComponentStorage, SparseStorage};

/// A unique identifier for a component name, derived with FNV-1a 64-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ComponentId(pub u64);

impl ComponentId {
    /// FNV-1a 64-bit offset basis.
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

    /// FNV-1a 64-bit prime.
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Compute the [`ComponentId`] for a component name.
    ///
    /// # Algorithm (FNV-1a 64-bit)
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325          (offset basis)
    /// for each byte in name.as_bytes():
    ///     hash = hash XOR byte
    ///     hash = hash * 0x00000100000001b3  (prime)
    /// return hash
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }
}

/// Metadata about one declared component field.
///
/// A field pairs a name with a value type. The `new_storage` constructor is
/// how type-erased code builds a correctly typed storage for the field
/// without knowing `T`.
#[derive(Clone)]
pub struct FieldMeta {
    /// The component name (e.g. `"location"`).
    pub name: &'static str,
    /// Id derived from `name`.
    pub id: ComponentId,
    /// Rust type of the stored values.
    pub value_type: TypeId,
    /// Human-readable name of the value type, used in error messages.
    pub value_type_name: &'static str,
    /// Builds an empty storage for this field's value type.
    pub new_storage: fn() -> Box<dyn ComponentStorage>,
}

impl FieldMeta {
    /// Describe a field called `name` holding values of type `T`.
    #[must_use]
    pub fn of<T: 'static>(name: &'static str) -> Self {
        Self {
            name,
            id: ComponentId::from_name(name),
            value_type: TypeId::of::<T>(),
            value_type_name: type_name::<T>(),
            new_storage: || Box::new(SparseStorage::<T>::new()),
        }
    }

    /// Returns `true` if values of type `T` may be stored in this field.
    #[must_use]
    pub fn accepts<T: 'static>(&self) -> bool {
        self.value_type == TypeId::of::<T>()
    }
}

impl std::fmt::Debug for FieldMeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldMeta")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("value_type", &self.value_type_name)
            .finish()
    }
}
