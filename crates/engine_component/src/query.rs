//! Query descriptors.
//!
//! A [`QueryDescriptor`] names the components an entity must hold to match,
//! plus optional exclusions. An empty descriptor matches every live entity.

use serde::{Deserialize, Serialize};

/// Describes which entities a query selects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// Components the entity must hold, all of them.
    pub with: Vec<String>,
    /// Components the entity must not hold.
    pub without: Vec<String>,
}

impl QueryDescriptor {
    /// Create a new empty query descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a descriptor requiring every name in `names`.
    #[must_use]
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        names
            .iter()
            .fold(Self::new(), |q, name| q.with(name.as_ref()))
    }

    /// Add a required component. Duplicates are ignored.
    #[must_use]
    pub fn with(mut self, name: &str) -> Self {
        if !self.with.iter().any(|n| n == name) {
            self.with.push(name.to_string());
        }
        self
    }

    /// Add an excluded component. Duplicates are ignored.
    #[must_use]
    pub fn without(mut self, name: &str) -> Self {
        if !self.without.iter().any(|n| n == name) {
            self.without.push(name.to_string());
        }
        self
    }

    /// Returns `true` if the descriptor places no constraints at all.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.with.is_empty() && self.without.is_empty()
    }

    /// Every component name this descriptor mentions.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.with
            .iter()
            .chain(self.without.iter())
            .map(String::as_str)
    }
}
