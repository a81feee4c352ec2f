//! System registry: named systems in insertion order.
//!
//! Registering a name that already exists replaces the system in place: the
//! last registration wins and the slot keeps its position in the run order.

use crate::adapter::Adapter;

/// Error type systems may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// What a system returns from one invocation.
pub type SystemResult = Result<(), BoxError>;

/// A boxed system function.
pub type SystemFn = Box<dyn FnMut(&mut Adapter<'_>) -> SystemResult>;

struct Entry {
    name: String,
    system: SystemFn,
}

/// Ordered registry of systems keyed by name.
#[derive(Default)]
pub struct SystemRegistry {
    entries: Vec<Entry>,
}

impl SystemRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `system` under `name`, replacing any system already bound to it.
    ///
    /// Returns `true` if an existing system was replaced.
    pub fn register(&mut self, name: impl Into<String>, system: SystemFn) -> bool {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
            entry.system = system;
            return true;
        }
        self.entries.push(Entry { name, system });
        false
    }

    /// Remove the system bound to `name`.
    ///
    /// Returns `true` if a system was removed; unknown names are a no-op.
    pub fn unregister(&mut self, name: &str) -> bool {
        match self.entries.iter().position(|e| e.name == name) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Registered names in run order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Returns the number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Systems in run order, for the tick loop.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut SystemFn)> {
        self.entries
            .iter_mut()
            .map(|e| (e.name.as_str(), &mut e.system))
    }
}

impl std::fmt::Debug for SystemRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
