//! Named lookup tables with an optional fallback chain.
//!
//! Used for two independent kinds of entries: build stages (one registry per
//! role) and libraries. Registries are filled during startup and only read
//! afterwards, so they carry no interior locking.

use crate::error::{ConfigError, ConfigResult};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Anything that can be registered by name.
pub trait Named {
    fn name(&self) -> &str;
}

/// Name → entry map, consulting `fallback` when a name is absent locally.
pub struct Registry<T: ?Sized + Named> {
    kind: &'static str,
    entries: FxHashMap<String, Arc<T>>,
    /// Registration order, for stable iteration.
    order: Vec<String>,
    fallback: Option<Arc<Registry<T>>>,
}

impl<T: ?Sized + Named> Registry<T> {
    /// Create an empty registry. `kind` names the entries in error messages.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: FxHashMap::default(),
            order: Vec::new(),
            fallback: None,
        }
    }

    /// Create an empty registry that falls back to `parent` on lookup misses.
    pub fn with_fallback(kind: &'static str, parent: Arc<Registry<T>>) -> Self {
        Self {
            fallback: Some(parent),
            ..Self::new(kind)
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Register an entry. A name already present locally is rejected;
    /// use [`pop`](Self::pop) first to replace it.
    ///
    /// Shadowing a name that only exists in the fallback is allowed.
    pub fn add(&mut self, entry: Arc<T>) -> ConfigResult<()> {
        let name = entry.name().to_owned();
        if self.entries.contains_key(&name) {
            return Err(ConfigError::Duplicate {
                registry: self.kind,
                name,
            });
        }
        self.order.push(name.clone());
        self.entries.insert(name, entry);
        Ok(())
    }

    /// Remove a locally registered entry.
    pub fn pop(&mut self, name: &str) -> Option<Arc<T>> {
        let entry = self.entries.remove(name)?;
        self.order.retain(|n| n != name);
        Some(entry)
    }

    /// Look up an entry, walking the fallback chain.
    pub fn lookup(&self, name: &str) -> Option<Arc<T>> {
        match self.entries.get(name) {
            Some(entry) => Some(Arc::clone(entry)),
            None => self.fallback.as_ref()?.lookup(name),
        }
    }

    /// Look up an entry; an unregistered name is a configuration error.
    pub fn get(&self, name: &str) -> ConfigResult<Arc<T>> {
        self.lookup(name).ok_or_else(|| ConfigError::UnknownName {
            registry: self.kind,
            name: name.to_owned(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Local entries in registration order (fallback entries excluded).
    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> {
        self.order.iter().filter_map(|name| self.entries.get(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: ?Sized + Named> std::fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("entries", &self.order)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
