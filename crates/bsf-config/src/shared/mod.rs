//! Shared handle for reloadable configuration
//!
//! Readers take an `Arc` snapshot and keep using it for as long as they
//! like. A reload builds a complete new store first and then swaps the
//! pointer, so a reader sees either the old or the new store in full.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::store::ConfigStore;

#[derive(Debug)]
struct Current {
    store: Arc<ConfigStore>,
    generation: u64,
}

/// Cloneable handle to the current configuration store
#[derive(Debug, Clone)]
pub struct SharedConfig {
    current: Arc<RwLock<Current>>,
}

impl SharedConfig {
    pub fn new(store: ConfigStore) -> Self {
        Self {
            current: Arc::new(RwLock::new(Current {
                store: Arc::new(store),
                generation: 0,
            })),
        }
    }

    /// The store as of now
    pub fn snapshot(&self) -> Arc<ConfigStore> {
        Arc::clone(&self.current.read().store)
    }

    /// Number of replacements since creation
    pub fn generation(&self) -> u64 {
        self.current.read().generation
    }

    /// Install a new store, returning the one it replaces
    pub fn replace(&self, store: ConfigStore) -> Arc<ConfigStore> {
        let store = Arc::new(store);
        let mut current = self.current.write();
        current.generation += 1;
        tracing::debug!(
            generation = current.generation,
            sections = store.len(),
            "configuration store replaced"
        );
        std::mem::replace(&mut current.store, store)
    }
}

impl From<ConfigStore> for SharedConfig {
    fn from(store: ConfigStore) -> Self {
        Self::new(store)
    }
}
