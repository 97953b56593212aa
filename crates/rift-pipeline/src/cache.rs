//! In-memory alias-keyed record store.

use parking_lot::RwLock;
use rift_keys::{AliasKey, AliasKeySet};
use std::collections::HashMap;
use std::sync::Arc;

/// Thread-safe map from alias keys to cached records.
///
/// One record is inserted under every key in its alias set, so all entries
/// for an instance point at the same `Arc`. There is no eviction; the cache
/// lives as long as its pipeline.
pub struct AliasCache<R> {
    entries: RwLock<HashMap<AliasKey, Arc<R>>>,
}

impl<R> AliasCache<R> {
    pub fn new() -> Self {
        AliasCache {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &AliasKey) -> Option<Arc<R>> {
        self.entries.read().get(key).cloned()
    }

    /// Stores `record` under every alias in `keys`, replacing older entries.
    /// Returns how many aliases were written.
    pub fn insert_all(&self, keys: &AliasKeySet, record: Arc<R>) -> usize {
        let mut entries = self.entries.write();
        for key in keys {
            entries.insert(*key, record.clone());
        }
        keys.len()
    }

    pub fn contains(&self, key: &AliasKey) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Number of alias entries (not distinct records).
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl<R> Default for AliasCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> std::fmt::Debug for AliasCache<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AliasCache")
            .field("entries", &self.len())
            .finish()
    }
}
