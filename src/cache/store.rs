use std::collections::BTreeMap;

use tracing::debug;

use super::CacheError;
use crate::client::ApiError;

/// Keyed records with create/read/update/delete semantics.
///
/// `create_with` and `update_with` check the key precondition before
/// invoking `fetch`; a failing `fetch` leaves the store untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCache<V> {
    entries: BTreeMap<String, V>,
}

impl<V> RecordCache<V> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn create_with<F>(&mut self, key: String, fetch: F) -> Result<&V, CacheError>
    where
        F: FnOnce(&str) -> Result<V, ApiError>,
    {
        if self.entries.contains_key(&key) {
            return Err(CacheError::already_exists(key));
        }
        let value = fetch(&key)?;
        debug!(key = %key, "cache entry created");
        Ok(&*self.entries.entry(key).or_insert(value))
    }

    pub fn update_with<F>(&mut self, key: &str, fetch: F) -> Result<&V, CacheError>
    where
        F: FnOnce(&str) -> Result<V, ApiError>,
    {
        let Some(slot) = self.entries.get_mut(key) else {
            return Err(CacheError::not_found(key));
        };
        *slot = fetch(key)?;
        debug!(key, "cache entry updated");
        Ok(&*slot)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> &BTreeMap<String, V> {
        &self.entries
    }

    pub fn remove(&mut self, key: &str) -> Result<V, CacheError> {
        let value = self
            .entries
            .remove(key)
            .ok_or_else(|| CacheError::not_found(key))?;
        debug!(key, "cache entry deleted");
        Ok(value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for RecordCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
