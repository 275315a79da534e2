use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::Result;

/// Get-or-populate cache of remote records keyed by id.
///
/// Lives for a single collection run and is shared by the threads enriching
/// one page. The remote fetch runs without holding a map lock, so two threads
/// missing on the same key may both fetch; the later insert wins, which is
/// harmless because both fetched the same record.
pub struct LookupCache<V> {
    entries: DashMap<String, Arc<V>>,
    fetches: AtomicUsize,
}

impl<V> LookupCache<V> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Return the cached record for `id`, fetching and storing it on a miss.
    pub fn get_or_fetch<F>(&self, id: &str, fetch: F) -> Result<Arc<V>>
    where
        F: FnOnce(&str) -> Result<V>,
    {
        let cached = self.entries.get(id).map(|entry| Arc::clone(entry.value()));
        if let Some(value) = cached {
            return Ok(value);
        }

        let value = Arc::new(fetch(id)?);
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(id.to_string(), Arc::clone(&value));
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of successful remote fetches made through this cache
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl<V> Default for LookupCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
