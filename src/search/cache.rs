//! Bounded cache of parsed queries.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

use super::query::Query;

/// Default number of distinct queries kept.
pub const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::new(128).unwrap();

/// LRU cache handing out shared [`Query`] instances.
///
/// Keyed by the lower-cased raw string, which is exactly what query equality
/// compares, so every caller asking for an equal query gets the same `Arc`.
pub struct QueryCache {
    entries: Mutex<LruCache<String, Arc<Query>>>,
}

impl QueryCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Returns the cached query for `raw`, parsing and inserting it on a miss.
    pub fn get_or_parse(&self, raw: &str) -> Arc<Query> {
        let key = raw.to_lowercase();
        // Entries are immutable, so a poisoned lock still guards valid data.
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(query) = entries.get(&key) {
            tracing::trace!(query = %key, "query cache hit");
            return Arc::clone(query);
        }

        let query = Arc::new(Query::new(&key));
        entries.put(key, Arc::clone(&query));
        query
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("len", &self.len())
            .finish()
    }
}
