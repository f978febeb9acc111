//! Bounded id -> year cache.
//!
//! The archive resolves a document's year once (at store time or on the
//! first successful backward search) and remembers it here. Capacity is
//! fixed with least-recently-used eviction, so a long-lived process does
//! not grow one entry per document ever seen. Eviction only costs a
//! re-walk on the next lookup; correctness never depends on an entry
//! being present.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// Default capacity, entries.
pub const DEFAULT_CAPACITY: usize = 65536;

pub struct YearCache {
    inner: Mutex<LruCache<String, String>>,
}

impl YearCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or_else(|| NonZeroUsize::new(DEFAULT_CAPACITY).unwrap());
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Cached year for a document id, refreshing its recency.
    pub fn get(&self, doc_id: &str) -> Option<String> {
        self.inner.lock().unwrap().get(doc_id).cloned()
    }

    pub fn insert(&self, doc_id: &str, year: &str) {
        self.inner
            .lock()
            .unwrap()
            .put(doc_id.to_string(), year.to_string());
    }

    pub fn remove(&self, doc_id: &str) {
        self.inner.lock().unwrap().pop(doc_id);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
