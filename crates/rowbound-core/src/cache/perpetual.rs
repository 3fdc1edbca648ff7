//! Unbounded map-backed cache.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::{Cache, CacheId};

/// Base cache: a plain hash map.
///
/// No eviction, no expiry, no synchronization. Wrap it in
/// [`SynchronizedCache`](super::SynchronizedCache) to share it.
///
/// Equality and hashing look at the id only, so two instances with the same
/// id are interchangeable as map keys regardless of their contents.
pub struct PerpetualCache<K, V> {
    id: CacheId,
    entries: HashMap<K, V>,
}

impl<K, V> PerpetualCache<K, V> {
    #[must_use]
    pub fn new(id: CacheId) -> Self {
        Self {
            id,
            entries: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(id: CacheId, capacity: usize) -> Self {
        Self {
            id,
            entries: HashMap::with_capacity(capacity),
        }
    }
}

impl<K, V> Cache for PerpetualCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    type Key = K;
    type Value = V;

    fn id(&self) -> &CacheId {
        &self.id
    }

    fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn size(&self) -> usize {
        self.entries.len()
    }
}

impl<K, V> PartialEq for PerpetualCache<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<K, V> Eq for PerpetualCache<K, V> {}

impl<K, V> Hash for PerpetualCache<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<K, V> fmt::Debug for PerpetualCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerpetualCache")
            .field("id", &self.id)
            .field("entries", &self.entries.len())
            .finish()
    }
}
