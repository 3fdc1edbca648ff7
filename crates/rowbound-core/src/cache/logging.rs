//! Hit-ratio logging decorator

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{Cache, CacheId};

/// Wrapper that counts lookups and logs the hit ratio of any [`Cache`].
///
/// Uses debug-level events so keys never reach production logs.
pub struct LoggingCache<C> {
    inner: C,
    requests: AtomicU64,
    hits: AtomicU64,
}

impl<C> LoggingCache<C> {
    pub const fn new(cache: C) -> Self {
        Self {
            inner: cache,
            requests: AtomicU64::new(0),
            hits: AtomicU64::new(0),
        }
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// `hits / requests`, or `0.0` before the first lookup.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_ratio(&self) -> f64 {
        let requests = self.requests();
        if requests == 0 {
            return 0.0;
        }
        self.hits() as f64 / requests as f64
    }

    pub const fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Cache> Cache for LoggingCache<C> {
    type Key = C::Key;
    type Value = C::Value;

    fn id(&self) -> &CacheId {
        self.inner.id()
    }

    fn get(&self, key: &C::Key) -> Option<C::Value> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let value = self.inner.get(key);
        let result = if value.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            "hit"
        } else {
            "miss"
        };

        tracing::debug!(
            cache.id = %self.inner.id(),
            cache.result = result,
            cache.hit_ratio = self.hit_ratio(),
            "cache lookup",
        );

        value
    }

    fn put(&mut self, key: C::Key, value: C::Value) {
        self.inner.put(key, value);
    }

    fn remove(&mut self, key: &C::Key) -> Option<C::Value> {
        self.inner.remove(key)
    }

    fn clear(&mut self) {
        self.inner.clear();
        tracing::debug!(cache.id = %self.inner.id(), cache.operation = "clear");
    }

    fn size(&self) -> usize {
        self.inner.size()
    }
}

impl<C: fmt::Debug> fmt::Debug for LoggingCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingCache")
            .field("inner", &self.inner)
            .field("requests", &self.requests())
            .field("hits", &self.hits())
            .finish()
    }
}
