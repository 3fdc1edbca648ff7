//! Identity-keyed caches.
//!
//! # Architecture
//!
//! ```text
//! CacheFacade ──▶ Plugin layers ──▶ SynchronizedCache<C> ──▶ C
//!  typed calls    InterceptorChain   Target over a Mutex     LoggingCache<_>
//!                                                            PerpetualCache<K, V>
//! ```
//!
//! A cache is identified by its [`CacheId`]; the base [`PerpetualCache`]
//! compares and hashes by that id alone.

mod facade;
mod id;
mod key;
mod logging;
pub mod ops;
mod perpetual;
mod synchronized;

pub use facade::CacheFacade;
pub use id::CacheId;
pub use key::CacheKey;
pub use logging::LoggingCache;
pub use perpetual::PerpetualCache;
pub use synchronized::SynchronizedCache;

/// Map-like cache with a stable identity.
///
/// Keys and values are opaque to the cache. Implementations are not
/// required to be thread-safe; see [`SynchronizedCache`].
pub trait Cache {
    /// Key type.
    type Key;

    /// Cached value type.
    type Value;

    /// Identity of this cache.
    fn id(&self) -> &CacheId;

    /// Look up a value.
    fn get(&self, key: &Self::Key) -> Option<Self::Value>;

    /// Store a value, replacing any previous value for `key`.
    fn put(&mut self, key: Self::Key, value: Self::Value);

    /// Remove and return a value.
    fn remove(&mut self, key: &Self::Key) -> Option<Self::Value>;

    /// Remove every entry.
    fn clear(&mut self);

    /// Number of entries.
    fn size(&self) -> usize;
}
