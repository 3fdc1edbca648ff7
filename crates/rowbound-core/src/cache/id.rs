//! Cache identity.

use std::fmt;
use std::sync::Arc;

use crate::{Error, Result};

/// Non-empty identity of a cache instance.
///
/// Caches compare and hash by this id only. In a mapping layer it is
/// normally the namespace of the statements sharing the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheId(Arc<str>);

impl CacheId {
    /// # Errors
    ///
    /// Returns a usage error if `id` is empty or only whitespace.
    pub fn new(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref();
        if id.trim().is_empty() {
            return Err(Error::missing_cache_id());
        }
        Ok(Self(Arc::from(id)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for CacheId {
    type Error = Error;

    fn try_from(id: &str) -> Result<Self> {
        Self::new(id)
    }
}

impl TryFrom<String> for CacheId {
    type Error = Error;

    fn try_from(id: String) -> Result<Self> {
        Self::new(id)
    }
}

impl AsRef<str> for CacheId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
