//! Composite cache key

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::cursor::RowBounds;

/// Composite key built by appending parts in order.
///
/// Parts are stored and compared by their `Display` text, so `with(1)` and
/// `with("1")` append the same part. Two keys are equal when they hold the
/// same parts in the same order. A running hash and checksum are kept
/// alongside for the printable form.
///
/// Callers that need typed parts to stay apart must render them distinctly,
/// e.g. `with(format_args!("i64:{n}"))`.
#[derive(Debug, Clone)]
pub struct CacheKey {
    hash: u64,
    checksum: u64,
    parts: Vec<String>,
}

impl CacheKey {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            hash: 17,
            checksum: 0,
            parts: Vec::new(),
        }
    }

    /// Key for a statement execution: statement id, window and SQL text.
    #[must_use]
    pub fn for_statement(statement_id: &str, bounds: RowBounds, sql: &str) -> Self {
        let mut key = Self::new();
        key.update(statement_id);
        key.update(bounds.offset());
        match bounds.limit() {
            Some(limit) => key.update(limit),
            None => key.update("unbounded"),
        }
        key.update(sql);
        key
    }

    /// Append a part by its `Display` text.
    pub fn update(&mut self, part: impl fmt::Display) {
        let part = part.to_string();

        let mut hasher = DefaultHasher::new();
        part.hash(&mut hasher);
        let base = hasher.finish();

        self.parts.push(part);
        self.checksum = self.checksum.wrapping_add(base);
        self.hash = self
            .hash
            .wrapping_mul(37)
            .wrapping_add(base.wrapping_mul(self.parts.len() as u64));
    }

    /// Builder form of [`CacheKey::update`].
    #[must_use]
    pub fn with(mut self, part: impl fmt::Display) -> Self {
        self.update(part);
        self
    }

    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Convert to string key for storage
    #[must_use]
    pub fn to_key_string(&self) -> String {
        let mut key = format!("{:016x}:{:016x}", self.hash, self.checksum);
        for part in &self.parts {
            key.push(':');
            key.push_str(part);
        }
        key
    }
}

impl Default for CacheKey {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.checksum == other.checksum && self.parts == other.parts
    }
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_key_string())
    }
}

impl<P: fmt::Display> FromIterator<P> for CacheKey {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut key = Self::new();
        for part in iter {
            key.update(part);
        }
        key
    }
}
