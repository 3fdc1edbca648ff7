//! Row window applied to a result stream.

use std::fmt;

/// `(offset, limit)` pair selecting which physical rows become items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RowBounds {
    offset: usize,
    limit: Option<usize>,
}

impl RowBounds {
    /// No offset, no limit.
    pub const DEFAULT: Self = Self {
        offset: 0,
        limit: None,
    };

    #[must_use]
    pub const fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }

    /// Skip `offset` rows and deliver everything after.
    #[must_use]
    pub const fn unbounded(offset: usize) -> Self {
        Self {
            offset,
            limit: None,
        }
    }

    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// `None` means unbounded.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Same offset, limit lowered to at most `max`.
    #[must_use]
    pub fn clamp_limit(self, max: usize) -> Self {
        Self {
            offset: self.offset,
            limit: Some(self.limit.map_or(max, |limit| limit.min(max))),
        }
    }

    /// Returns true if `delivered` items exhaust the window.
    #[must_use]
    pub fn is_filled_by(&self, delivered: usize) -> bool {
        self.limit.is_some_and(|limit| delivered >= limit)
    }
}

impl fmt::Display for RowBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.limit {
            Some(limit) => write!(f, "offset={} limit={limit}", self.offset),
            None => write!(f, "offset={} limit=unbounded", self.offset),
        }
    }
}
