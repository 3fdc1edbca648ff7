//! Lazy result cursors.
//!
//! A cursor wraps an open [`RowSource`], applies a [`RowBounds`] window and
//! turns each physical row into an item through a [`RowHandler`]. Items are
//! produced on demand with at most one fetched ahead.
//!
//! ```text
//!   CREATED ──first fetch──▶ OPEN ──window/source exhausted──▶ CONSUMED
//!      │                      │
//!      └────────close()───────┴──────fetch error / close()───▶ CLOSED
//! ```

mod bounds;
mod default;
mod source;

pub use bounds::RowBounds;
pub use default::{CursorIter, CursorState, DefaultCursor};
pub use source::{IdentityHandler, RowHandler, RowSource, VecRowSource};

/// A forward-only, single-iterator view over a result stream.
///
/// Uses a GAT for the iterator so that it can borrow the cursor mutably
/// for as long as iteration lasts.
pub trait Cursor {
    /// Logical item produced per row inside the window.
    type Item;

    /// The iterator handed out by [`Cursor::iter`].
    type Iter<'a>: Iterator<Item = crate::Result<Self::Item>>
    where
        Self: 'a;

    /// Returns true once a fetch was attempted and the window is not exhausted.
    fn is_open(&self) -> bool;

    /// Returns true once every item in the window was fetched.
    fn is_consumed(&self) -> bool;

    /// Window position of the last returned item, or `-1` before the first.
    fn current_index(&self) -> i64;

    /// Hand out the cursor's single iterator.
    ///
    /// # Errors
    ///
    /// Returns a usage error if an iterator was already handed out or the
    /// cursor is closed or consumed.
    fn iter(&mut self) -> crate::Result<Self::Iter<'_>>;

    /// Release the source. Idempotent; release failures are not reported.
    fn close(&mut self);
}
