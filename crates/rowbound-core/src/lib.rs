//! Result streaming and call interception for data-access layers.
//!
//! This crate provides the runtime core of a statement mapper:
//!
//! - a lazy, single-pass [`DefaultCursor`] that applies a [`RowBounds`]
//!   window over an open [`RowSource`] and materializes rows on demand;
//! - an [`InterceptorChain`] that composes [`Interceptor`]s around
//!   execution objects exposed as [`Target`]s;
//! - identity-keyed caches, usable directly or as interception targets.
//!
//! # Example
//!
//! ```rust,ignore
//! use rowbound_core::{Cursor, DefaultCursor, RowBounds, VecRowSource};
//!
//! let mut cursor = DefaultCursor::new(
//!     VecRowSource::new(rows),
//!     RowBounds::new(100, 50),
//!     |row: Row| Ok(User::from(row)),
//! );
//!
//! for user in cursor.iter()? {
//!     println!("{}", user?.name);
//! }
//! ```
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cache;
pub mod cursor;
pub mod error;
pub mod plugin;

// Re-export main types for convenience
pub use cache::{
    Cache, CacheFacade, CacheId, CacheKey, LoggingCache, PerpetualCache, SynchronizedCache,
};
pub use cursor::{
    Cursor, CursorIter, CursorState, DefaultCursor, IdentityHandler, RowBounds, RowHandler,
    RowSource, VecRowSource,
};
pub use error::{BoxError, Error, Result};
pub use plugin::{
    Arguments, InterceptorChain, Interceptor, InterestSet, Invocation, Operation, Plugin,
    Properties, ReceiverKind, Signature, Target, Value,
};
