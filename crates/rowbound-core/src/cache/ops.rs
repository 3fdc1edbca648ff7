//! Operation signatures of a cache exposed as an interception target.
//!
//! Interceptors name these in their interest sets:
//!
//! ```rust,ignore
//! use rowbound_core::cache::ops;
//! use rowbound_core::plugin::InterestSet;
//!
//! let interest = InterestSet::new().with(ops::CACHE.clone(), ops::GET);
//! ```

use std::borrow::Cow;

use crate::plugin::{Operation, ReceiverKind};

/// Receiver kind of every cache target.
pub static CACHE: ReceiverKind = ReceiverKind::from_static("Cache");

/// `get(Key) -> Option<Value>`
pub const GET: Operation = Operation::from_static("get", &[Cow::Borrowed("Key")]);

/// `put(Key, Value) -> ()`
pub const PUT: Operation =
    Operation::from_static("put", &[Cow::Borrowed("Key"), Cow::Borrowed("Value")]);

/// `remove(Key) -> Option<Value>`
pub const REMOVE: Operation = Operation::from_static("remove", &[Cow::Borrowed("Key")]);

/// `clear() -> ()`
pub const CLEAR: Operation = Operation::from_static("clear", &[]);

/// `size() -> usize`
pub const SIZE: Operation = Operation::from_static("size", &[]);
