//! Error hierarchy for rowbound.
//!
//! Follows the "canonical error struct" pattern: the classification enum stays
//! crate-private and callers use the `is_xxx()` predicates instead.
//!
//! Three families exist:
//!
//! - **usage** errors signal a contract violation by the caller (second
//!   iterator, removal through a cursor iterator, empty cache id, argument
//!   type mismatch) and are never retried;
//! - **data access** errors wrap a failure of the underlying row source;
//! - **target** errors are raised by an interception target's own logic and
//!   travel through interceptor chains unchanged.

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed error type accepted from collaborators.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Root error type for rowbound.
///
/// # Example
///
/// ```rust,ignore
/// use rowbound_core::Error;
///
/// fn handle(err: &Error) {
///     if err.is_usage() {
///         panic!("caller bug: {err}");
///     } else if err.is_data_access() {
///         eprintln!("row source failed: {err}");
///     }
/// }
/// ```
#[derive(Error, Debug)]
#[error("{kind}")]
pub struct Error {
    kind: ErrorKind,
}

/// Internal error classification.
#[derive(Error, Debug)]
#[non_exhaustive]
pub(crate) enum ErrorKind {
    /// A cursor handed out its single iterator already.
    #[error("cannot open more than one iterator on a cursor")]
    IteratorAlreadyIssued,

    /// A cursor in a terminal state was asked for an iterator.
    #[error("cursor is already {state}")]
    CursorClosed { state: &'static str },

    /// The operation is not supported by this object.
    #[error("unsupported operation: {operation}")]
    Unsupported { operation: &'static str },

    /// A cache was constructed without an identity.
    #[error("cache id must not be empty")]
    MissingCacheId,

    /// An argument was missing or had a different type than expected.
    #[error("argument {index}: expected {expected}, found {found}")]
    ArgumentMismatch {
        index: usize,
        expected: &'static str,
        found: String,
    },

    /// An operation returned a value of an unexpected type.
    #[error("expected result of type {expected}, found {found}")]
    ResultMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A target was invoked with an operation it does not implement.
    #[error("{receiver} does not implement {operation}")]
    UnknownOperation { receiver: String, operation: String },

    /// Failure while fetching from the underlying row source.
    #[error("data access error: {0}")]
    DataAccess(#[source] BoxError),

    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Failure raised by an interception target itself.
    #[error("{0}")]
    Target(#[source] BoxError),
}

impl Error {
    // ═══════════════════════════════════════════════════════════════════════
    // Constructors
    // ═══════════════════════════════════════════════════════════════════════

    /// Create error for a second iterator request.
    #[must_use]
    pub const fn iterator_already_issued() -> Self {
        Self {
            kind: ErrorKind::IteratorAlreadyIssued,
        }
    }

    /// Create error for an iterator request on a terminal cursor.
    #[must_use]
    pub const fn cursor_closed(state: &'static str) -> Self {
        Self {
            kind: ErrorKind::CursorClosed { state },
        }
    }

    /// Create error for an unsupported operation.
    #[must_use]
    pub const fn unsupported(operation: &'static str) -> Self {
        Self {
            kind: ErrorKind::Unsupported { operation },
        }
    }

    /// Create error for an empty cache id.
    #[must_use]
    pub const fn missing_cache_id() -> Self {
        Self {
            kind: ErrorKind::MissingCacheId,
        }
    }

    /// Create error for an argument of the wrong type or position.
    #[must_use]
    pub fn argument_mismatch(
        index: usize,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        Self {
            kind: ErrorKind::ArgumentMismatch {
                index,
                expected,
                found: found.into(),
            },
        }
    }

    /// Create error for a result of an unexpected type.
    #[must_use]
    pub const fn result_mismatch(expected: &'static str, found: &'static str) -> Self {
        Self {
            kind: ErrorKind::ResultMismatch { expected, found },
        }
    }

    /// Create error for an operation a target does not implement.
    #[must_use]
    pub fn unknown_operation(receiver: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::UnknownOperation {
                receiver: receiver.into(),
                operation: operation.into(),
            },
        }
    }

    /// Create error for a row source failure.
    #[must_use]
    pub fn data_access(source: impl Into<BoxError>) -> Self {
        Self {
            kind: ErrorKind::DataAccess(source.into()),
        }
    }

    /// Create error for invalid configuration.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Config(message.into()),
        }
    }

    /// Create error raised by a target's own logic.
    #[must_use]
    pub fn target(source: impl Into<BoxError>) -> Self {
        Self {
            kind: ErrorKind::Target(source.into()),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Predicate Methods (is_xxx)
    // ═══════════════════════════════════════════════════════════════════════

    /// Returns true for any caller contract violation.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::IteratorAlreadyIssued
                | ErrorKind::CursorClosed { .. }
                | ErrorKind::Unsupported { .. }
                | ErrorKind::MissingCacheId
                | ErrorKind::ArgumentMismatch { .. }
                | ErrorKind::ResultMismatch { .. }
                | ErrorKind::UnknownOperation { .. }
        )
    }

    /// Returns true if a second iterator was requested.
    #[must_use]
    pub const fn is_iterator_already_issued(&self) -> bool {
        matches!(self.kind, ErrorKind::IteratorAlreadyIssued)
    }

    /// Returns true if an iterator was requested from a terminal cursor.
    #[must_use]
    pub const fn is_cursor_closed(&self) -> bool {
        matches!(self.kind, ErrorKind::CursorClosed { .. })
    }

    /// Returns true if this is an unsupported operation error.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self.kind, ErrorKind::Unsupported { .. })
    }

    /// Returns true if a cache id was missing.
    #[must_use]
    pub const fn is_missing_cache_id(&self) -> bool {
        matches!(self.kind, ErrorKind::MissingCacheId)
    }

    /// Returns true if an argument did not match the expected type.
    #[must_use]
    pub const fn is_argument_mismatch(&self) -> bool {
        matches!(self.kind, ErrorKind::ArgumentMismatch { .. })
    }

    /// Returns true if a result did not match the expected type.
    #[must_use]
    pub const fn is_result_mismatch(&self) -> bool {
        matches!(self.kind, ErrorKind::ResultMismatch { .. })
    }

    /// Returns true if a target did not implement the invoked operation.
    #[must_use]
    pub const fn is_unknown_operation(&self) -> bool {
        matches!(self.kind, ErrorKind::UnknownOperation { .. })
    }

    /// Returns true if the row source failed.
    #[must_use]
    pub const fn is_data_access(&self) -> bool {
        matches!(self.kind, ErrorKind::DataAccess(_))
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self.kind, ErrorKind::Config(_))
    }

    /// Returns true if the error was raised by a target.
    #[must_use]
    pub const fn is_target(&self) -> bool {
        matches!(self.kind, ErrorKind::Target(_))
    }

    /// Downcast the wrapped collaborator error, if any.
    #[must_use]
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        match &self.kind {
            ErrorKind::DataAccess(source) | ErrorKind::Target(source) => source.downcast_ref(),
            _ => None,
        }
    }
}

/// Result type alias for rowbound operations.
pub type Result<T> = std::result::Result<T, Error>;
