//! Collaborator contracts driven by a cursor.

use std::convert::Infallible;

use crate::Result;
use crate::error::BoxError;

/// An open result stream delivering one physical row per call.
///
/// The cursor owns its source exclusively and is the only party that closes
/// it.
pub trait RowSource {
    /// Physical row type.
    type Row;

    /// Error raised by the underlying stream.
    type Error: Into<BoxError>;

    /// Deliver the next physical row, or `Ok(None)` once exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream fails.
    fn next_row(&mut self) -> std::result::Result<Option<Self::Row>, Self::Error>;

    /// Returns true if the underlying stream is already closed.
    fn is_closed(&self) -> bool;

    /// Release the underlying stream.
    ///
    /// # Errors
    ///
    /// Returns an error if releasing fails.
    fn close(&mut self) -> std::result::Result<(), Self::Error>;
}

/// Materializes a physical row into a logical item.
///
/// Invoked once per physical row pulled from the source. Closures of the
/// shape `FnMut(R) -> Result<T>` implement this trait.
pub trait RowHandler<R, T> {
    /// # Errors
    ///
    /// Returns an error if the row cannot be materialized.
    fn handle_row(&mut self, row: R) -> Result<T>;
}

impl<R, T, F> RowHandler<R, T> for F
where
    F: FnMut(R) -> Result<T>,
{
    fn handle_row(&mut self, row: R) -> Result<T> {
        self(row)
    }
}

/// Row handler that yields physical rows unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityHandler;

impl<R> RowHandler<R, R> for IdentityHandler {
    fn handle_row(&mut self, row: R) -> Result<R> {
        Ok(row)
    }
}

/// Row source over already materialized rows.
#[derive(Debug)]
pub struct VecRowSource<R> {
    rows: std::vec::IntoIter<R>,
    closed: bool,
}

impl<R> VecRowSource<R> {
    #[must_use]
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows: rows.into_iter(),
            closed: false,
        }
    }

    /// Number of rows not yet delivered.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl<R> From<Vec<R>> for VecRowSource<R> {
    fn from(rows: Vec<R>) -> Self {
        Self::new(rows)
    }
}

impl<R> FromIterator<R> for VecRowSource<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<R> RowSource for VecRowSource<R> {
    type Row = R;
    type Error = Infallible;

    fn next_row(&mut self) -> std::result::Result<Option<R>, Infallible> {
        if self.closed {
            return Ok(None);
        }
        Ok(self.rows.next())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self) -> std::result::Result<(), Infallible> {
        self.closed = true;
        // Drop undelivered rows with the stream.
        self.rows = Vec::new().into_iter();
        Ok(())
    }
}
