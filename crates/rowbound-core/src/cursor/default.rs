//! Lazy, single-pass cursor over a row source.

use std::fmt;
use std::iter::FusedIterator;

use super::Cursor;
use super::bounds::RowBounds;
use super::source::{RowHandler, RowSource};
use crate::error::BoxError;
use crate::{Error, Result};

/// Lifecycle of a cursor. Moves forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorState {
    /// Constructed, no fetch attempted yet.
    Created,
    /// At least one fetch attempted, window not exhausted.
    Open,
    /// Terminated before the window was exhausted.
    Closed,
    /// The whole window (or the whole source) was delivered.
    Consumed,
}

impl CursorState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Consumed => "consumed",
        }
    }

    /// Closed and Consumed are terminal; both imply a released source.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Consumed)
    }
}

impl fmt::Display for CursorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cursor streaming items out of a [`RowSource`] within a [`RowBounds`] window.
///
/// Rows are pulled only when the consumer asks for the next item; at most
/// one item is buffered. The cursor hands out a single iterator over its
/// lifetime. Dropping a cursor that is still open closes it.
///
/// # Example
///
/// ```rust,ignore
/// use rowbound_core::{Cursor, DefaultCursor, RowBounds, VecRowSource};
///
/// let source = VecRowSource::new((0..10).collect());
/// let mut cursor = DefaultCursor::new(source, RowBounds::new(5, 3), |row: i32| Ok(row * 10));
///
/// let items: Vec<i32> = cursor.iter()?.collect::<Result<_>>()?;
/// assert_eq!(items, vec![50, 60, 70]);
/// assert!(cursor.is_consumed());
/// ```
pub struct DefaultCursor<S: RowSource, H, T> {
    source: S,
    handler: H,
    bounds: RowBounds,
    state: CursorState,
    /// Physical rows pulled from the source, including skipped ones.
    rows_pulled: usize,
    /// Rows at or past the offset that became items.
    items_fetched: usize,
    /// Items handed to the consumer.
    items_returned: usize,
    buffered: Option<T>,
    iterator_issued: bool,
}

impl<S: RowSource, H, T> DefaultCursor<S, H, T> {
    #[must_use]
    pub const fn new(source: S, bounds: RowBounds, handler: H) -> Self {
        Self {
            source,
            handler,
            bounds,
            state: CursorState::Created,
            rows_pulled: 0,
            items_fetched: 0,
            items_returned: 0,
            buffered: None,
            iterator_issued: false,
        }
    }

    #[must_use]
    pub const fn state(&self) -> CursorState {
        self.state
    }

    #[must_use]
    pub const fn row_bounds(&self) -> RowBounds {
        self.bounds
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self.state, CursorState::Closed)
    }

    /// Physical rows pulled so far, including rows skipped by the offset.
    #[must_use]
    pub const fn rows_pulled(&self) -> usize {
        self.rows_pulled
    }

    fn transition(&mut self, next: CursorState) {
        tracing::debug!(
            cursor.from = self.state.as_str(),
            cursor.to = next.as_str(),
            cursor.rows_pulled = self.rows_pulled,
            cursor.items = self.items_fetched,
            "cursor state change",
        );
        self.state = next;
    }

    /// Release the source, swallowing release errors.
    fn release(&mut self) {
        if self.source.is_closed() {
            return;
        }
        if let Err(e) = self.source.close() {
            let e: BoxError = e.into();
            tracing::debug!(error = %e, "ignoring error while closing row source");
        }
    }

    /// Source exhausted or window filled.
    fn finish(&mut self) {
        self.release();
        self.transition(CursorState::Consumed);
    }

    /// Terminated before the window was exhausted.
    fn terminate(&mut self) {
        self.release();
        self.buffered = None;
        self.transition(CursorState::Closed);
    }
}

impl<S, H, T> DefaultCursor<S, H, T>
where
    S: RowSource,
    H: RowHandler<S::Row, T>,
{
    /// Pull physical rows until one lands inside the window.
    fn fetch_next(&mut self) -> Result<Option<T>> {
        if self.state.is_terminal() {
            return Ok(None);
        }
        if self.state == CursorState::Created {
            self.transition(CursorState::Open);
        }
        if self.bounds.is_filled_by(self.items_fetched) {
            self.finish();
            return Ok(None);
        }

        loop {
            let row = if self.source.is_closed() {
                None
            } else {
                match self.source.next_row() {
                    Ok(row) => row,
                    Err(e) => {
                        self.terminate();
                        return Err(Error::data_access(e));
                    }
                }
            };

            let Some(row) = row else {
                self.finish();
                return Ok(None);
            };

            self.rows_pulled += 1;
            let item = match self.handler.handle_row(row) {
                Ok(item) => item,
                Err(e) => {
                    self.terminate();
                    return Err(e);
                }
            };

            if self.rows_pulled <= self.bounds.offset() {
                tracing::trace!(cursor.row = self.rows_pulled - 1, "row before offset skipped");
                continue;
            }

            self.items_fetched += 1;
            if self.bounds.is_filled_by(self.items_fetched) {
                self.finish();
            }
            return Ok(Some(item));
        }
    }

    fn peek(&mut self) -> Result<bool> {
        if self.buffered.is_none() {
            self.buffered = self.fetch_next()?;
        }
        Ok(self.buffered.is_some())
    }

    fn take_next(&mut self) -> Result<Option<T>> {
        let item = match self.buffered.take() {
            Some(item) => Some(item),
            None => self.fetch_next()?,
        };
        if item.is_some() {
            self.items_returned += 1;
        }
        Ok(item)
    }
}

impl<S, H, T> Cursor for DefaultCursor<S, H, T>
where
    S: RowSource,
    H: RowHandler<S::Row, T>,
{
    type Item = T;
    type Iter<'a>
        = CursorIter<'a, S, H, T>
    where
        Self: 'a;

    fn is_open(&self) -> bool {
        self.state == CursorState::Open
    }

    fn is_consumed(&self) -> bool {
        self.state == CursorState::Consumed
    }

    fn current_index(&self) -> i64 {
        if self.items_returned == 0 {
            return -1;
        }
        (self.bounds.offset() + self.items_returned - 1) as i64
    }

    fn iter(&mut self) -> Result<Self::Iter<'_>> {
        if self.iterator_issued {
            return Err(Error::iterator_already_issued());
        }
        if self.state.is_terminal() {
            return Err(Error::cursor_closed(self.state.as_str()));
        }
        self.iterator_issued = true;
        Ok(CursorIter { cursor: self })
    }

    fn close(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.terminate();
    }
}

impl<S: RowSource, H, T> Drop for DefaultCursor<S, H, T> {
    fn drop(&mut self) {
        if !self.state.is_terminal() {
            self.terminate();
        }
    }
}

impl<S: RowSource, H, T> fmt::Debug for DefaultCursor<S, H, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultCursor")
            .field("state", &self.state)
            .field("bounds", &self.bounds)
            .field("rows_pulled", &self.rows_pulled)
            .field("items_returned", &self.items_returned)
            .field("buffered", &self.buffered.is_some())
            .field("iterator_issued", &self.iterator_issued)
            .finish_non_exhaustive()
    }
}

/// The single iterator of a [`DefaultCursor`].
///
/// Yields `Err` once if the source fails, then `None`.
pub struct CursorIter<'a, S: RowSource, H, T> {
    cursor: &'a mut DefaultCursor<S, H, T>,
}

impl<S, H, T> CursorIter<'_, S, H, T>
where
    S: RowSource,
    H: RowHandler<S::Row, T>,
{
    /// Returns true if another item is available.
    ///
    /// Fetches at most one item and buffers it; repeated calls do not pull
    /// further rows until the buffered item is taken by `next()`.
    ///
    /// # Errors
    ///
    /// Returns the fetch failure; the cursor is closed afterward.
    pub fn has_next(&mut self) -> Result<bool> {
        self.cursor.peek()
    }

    /// Removal is not possible on a streamed source.
    ///
    /// # Errors
    ///
    /// Always fails with an unsupported operation error.
    pub const fn remove(&mut self) -> Result<()> {
        Err(Error::unsupported("remove"))
    }

    /// The owning cursor.
    #[must_use]
    pub const fn cursor(&self) -> &DefaultCursor<S, H, T> {
        self.cursor
    }

    /// Same as [`Cursor::current_index`] on the owning cursor.
    #[must_use]
    pub fn current_index(&self) -> i64 {
        self.cursor.current_index()
    }
}

impl<S, H, T> Iterator for CursorIter<'_, S, H, T>
where
    S: RowSource,
    H: RowHandler<S::Row, T>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.take_next().transpose()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let buffered = usize::from(self.cursor.buffered.is_some());
        if self.cursor.state.is_terminal() {
            return (buffered, Some(buffered));
        }
        let upper = self
            .cursor
            .bounds
            .limit()
            .map(|limit| limit.saturating_sub(self.cursor.items_returned));
        (buffered, upper)
    }
}

impl<S, H, T> FusedIterator for CursorIter<'_, S, H, T>
where
    S: RowSource,
    H: RowHandler<S::Row, T>,
{
}

impl<S: RowSource, H, T> fmt::Debug for CursorIter<'_, S, H, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorIter")
            .field("cursor", &self.cursor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::super::source::{IdentityHandler, VecRowSource};
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("{0}")]
    struct StreamError(&'static str);

    /// Source handing out `0..len`, failing at `fail_at` and on close if asked.
    #[derive(Default)]
    struct ProbeSource {
        len: usize,
        next: usize,
        fail_at: Option<usize>,
        fail_on_close: bool,
        closed: Rc<Cell<bool>>,
        pulls: Rc<Cell<usize>>,
    }

    impl ProbeSource {
        fn new(len: usize) -> Self {
            Self {
                len,
                ..Self::default()
            }
        }
    }

    impl RowSource for ProbeSource {
        type Row = usize;
        type Error = StreamError;

        fn next_row(&mut self) -> std::result::Result<Option<usize>, StreamError> {
            self.pulls.set(self.pulls.get() + 1);
            if self.fail_at == Some(self.next) {
                return Err(StreamError("connection reset"));
            }
            if self.next >= self.len {
                return Ok(None);
            }
            self.next += 1;
            Ok(Some(self.next - 1))
        }

        fn is_closed(&self) -> bool {
            self.closed.get()
        }

        fn close(&mut self) -> std::result::Result<(), StreamError> {
            self.closed.set(true);
            if self.fail_on_close {
                return Err(StreamError("close failed"));
            }
            Ok(())
        }
    }

    fn cursor_over(
        source: ProbeSource,
        bounds: RowBounds,
    ) -> DefaultCursor<ProbeSource, IdentityHandler, usize> {
        DefaultCursor::new(source, bounds, IdentityHandler)
    }

    #[test]
    fn test_offset_and_limit_window() {
        let mut cursor = cursor_over(ProbeSource::new(10), RowBounds::new(5, 3));

        let items: Vec<usize> = {
            let mut iter = cursor.iter().unwrap();
            let items = iter.by_ref().take(3).collect::<Result<_>>().unwrap();
            assert_eq!(iter.current_index(), 7);
            assert!(iter.next().is_none());
            items
        };

        assert_eq!(items, vec![5, 6, 7]);
        assert_eq!(cursor.current_index(), 7);
        assert!(cursor.is_consumed());
        assert!(!cursor.is_open());
    }

    #[test]
    fn test_unbounded_window_delivers_every_row() {
        let closed = Rc::new(Cell::new(false));
        let source = ProbeSource {
            closed: Rc::clone(&closed),
            ..ProbeSource::new(4)
        };
        let mut cursor = cursor_over(source, RowBounds::DEFAULT);

        let items: Vec<usize> = cursor.iter().unwrap().collect::<Result<_>>().unwrap();

        assert_eq!(items, vec![0, 1, 2, 3]);
        assert!(cursor.is_consumed());
        assert!(closed.get());
        assert_eq!(cursor.current_index(), 3);
    }

    #[test]
    fn test_current_index_before_first_item() {
        let mut cursor = cursor_over(ProbeSource::new(10), RowBounds::new(5, 3));
        assert_eq!(cursor.current_index(), -1);

        let mut iter = cursor.iter().unwrap();
        assert!(iter.has_next().unwrap());
        assert_eq!(iter.current_index(), -1);

        iter.next().unwrap().unwrap();
        assert_eq!(iter.current_index(), 5);
    }

    #[test]
    fn test_state_progression() {
        let mut cursor = cursor_over(ProbeSource::new(2), RowBounds::DEFAULT);
        assert_eq!(cursor.state(), CursorState::Created);
        assert!(!cursor.is_open());

        {
            let mut iter = cursor.iter().unwrap();
            iter.next().unwrap().unwrap();
            assert!(iter.cursor().is_open());
        }
        assert_eq!(cursor.state(), CursorState::Open);
    }

    #[test]
    fn test_second_iterator_always_fails() {
        let mut fresh = cursor_over(ProbeSource::new(3), RowBounds::DEFAULT);
        drop(fresh.iter().unwrap());
        assert!(fresh.iter().unwrap_err().is_iterator_already_issued());

        let mut consumed = cursor_over(ProbeSource::new(3), RowBounds::DEFAULT);
        consumed.iter().unwrap().for_each(drop);
        assert!(consumed.is_consumed());
        let err = consumed.iter().unwrap_err();
        assert!(err.is_usage());
        assert!(err.is_iterator_already_issued());

        let mut closed = cursor_over(ProbeSource::new(3), RowBounds::DEFAULT);
        drop(closed.iter().unwrap());
        closed.close();
        assert!(closed.iter().unwrap_err().is_iterator_already_issued());
    }

    #[test]
    fn test_iterator_on_terminal_cursor_fails() {
        let mut cursor = cursor_over(ProbeSource::new(3), RowBounds::DEFAULT);
        cursor.close();

        let err = cursor.iter().unwrap_err();
        assert!(err.is_usage());
        assert!(err.is_cursor_closed());
    }

    #[test]
    fn test_close_twice() {
        let closed = Rc::new(Cell::new(false));
        let source = ProbeSource {
            closed: Rc::clone(&closed),
            ..ProbeSource::new(3)
        };
        let mut cursor = cursor_over(source, RowBounds::DEFAULT);

        cursor.close();
        cursor.close();

        assert_eq!(cursor.state(), CursorState::Closed);
        assert!(cursor.is_closed());
        assert!(closed.get());
    }

    #[test]
    fn test_close_after_consumed_keeps_consumed() {
        let mut cursor = cursor_over(ProbeSource::new(2), RowBounds::DEFAULT);
        cursor.iter().unwrap().for_each(drop);

        cursor.close();
        cursor.close();

        assert_eq!(cursor.state(), CursorState::Consumed);
    }

    #[test]
    fn test_close_error_is_swallowed() {
        let source = ProbeSource {
            fail_on_close: true,
            ..ProbeSource::new(3)
        };
        let mut cursor = cursor_over(source, RowBounds::DEFAULT);

        cursor.close();
        assert!(cursor.is_closed());
    }

    #[test]
    fn test_close_error_after_exhaustion_is_swallowed() {
        let source = ProbeSource {
            fail_on_close: true,
            ..ProbeSource::new(2)
        };
        let mut cursor = cursor_over(source, RowBounds::DEFAULT);

        let items: Vec<usize> = cursor.iter().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(items, vec![0, 1]);
        assert!(cursor.is_consumed());
    }

    #[test]
    fn test_has_next_does_not_refetch_buffered_item() {
        let pulls = Rc::new(Cell::new(0));
        let source = ProbeSource {
            pulls: Rc::clone(&pulls),
            ..ProbeSource::new(5)
        };
        let mut cursor = cursor_over(source, RowBounds::DEFAULT);
        let mut iter = cursor.iter().unwrap();

        assert!(iter.has_next().unwrap());
        assert!(iter.has_next().unwrap());
        assert_eq!(pulls.get(), 1);

        assert_eq!(iter.next().unwrap().unwrap(), 0);
        assert_eq!(pulls.get(), 1);

        assert!(iter.has_next().unwrap());
        assert_eq!(pulls.get(), 2);
        assert_eq!(iter.next().unwrap().unwrap(), 1);
    }

    #[test]
    fn test_window_filled_without_extra_pull() {
        let pulls = Rc::new(Cell::new(0));
        let source = ProbeSource {
            pulls: Rc::clone(&pulls),
            ..ProbeSource::new(10)
        };
        let mut cursor = cursor_over(source, RowBounds::new(5, 3));

        let count = cursor.iter().unwrap().count();

        assert_eq!(count, 3);
        assert_eq!(pulls.get(), 8);
        assert_eq!(cursor.rows_pulled(), 8);
    }

    #[test]
    fn test_offset_past_end_yields_nothing() {
        let mut cursor = cursor_over(ProbeSource::new(3), RowBounds::new(10, 2));

        assert!(cursor.iter().unwrap().next().is_none());
        assert!(cursor.is_consumed());
        assert_eq!(cursor.current_index(), -1);
    }

    #[test]
    fn test_zero_limit_pulls_nothing() {
        let pulls = Rc::new(Cell::new(0));
        let source = ProbeSource {
            pulls: Rc::clone(&pulls),
            ..ProbeSource::new(3)
        };
        let mut cursor = cursor_over(source, RowBounds::new(0, 0));

        assert!(cursor.iter().unwrap().next().is_none());
        assert!(cursor.is_consumed());
        assert_eq!(pulls.get(), 0);
    }

    #[test]
    fn test_fetch_error_surfaces_once_then_closes() {
        let closed = Rc::new(Cell::new(false));
        let source = ProbeSource {
            fail_at: Some(2),
            closed: Rc::clone(&closed),
            ..ProbeSource::new(5)
        };
        let mut cursor = cursor_over(source, RowBounds::DEFAULT);

        {
            let mut iter = cursor.iter().unwrap();
            assert_eq!(iter.next().unwrap().unwrap(), 0);
            assert_eq!(iter.next().unwrap().unwrap(), 1);

            let err = iter.next().unwrap().unwrap_err();
            assert!(err.is_data_access());
            assert!(err.to_string().contains("connection reset"));
            assert!(err.downcast_ref::<StreamError>().is_some());

            assert!(iter.next().is_none());
        }

        assert!(cursor.is_closed());
        assert!(closed.get());
        assert_eq!(cursor.current_index(), 1);
    }

    #[test]
    fn test_handler_error_closes_cursor() {
        let source = VecRowSource::new(vec!["1", "x", "3"]);
        let handler =
            |row: &str| -> Result<u32> { row.parse().map_err(Error::data_access) };
        let mut cursor = DefaultCursor::new(source, RowBounds::DEFAULT, handler);

        let results: Vec<Result<u32>> = cursor.iter().unwrap().collect();

        assert_eq!(results.len(), 2);
        assert_eq!(*results[0].as_ref().unwrap(), 1);
        assert!(results[1].as_ref().unwrap_err().is_data_access());
        assert!(cursor.is_closed());
    }

    #[test]
    fn test_handler_error_kind_is_preserved() {
        let closed = Rc::new(Cell::new(false));
        let source = ProbeSource {
            closed: Rc::clone(&closed),
            ..ProbeSource::new(4)
        };
        let handler = |row: usize| -> Result<usize> {
            if row == 1 {
                Err(Error::config("row 1 rejected"))
            } else {
                Ok(row)
            }
        };
        let mut cursor = DefaultCursor::new(source, RowBounds::DEFAULT, handler);

        {
            let mut iter = cursor.iter().unwrap();
            assert_eq!(iter.next().unwrap().unwrap(), 0);

            let err = iter.next().unwrap().unwrap_err();
            assert!(err.is_config());
            assert!(!err.is_data_access());
            assert!(err.to_string().contains("row 1 rejected"));

            assert!(iter.next().is_none());
        }

        assert!(cursor.is_closed());
        assert!(closed.get());
    }

    #[test]
    fn test_handler_runs_once_per_physical_row() {
        let handled = Rc::new(Cell::new(0));
        let counter = Rc::clone(&handled);
        let handler = move |row: u8| -> Result<String> {
            counter.set(counter.get() + 1);
            Ok(format!("item-{row}"))
        };
        let source: VecRowSource<u8> = (0..6).collect();
        let mut cursor = DefaultCursor::new(source, RowBounds::new(2, 2), handler);

        let items: Vec<String> = cursor.iter().unwrap().collect::<Result<_>>().unwrap();

        assert_eq!(items, vec!["item-2", "item-3"]);
        assert_eq!(handled.get(), 4);
    }

    #[test]
    fn test_remove_is_unsupported() {
        let mut cursor = cursor_over(ProbeSource::new(3), RowBounds::DEFAULT);
        let mut iter = cursor.iter().unwrap();
        iter.next();

        let err = iter.remove().unwrap_err();
        assert!(err.is_unsupported());
        assert!(err.is_usage());
    }

    #[test]
    fn test_drop_closes_abandoned_cursor() {
        let closed = Rc::new(Cell::new(false));
        let source = ProbeSource {
            closed: Rc::clone(&closed),
            ..ProbeSource::new(10)
        };
        let mut cursor = cursor_over(source, RowBounds::DEFAULT);
        cursor.iter().unwrap().next();
        assert!(!closed.get());

        drop(cursor);
        assert!(closed.get());
    }

    #[test]
    fn test_size_hint() {
        let mut cursor = cursor_over(ProbeSource::new(10), RowBounds::new(0, 4));
        let mut iter = cursor.iter().unwrap();
        assert_eq!(iter.size_hint(), (0, Some(4)));

        iter.has_next().unwrap();
        assert_eq!(iter.size_hint(), (1, Some(4)));

        iter.next();
        assert_eq!(iter.size_hint(), (0, Some(3)));
    }

    #[test]
    fn test_cursor_debug() {
        let cursor = cursor_over(ProbeSource::new(1), RowBounds::new(1, 1));
        let debug_str = format!("{cursor:?}");
        assert!(debug_str.contains("DefaultCursor"));
        assert!(debug_str.contains("Created"));
    }
}
