//! Upper-bounded cursor

use super::types::Cursor;
use crate::path::PathRange;

/// A cursor confined to an inclusive path range
///
/// Only the upper bound is enforced while iterating. The lower bound is
/// satisfied by seeding the base cursor at `range.lower`, which is what
/// [`crate::partition::subtrie_cursors`] and [`crate::tracker::Tracker::restore`] do.
#[derive(Debug)]
pub struct BoundCursor<C> {
    inner: C,
    range: PathRange,
    done: bool,
}

impl<C: Cursor> BoundCursor<C> {
    /// Wrap `inner`, which should already be positioned at `range.lower`
    pub fn new(inner: C, range: PathRange) -> Self {
        Self {
            inner,
            range,
            done: false,
        }
    }

    /// Wrap `inner` with only an upper bound
    pub fn with_upper(inner: C, upper: Option<Vec<u8>>) -> Self {
        Self::new(inner, PathRange::new(Vec::new(), upper))
    }

    /// The range this cursor is confined to
    pub fn range(&self) -> &PathRange {
        &self.range
    }

    /// Whether the end of the range has been reached
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Get a reference to the base cursor
    pub fn get_ref(&self) -> &C {
        &self.inner
    }

    /// Get a mutable reference to the base cursor
    pub fn get_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    /// Consume the wrapper and return the base cursor
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Cursor> Cursor for BoundCursor<C> {
    fn advance(&mut self, descend: bool) -> bool {
        if self.done {
            return false;
        }
        // once past the upper bound the base cursor is never consulted again
        if !self.inner.advance(descend) || self.range.exceeds_upper(self.inner.path()) {
            self.done = true;
            return false;
        }
        true
    }

    fn path(&self) -> &[u8] {
        self.inner.path()
    }

    fn bounds(&self) -> Option<&PathRange> {
        Some(&self.range)
    }
}
