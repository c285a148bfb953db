//! Cursor trait

use crate::path::PathRange;

/// A pre-order iterator over trie nodes
///
/// Cursors are seeded from packed key bytes by a caller-supplied constructor
/// (`FnMut(&[u8]) -> C`) and then driven with [`Cursor::advance`].
pub trait Cursor {
    /// Move to the next node, skipping the current node's children when
    /// `descend` is false. Returns false once the cursor is exhausted.
    fn advance(&mut self, descend: bool) -> bool;

    /// Nibble path of the current node
    ///
    /// Empty before the first call to `advance` and after exhaustion.
    fn path(&self) -> &[u8];

    /// Range the cursor is confined to, if any
    fn bounds(&self) -> Option<&PathRange> {
        None
    }
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    fn advance(&mut self, descend: bool) -> bool {
        (**self).advance(descend)
    }

    fn path(&self) -> &[u8] {
        (**self).path()
    }

    fn bounds(&self) -> Option<&PathRange> {
        (**self).bounds()
    }
}
