//! Tracked cursor wrapper and the lifecycle gate it reports through

use super::types::CursorId;
use crate::cursor::{BoundCursor, Cursor};
use crate::path::PathRange;
use crossbeam_channel::Sender;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::warn;

/// Last known path of a tracked cursor, shared with its tracker
pub(crate) type Position = Arc<Mutex<Vec<u8>>>;

/// A cursor registration as delivered to the tracker
#[derive(Debug)]
pub(crate) struct Registration {
    pub id: CursorId,
    pub position: Position,
    pub upper: Option<Vec<u8>>,
}

/// Channel ends the tracker hands out, guarded by its running flag
#[derive(Debug)]
pub(crate) struct Lifecycle {
    pub running: bool,
    pub start_tx: Option<Sender<Registration>>,
    pub stop_tx: Option<Sender<CursorId>>,
}

/// Shared handle between a tracker and its cursors
///
/// Senders only ever send while holding the read lock, so once shutdown holds
/// the write lock every message sent before it is already buffered.
#[derive(Debug)]
pub(crate) struct Gate {
    pub lifecycle: RwLock<Lifecycle>,
}

impl Gate {
    pub fn new(start_tx: Sender<Registration>, stop_tx: Sender<CursorId>) -> Self {
        Self {
            lifecycle: RwLock::new(Lifecycle {
                running: true,
                start_tx: Some(start_tx),
                stop_tx: Some(stop_tx),
            }),
        }
    }

    fn notify_finished(&self, id: CursorId) {
        let lifecycle = self.lifecycle.read();
        let delivered = match &lifecycle.stop_tx {
            Some(tx) if lifecycle.running => tx.send(id).is_ok(),
            _ => false,
        };
        if !delivered {
            warn!(cursor = %id, "Tracker was closed before cursor finished");
        }
    }
}

/// A cursor registered with a [`crate::tracker::Tracker`]
///
/// Publishes its path after every step so the tracker can checkpoint it, and
/// tells the tracker once when it runs out of nodes. Dropping an unfinished
/// tracked cursor leaves it registered, so its last position is saved.
#[derive(Debug)]
pub struct TrackedCursor<C> {
    inner: C,
    id: CursorId,
    position: Position,
    gate: Arc<Gate>,
    finished: bool,
}

impl<C: Cursor> TrackedCursor<C> {
    pub(crate) fn new(inner: C, id: CursorId, position: Position, gate: Arc<Gate>) -> Self {
        Self {
            inner,
            id,
            position,
            gate,
            finished: false,
        }
    }

    /// Registration id of this cursor
    pub fn id(&self) -> CursorId {
        self.id
    }

    /// Whether the cursor has reported completion
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Get a reference to the wrapped cursor
    pub fn get_ref(&self) -> &C {
        &self.inner
    }

    /// Consume the wrapper and return the wrapped cursor
    ///
    /// The registration stays with the tracker.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Cursor> TrackedCursor<BoundCursor<C>> {
    /// Get a reference to the base cursor beneath the bound
    pub fn base(&self) -> &C {
        self.inner.get_ref()
    }
}

impl<C: Cursor> Cursor for TrackedCursor<C> {
    fn advance(&mut self, descend: bool) -> bool {
        let more = self.inner.advance(descend);
        if more {
            let mut position = self.position.lock();
            position.clear();
            position.extend_from_slice(self.inner.path());
        } else if !self.finished {
            self.finished = true;
            self.gate.notify_finished(self.id);
        }
        more
    }

    fn path(&self) -> &[u8] {
        self.inner.path()
    }

    fn bounds(&self) -> Option<&PathRange> {
        self.inner.bounds()
    }
}
