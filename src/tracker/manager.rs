//! Tracker implementation
//!
//! Registrations and completions arrive over bounded channels and are folded
//! into the tracker's ledger whenever it is reconciled: on every `tracked`
//! call, on `save`, and during shutdown.

use super::recovery::{load_records, remove_file, write_records};
use super::tracked::{Gate, Registration, TrackedCursor};
use super::types::{Checkpoint, CursorId, RecoveryRecord};
use crate::config::TrackerConfig;
use crate::cursor::{BoundCursor, Cursor};
use crate::error::{Error, Result};
use crate::path::nibbles_to_key;
use crossbeam_channel::{bounded, Receiver};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Started and stopped cursors, owned by the tracker
#[derive(Debug, Default)]
struct Ledger {
    /// Registered cursors that have not finished, in registration order
    started: BTreeMap<CursorId, Registration>,
    /// Cursors that reported completion
    stopped: HashSet<CursorId>,
    closed: bool,
}

/// Thread-safe registry of trie cursors with file-based checkpointing
///
/// `capacity` bounds the internal registration and completion queues. It must
/// be at least the number of cursors alive at once: a smaller value makes
/// `tracked` or a finishing cursor block until the queues are drained, which
/// can deadlock shutdown.
#[derive(Debug)]
pub struct Tracker {
    recovery_file: PathBuf,
    capacity: usize,
    gate: Arc<Gate>,
    start_rx: Receiver<Registration>,
    stop_rx: Receiver<CursorId>,
    ledger: Mutex<Ledger>,
    next_id: AtomicU64,
}

impl Tracker {
    /// Create a tracker that checkpoints to `recovery_file`
    pub fn new(recovery_file: impl AsRef<Path>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (start_tx, start_rx) = bounded(capacity);
        let (stop_tx, stop_rx) = bounded(capacity);

        Self {
            recovery_file: recovery_file.as_ref().to_path_buf(),
            capacity,
            gate: Arc::new(Gate::new(start_tx, stop_tx)),
            start_rx,
            stop_rx,
            ledger: Mutex::new(Ledger::default()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Create a tracker from configuration
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(&config.recovery_file, config.capacity)
    }

    /// Get the recovery file path
    pub fn recovery_file(&self) -> &Path {
        &self.recovery_file
    }

    /// Get the queue capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if the tracker has been shut down
    pub fn is_closed(&self) -> bool {
        !self.gate.lifecycle.read().running
    }

    /// Number of registered cursors that have not finished
    pub fn started_count(&self) -> usize {
        let mut ledger = self.ledger.lock();
        self.reconcile(&mut ledger);
        ledger.started.len()
    }

    /// Number of cursors that have finished
    pub fn stopped_count(&self) -> usize {
        let mut ledger = self.ledger.lock();
        self.reconcile(&mut ledger);
        ledger.stopped.len()
    }

    /// Register a cursor for tracking
    ///
    /// Fails with [`Error::TrackerClosed`] once shutdown has begun.
    pub fn tracked<C: Cursor>(&self, cursor: C) -> Result<TrackedCursor<C>> {
        {
            let mut ledger = self.ledger.lock();
            self.reconcile(&mut ledger);
        }

        // an unstarted cursor resumes from its lower bound
        let start = if cursor.path().is_empty() {
            cursor.bounds().map(|b| b.lower.clone()).unwrap_or_default()
        } else {
            cursor.path().to_vec()
        };
        let id = CursorId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let position = Arc::new(Mutex::new(start));
        let registration = Registration {
            id,
            position: Arc::clone(&position),
            upper: cursor.bounds().and_then(|b| b.upper.clone()),
        };

        {
            let lifecycle = self.gate.lifecycle.read();
            let tx = lifecycle.start_tx.as_ref().ok_or(Error::TrackerClosed)?;
            tx.send(registration).map_err(|_| Error::TrackerClosed)?;
        }

        Ok(TrackedCursor::new(cursor, id, position, Arc::clone(&self.gate)))
    }

    /// Write the position of every unfinished cursor to the recovery file
    ///
    /// With nothing unfinished, any existing recovery file is removed instead.
    pub fn save(&self) -> Result<()> {
        let mut ledger = self.ledger.lock();
        if ledger.closed {
            return Err(Error::TrackerClosed);
        }
        self.reconcile(&mut ledger);
        self.write_checkpoint(&ledger)
    }

    /// Rebuild cursors from the recovery file
    ///
    /// Each row becomes a bounded cursor seeded at its saved position (rewound
    /// to an even length if needed) and registered with this tracker, in file
    /// order. A missing file yields no cursors. The file is removed once every
    /// row has been restored; a malformed row fails the whole restore and
    /// leaves the file in place.
    pub fn restore<C, F>(&self, mut make_cursor: F) -> Result<Vec<TrackedCursor<BoundCursor<C>>>>
    where
        C: Cursor,
        F: FnMut(&[u8]) -> C,
    {
        if self.ledger.lock().closed {
            return Err(Error::TrackerClosed);
        }
        let Some(records) = load_records(&self.recovery_file)? else {
            return Ok(Vec::new());
        };
        debug!(
            from = %self.recovery_file.display(),
            rows = records.len(),
            "Restoring recovery state"
        );

        let cursors = records
            .iter()
            .map(|record| {
                let range = record.resume_range();
                let key = nibbles_to_key(&range.lower)?;
                Ok(BoundCursor::new(make_cursor(&key), range))
            })
            .collect::<Result<Vec<_>>>()?;

        let tracked = cursors
            .into_iter()
            .map(|cursor| self.tracked(cursor))
            .collect::<Result<Vec<_>>>()?;

        remove_file(&self.recovery_file)?;
        Ok(tracked)
    }

    /// Shut the tracker down and checkpoint every unfinished cursor
    ///
    /// New registrations fail from this point on. Registrations and completions
    /// already queued are drained first so none are lost. Can only be called
    /// once; a new tracker is needed for the next run.
    pub fn close_and_save(&self) -> Result<Checkpoint> {
        {
            let mut lifecycle = self.gate.lifecycle.write();
            if !lifecycle.running {
                return Err(Error::TrackerClosed);
            }
            lifecycle.running = false;
            lifecycle.stop_tx = None;
            lifecycle.start_tx = None;
        }

        let mut ledger = self.ledger.lock();
        ledger.closed = true;
        self.reconcile(&mut ledger);
        self.write_checkpoint(&ledger)?;

        let checkpoint = Checkpoint {
            saved: ledger.started.len(),
            finished: ledger.stopped.len(),
        };
        debug!(
            saved = checkpoint.saved,
            finished = checkpoint.finished,
            "Tracker closed"
        );
        Ok(checkpoint)
    }

    /// Fold queued registrations and completions into the ledger
    fn reconcile(&self, ledger: &mut Ledger) {
        for registration in self.start_rx.try_iter() {
            // a completion can be drained before the registration it belongs to
            if !ledger.stopped.contains(&registration.id) {
                ledger.started.insert(registration.id, registration);
            }
        }
        for id in self.stop_rx.try_iter() {
            ledger.started.remove(&id);
            ledger.stopped.insert(id);
        }
    }

    fn write_checkpoint(&self, ledger: &Ledger) -> Result<()> {
        debug!(to = %self.recovery_file.display(), "Saving recovery state");

        if ledger.started.is_empty() {
            return remove_file(&self.recovery_file);
        }

        let records: Vec<RecoveryRecord> = ledger
            .started
            .values()
            .map(|r| RecoveryRecord::new(r.position.lock().clone(), r.upper.clone()))
            .collect();
        write_records(&self.recovery_file, &records)
    }
}
