//! Cursor tracking and recovery
//!
//! Tracks many concurrently running trie cursors, saves their positions to a
//! recovery file when the process stops, and restores them where they left off
//! on the next run.
//!
//! # Overview
//!
//! - `Tracker` - thread-safe registry with checkpoint and restore
//! - `TrackedCursor` - cursor wrapper that reports its position and completion
//! - `RecoveryRecord` - one row of the recovery file
//!
//! ```rust,ignore
//! let tracker = Tracker::new("recovery.csv", 64);
//!
//! // resume anything left over from a previous run
//! let mut cursors = tracker.restore(|key| trie.cursor(key))?;
//!
//! // ... drive cursors from worker threads ...
//!
//! // persist whatever has not finished
//! tracker.close_and_save()?;
//! ```

mod manager;
mod recovery;
mod tracked;
mod types;

pub use manager::Tracker;
pub use recovery::read_recovery_file;
pub use tracked::TrackedCursor;
pub use types::{Checkpoint, CursorId, RecoveryRecord};
