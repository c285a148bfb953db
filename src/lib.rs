// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # trie-tracker
//!
//! Resumable, partition-aware traversal of a Merkle-Patricia trie.
//!
//! ## Features
//!
//! - **Partitioning**: Split a trie (or a subtrie under a prefix) into a
//!   power-of-two number of contiguous path ranges
//! - **Bounded Cursors**: Confine any trie cursor to an inclusive path range
//! - **Tracking**: Record the position of every live cursor and checkpoint
//!   unfinished ones to a recovery file
//! - **Restore**: Rebuild bounded cursors from the recovery file and resume
//!   where the previous run stopped
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use trie_tracker::{subtrie_cursors, Cursor, MemoryTrie, Tracker};
//!
//! let trie = MemoryTrie::from_keys(&keys)?;
//! let tracker = Tracker::new("recovery.csv", 64);
//!
//! // resume a previous run, or start a fresh partitioned one
//! let mut cursors = tracker.restore(|key| trie.cursor(key))?;
//! if cursors.is_empty() {
//!     for bin in subtrie_cursors(|key| trie.cursor(key), &[], 16)? {
//!         cursors.push(tracker.tracked(bin)?);
//!     }
//! }
//!
//! // ... drive cursors, possibly on several threads ...
//!
//! let checkpoint = tracker.close_and_save()?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Tracker                            │
//! │  tracked(cursor)   save()   restore(f)   close_and_save()   │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!        ┌──────────────┬───────┴───────┬─────────────────┐
//!        │  Partition   │  BoundCursor  │  Recovery file  │
//!        ├──────────────┼───────────────┼─────────────────┤
//!        │ make_paths   │ lower..=upper │ start,end (hex) │
//!        │ make_ranges  │ done latch    │ temp + rename   │
//!        └──────────────┴───────────────┴─────────────────┘
//!                               │
//!                   Cursor trait (advance / path)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types
pub mod types;

/// Nibble paths, ranges and rewind
pub mod path;

/// Trie cursor capability, bounded cursor and in-memory trie
pub mod cursor;

/// Path range partitioning
pub mod partition;

/// Cursor tracking and recovery
pub mod tracker;

/// Tracker and traversal configuration
pub mod config;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod test_utils;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_config, load_config_from_str, TrackerConfig, WalkConfig};
pub use cursor::{BoundCursor, Cursor, MemoryCursor, MemoryTrie};
pub use partition::{make_paths, make_ranges, subtrie_cursors};
pub use path::{rewind, PathRange, MAX_PATH_LEN};
pub use tracker::{Checkpoint, RecoveryRecord, TrackedCursor, Tracker};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
