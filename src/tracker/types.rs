//! Tracker types
//!
//! A recovery file holds one `start,end` row per unfinished cursor, both
//! fields hex-encoded nibble paths. An empty `end` means unbounded.

use crate::error::{Error, Result};
use crate::path::{decode_path, encode_path, rewind, PathRange};
use serde::Serialize;
use std::fmt;

/// Identifies one registration with a tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CursorId(pub(crate) u64);

impl fmt::Display for CursorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Saved position and bound of an unfinished cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryRecord {
    /// Path of the node the cursor was on
    pub start: Vec<u8>,
    /// Inclusive upper bound, `None` for unbounded
    pub end: Option<Vec<u8>>,
}

impl RecoveryRecord {
    /// Create a new record
    pub fn new(start: Vec<u8>, end: Option<Vec<u8>>) -> Self {
        Self {
            start,
            end: end.filter(|e| !e.is_empty()),
        }
    }

    /// Encode as a recovery file row (without line terminator)
    pub fn to_row(&self) -> String {
        format!(
            "{},{}",
            encode_path(&self.start),
            self.end.as_deref().map(encode_path).unwrap_or_default()
        )
    }

    /// Parse a recovery file row; `line` is only used for error messages
    pub fn parse_row(line: usize, row: &str) -> Result<Self> {
        let fields: Vec<&str> = row.split(',').collect();
        if fields.len() != 2 {
            return Err(Error::recovery_row(
                line,
                format!("expected 2 fields, found {}", fields.len()),
            ));
        }

        let start = decode_path(fields[0])
            .map_err(|e| Error::recovery_row(line, format!("start path: {e}")))?;
        let end = decode_path(fields[1])
            .map_err(|e| Error::recovery_row(line, format!("end path: {e}")))?;
        Ok(Self::new(start, Some(end)))
    }

    /// Path a restored cursor is seeded at
    ///
    /// Cursors can only be seeded at even-length paths, so an odd start is
    /// rewound to its pre-order predecessor. This may revisit one node but
    /// never skips one.
    pub fn resume_path(&self) -> Vec<u8> {
        if self.start.len() % 2 == 1 {
            rewind(&self.start)
        } else {
            self.start.clone()
        }
    }

    /// Range a restored cursor is confined to
    pub fn resume_range(&self) -> PathRange {
        PathRange::new(self.resume_path(), self.end.clone())
    }
}

/// Summary of a final checkpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Checkpoint {
    /// Cursors written to the recovery file
    pub saved: usize,
    /// Cursors that ran to completion
    pub finished: usize,
}

impl Checkpoint {
    /// Whether the traversal completed with nothing left to resume
    pub fn is_complete(&self) -> bool {
        self.saved == 0
    }
}
