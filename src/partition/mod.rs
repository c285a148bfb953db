//! Partitioning of the trie keyspace
//!
//! Splits the keyspace (optionally under a prefix) into `nbins` contiguous
//! ranges so independent workers can each drive one bounded cursor.
//!
//! # Overview
//!
//! - `make_paths` - starting path of each bin
//! - `make_ranges` - inclusive `[lower, upper]` range of each bin
//! - `subtrie_cursors` - one `BoundCursor` per bin, seeded at its lower bound
//!
//! Adjacent ranges share their boundary path. If a node sits exactly on an
//! (even-length) boundary, both neighbouring bins yield it; every other node
//! is yielded by exactly one bin.

mod bisect;

pub use bisect::{make_paths, make_ranges, subtrie_cursors};

#[cfg(test)]
mod tests;
