//! Trie node cursors
//!
//! Defines the cursor capability the rest of the crate drives, plus two
//! implementations built on top of it.
//!
//! # Overview
//!
//! - `Cursor` - advance/path contract of a trie node iterator
//! - `BoundCursor` - restricts a cursor to an inclusive upper path
//! - `MemoryTrie` / `MemoryCursor` - in-memory node set for fixtures and the CLI

mod bound;
mod memory;
mod types;

pub use bound::BoundCursor;
pub use memory::{MemoryCursor, MemoryTrie};
pub use types::Cursor;
