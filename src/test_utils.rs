//! Shared fixtures for unit tests

use crate::cursor::{Cursor, MemoryTrie};

/// Deterministic, distinct 4-byte leaf keys
pub(crate) fn fixture_keys(n: u32) -> Vec<[u8; 4]> {
    (0..n)
        .map(|i| i.wrapping_mul(0x9E37_79B9).to_be_bytes())
        .collect()
}

/// A trie of 512 leaves, dense enough that the root and first level are full branches
pub(crate) fn fixture_trie() -> MemoryTrie {
    MemoryTrie::from_keys(&fixture_keys(512)).expect("fixture keys are well-formed")
}

/// Drive a cursor to exhaustion, collecting every path it yields
pub(crate) fn collect_paths<C: Cursor>(cursor: &mut C) -> Vec<Vec<u8>> {
    let mut paths = Vec::new();
    while cursor.advance(true) {
        paths.push(cursor.path().to_vec());
    }
    paths
}
