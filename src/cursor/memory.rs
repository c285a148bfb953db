//! In-memory trie node set
//!
//! Models the node layout of a Merkle-Patricia trie closely enough to exercise
//! partitioning and recovery: a root, one branch node wherever two keys
//! diverge, and a child node one nibble below each branch.

use super::types::Cursor;
use crate::error::{Error, Result};
use crate::path::{key_to_nibbles, validate_nibbles};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Sorted set of trie node paths, cheap to clone and share between cursors
#[derive(Debug, Clone)]
pub struct MemoryTrie {
    nodes: Arc<[Vec<u8>]>,
}

impl MemoryTrie {
    /// Build from explicit node paths (nibble sequences, any order)
    pub fn from_paths<I>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let mut set = BTreeSet::new();
        for path in paths {
            validate_nibbles(&path)?;
            set.insert(path);
        }
        Ok(Self::from_set(set))
    }

    /// Build the node layout of a trie holding the given leaf keys
    ///
    /// Keys are packed bytes and must all have the same length.
    pub fn from_keys<K: AsRef<[u8]>>(keys: &[K]) -> Result<Self> {
        let mut leaves: Vec<Vec<u8>> = keys.iter().map(|k| key_to_nibbles(k.as_ref())).collect();
        leaves.sort();
        leaves.dedup();

        if let Some(first) = leaves.first() {
            let len = first.len();
            if leaves.iter().any(|l| l.len() != len) {
                return Err(Error::config("All trie keys must have the same length"));
            }
        }

        let mut set = BTreeSet::new();
        if !leaves.is_empty() {
            set.insert(Vec::new());
        }
        // every branch point shows up as the common prefix of some adjacent pair,
        // and each of its children as the next nibble on either side of that pair
        for pair in leaves.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let shared = a.iter().zip(b).take_while(|(x, y)| x == y).count();
            set.insert(a[..shared].to_vec());
            set.insert(a[..=shared].to_vec());
            set.insert(b[..=shared].to_vec());
        }

        Ok(Self::from_set(set))
    }

    fn from_set(set: BTreeSet<Vec<u8>>) -> Self {
        Self {
            nodes: set.into_iter().collect::<Vec<_>>().into(),
        }
    }

    /// All node paths in pre-order
    pub fn node_paths(&self) -> &[Vec<u8>] {
        &self.nodes
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the trie has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Cursor yielding every node whose path is at or after `start_key`
    pub fn cursor(&self, start_key: &[u8]) -> MemoryCursor {
        MemoryCursor {
            nodes: Arc::clone(&self.nodes),
            start: key_to_nibbles(start_key),
            pos: None,
            exhausted: false,
        }
    }
}

/// Cursor over a [`MemoryTrie`]
#[derive(Debug, Clone)]
pub struct MemoryCursor {
    nodes: Arc<[Vec<u8>]>,
    start: Vec<u8>,
    pos: Option<usize>,
    exhausted: bool,
}

impl Cursor for MemoryCursor {
    fn advance(&mut self, descend: bool) -> bool {
        if self.exhausted {
            return false;
        }

        let next = match self.pos {
            None => self
                .nodes
                .partition_point(|p| p.as_slice() < self.start.as_slice()),
            Some(i) if descend => i + 1,
            Some(i) => {
                let current = &self.nodes[i];
                i + 1 + self.nodes[i + 1..].partition_point(|p| p.starts_with(current))
            }
        };

        if next < self.nodes.len() {
            self.pos = Some(next);
            true
        } else {
            self.pos = None;
            self.exhausted = true;
            false
        }
    }

    fn path(&self) -> &[u8] {
        match self.pos {
            Some(i) => &self.nodes[i],
            None => &[],
        }
    }
}
