//! Tests for partition module

use super::*;
use crate::cursor::{BoundCursor, Cursor, MemoryCursor, MemoryTrie};
use crate::error::Error;
use crate::path::{MAX_NIBBLE, MAX_PATH_LEN};
use crate::test_utils::{fixture_keys, fixture_trie};
use pretty_assertions::assert_eq;
use test_case::test_case;

/// Drive every bin in order and check the concatenation reproduces `expected`.
///
/// A bin may start with the node its predecessor ended on when that node sits
/// exactly on an even-length boundary; that single repeat is skipped.
fn assert_covers(bins: Vec<BoundCursor<MemoryCursor>>, expected: &[Vec<u8>]) {
    let mut seen: Vec<Vec<u8>> = Vec::new();
    for mut cursor in bins {
        let mut first = true;
        while cursor.advance(true) {
            let path = cursor.path().to_vec();
            let boundary_repeat = first && path.len() % 2 == 0 && seen.last() == Some(&path);
            first = false;
            if !boundary_repeat {
                seen.push(path);
            }
        }
    }
    assert_eq!(seen.as_slice(), expected);
}

// ============================================================================
// make_paths Tests
// ============================================================================

#[test_case(1 ; "one bin")]
#[test_case(2 ; "two bins")]
#[test_case(4 ; "four bins")]
#[test_case(8 ; "eight bins")]
#[test_case(16 ; "sixteen bins")]
#[test_case(32 ; "thirty two bins")]
#[test_case(256 ; "two fifty six bins")]
#[test_case(1024 ; "one thousand twenty four bins")]
fn test_make_paths_count_and_order(nbins: usize) {
    let paths = make_paths(&[], nbins).unwrap();
    assert_eq!(paths.len(), nbins);
    assert!(paths[0].is_empty());
    assert!(paths.windows(2).all(|w| w[0] < w[1]), "paths not ascending");
    assert!(paths.iter().all(|p| p.len() % 2 == 0), "paths must be even");
}

#[test]
fn test_make_paths_values() {
    assert_eq!(make_paths(&[], 1).unwrap(), vec![Vec::<u8>::new()]);
    assert_eq!(make_paths(&[], 2).unwrap(), vec![vec![], vec![8, 0]]);

    let paths = make_paths(&[], 32).unwrap();
    assert_eq!(paths[1], vec![0, 8]);
    assert_eq!(paths[2], vec![1, 0]);
    assert_eq!(paths[31], vec![0xf, 8]);
}

#[test]
fn test_make_paths_with_prefix() {
    assert_eq!(make_paths(&[8], 1).unwrap(), vec![vec![8]]);
    assert_eq!(make_paths(&[8], 2).unwrap(), vec![vec![8], vec![8, 8]]);
    assert_eq!(
        make_paths(&[3, 7], 4).unwrap(),
        vec![vec![3, 7], vec![3, 7, 4, 0], vec![3, 7, 8, 0], vec![3, 7, 0xc, 0]]
    );
}

#[test_case(0 ; "zero")]
#[test_case(3 ; "three")]
#[test_case(6 ; "six")]
#[test_case(100 ; "hundred")]
fn test_make_paths_rejects_non_power_of_two(nbins: usize) {
    let err = make_paths(&[], nbins).unwrap_err();
    assert!(matches!(err, Error::InvalidPartitionCount { .. }));
}

#[test]
fn test_make_paths_rejects_invalid_prefix() {
    assert!(matches!(
        make_paths(&[1, 0x11], 2),
        Err(Error::InvalidNibble { index: 1, .. })
    ));
}

#[test]
fn test_make_paths_too_deep() {
    let prefix = vec![1u8; MAX_PATH_LEN];
    let err = make_paths(&prefix, 2).unwrap_err();
    assert!(matches!(err, Error::PartitionTooDeep { .. }));
    // a single bin never extends the prefix
    assert_eq!(make_paths(&prefix, 1).unwrap(), vec![prefix]);

    let paths = make_paths(&[1u8; MAX_PATH_LEN - 1], 2).unwrap();
    assert_eq!(paths[1].len(), MAX_PATH_LEN);
    assert!(make_paths(&[1u8; MAX_PATH_LEN - 1], 32).is_err());
}

// ============================================================================
// make_ranges Tests
// ============================================================================

#[test]
fn test_make_ranges_are_contiguous() {
    let ranges = make_ranges(&[], 8).unwrap();
    assert_eq!(ranges.len(), 8);
    for pair in ranges.windows(2) {
        assert_eq!(pair[0].upper.as_ref(), Some(&pair[1].lower));
    }
    assert!(ranges[7].upper.is_none());
}

#[test]
fn test_make_ranges_with_prefix_end_at_prefix_limit() {
    let ranges = make_ranges(&[3, 7], 2).unwrap();
    let upper = ranges[1].upper.clone().unwrap();
    assert_eq!(upper.len(), MAX_PATH_LEN);
    assert_eq!(&upper[..2], &[3, 7]);
    assert!(upper[2..].iter().all(|&n| n == MAX_NIBBLE));
}

#[test]
fn test_single_range_without_prefix_is_unbounded() {
    let ranges = make_ranges(&[], 1).unwrap();
    assert_eq!(ranges.len(), 1);
    assert!(ranges[0].lower.is_empty());
    assert!(ranges[0].upper.is_none());
}

// ============================================================================
// Coverage Tests
// ============================================================================

#[test_case(1 ; "one bin")]
#[test_case(2 ; "two bins")]
#[test_case(4 ; "four bins")]
#[test_case(8 ; "eight bins")]
#[test_case(16 ; "sixteen bins")]
#[test_case(32 ; "thirty two bins")]
#[test_case(256 ; "two fifty six bins")]
fn test_trie_is_covered(nbins: usize) {
    let trie = fixture_trie();
    let bins = subtrie_cursors(|key| trie.cursor(key), &[], nbins).unwrap();
    assert_eq!(bins.len(), nbins);
    assert_covers(bins, trie.node_paths());
}

#[test_case(1 ; "one bin")]
#[test_case(4 ; "four bins")]
#[test_case(32 ; "thirty two bins")]
fn test_prefixed_subtrie_is_covered(nbins: usize) {
    let mut keys: Vec<[u8; 3]> = fixture_keys(256)
        .iter()
        .map(|k| [0x37, k[0], k[1]])
        .collect();
    keys.extend([[0x12, 0, 0], [0x36, 0xff, 0xff], [0x38, 0, 0], [0x99, 1, 2]]);
    let trie = MemoryTrie::from_keys(&keys).unwrap();

    let prefix = [3u8, 7];
    let expected: Vec<Vec<u8>> = trie
        .node_paths()
        .iter()
        .filter(|p| p.starts_with(&prefix))
        .cloned()
        .collect();
    assert!(expected.len() > 256);

    let bins = subtrie_cursors(|key| trie.cursor(key), &prefix, nbins).unwrap();
    assert_covers(bins, &expected);
}

#[test]
fn test_subtrie_cursors_seed_at_lower_bound() {
    let trie = fixture_trie();
    let mut seeds = Vec::new();
    let bins = subtrie_cursors(
        |key| {
            seeds.push(key.to_vec());
            trie.cursor(key)
        },
        &[],
        4,
    )
    .unwrap();

    assert_eq!(seeds, vec![vec![], vec![0x40], vec![0x80], vec![0xc0]]);
    assert_eq!(bins[2].range().lower, vec![8, 0]);
    assert_eq!(bins[2].range().upper, Some(vec![0xc, 0]));
}

#[test]
fn test_subtrie_cursors_reject_odd_prefix() {
    let trie = fixture_trie();
    let err = subtrie_cursors(|key| trie.cursor(key), &[8], 2).unwrap_err();
    assert!(matches!(err, Error::OddPathLength { len: 1 }));
}
