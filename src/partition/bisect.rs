//! Bisection of the keyspace into bins

use crate::cursor::{BoundCursor, Cursor};
use crate::error::{Error, Result};
use crate::path::{nibbles_to_key, validate_nibbles, PathRange, MAX_NIBBLE, MAX_PATH_LEN};
use tracing::debug;

/// Generate the starting paths of `nbins` uniform, contiguous bins under `prefix`
///
/// `nbins` must be a non-zero power of two. The first path is always `prefix`
/// itself; the rest extend it by just enough nibbles to tell the bins apart,
/// keeping the total length even so each path can seed a cursor.
///
/// ```
/// use trie_tracker::partition::make_paths;
///
/// let paths = make_paths(&[], 4).unwrap();
/// assert_eq!(paths, vec![vec![], vec![4, 0], vec![8, 0], vec![0xc, 0]]);
/// ```
pub fn make_paths(prefix: &[u8], nbins: usize) -> Result<Vec<Vec<u8>>> {
    if nbins == 0 || !nbins.is_power_of_two() {
        return Err(Error::InvalidPartitionCount { nbins });
    }
    validate_nibbles(prefix)?;
    if nbins == 1 {
        return Ok(vec![prefix.to_vec()]);
    }

    // one nibble per four bits of bin index, plus one if needed for even alignment
    let mut needed = (nbins.trailing_zeros() as usize).div_ceil(4);
    needed += (prefix.len() + needed) % 2;
    if prefix.len() + needed > MAX_PATH_LEN {
        return Err(Error::PartitionTooDeep {
            prefix_len: prefix.len(),
            nbins,
        });
    }

    // Bins are (offset, width) pairs over the suffix values of `depth` nibbles.
    // All bins share the same width, so when it can no longer be halved every
    // bin is deepened by one nibble at once.
    let mut depth = 0usize;
    let mut bins: Vec<(u128, u128)> = vec![(0, 1)];
    while bins.len() < nbins {
        if bins[0].1 == 1 {
            depth += 1;
            for bin in &mut bins {
                bin.0 <<= 4;
                bin.1 <<= 4;
            }
        }
        bins = bins
            .into_iter()
            .flat_map(|(offset, width)| {
                let half = width / 2;
                [(offset, half), (offset + half, half)]
            })
            .collect();
    }
    if (prefix.len() + depth) % 2 == 1 {
        depth += 1;
        for bin in &mut bins {
            bin.0 <<= 4;
        }
    }

    let paths: Vec<Vec<u8>> = bins
        .iter()
        .map(|&(offset, _)| {
            if offset == 0 {
                return prefix.to_vec();
            }
            let mut path = Vec::with_capacity(prefix.len() + depth);
            path.extend_from_slice(prefix);
            path.extend((0..depth).rev().map(|k| ((offset >> (4 * k)) & 0xf) as u8));
            path
        })
        .collect();

    debug!(nbins, depth, prefix_len = prefix.len(), "Partitioned keyspace");
    Ok(paths)
}

/// Generate the inclusive ranges of `nbins` bins under `prefix`
///
/// Each range ends at the start of the next one. The last range is unbounded
/// without a prefix, and otherwise ends at the greatest path under the prefix.
pub fn make_ranges(prefix: &[u8], nbins: usize) -> Result<Vec<PathRange>> {
    let paths = make_paths(prefix, nbins)?;

    let last_upper = if prefix.is_empty() {
        None
    } else {
        let mut upper = prefix.to_vec();
        upper.resize(MAX_PATH_LEN.max(prefix.len()), MAX_NIBBLE);
        Some(upper)
    };

    let uppers = paths
        .iter()
        .skip(1)
        .cloned()
        .map(Some)
        .chain(std::iter::once(last_upper));

    Ok(paths
        .iter()
        .zip(uppers)
        .map(|(lower, upper)| PathRange::new(lower.clone(), upper))
        .collect())
}

/// Build one bounded cursor per bin, each seeded at its lower bound
///
/// `make_cursor` receives the packed key of the bin's starting path. The
/// prefix must have even length for the first bin to be seedable.
pub fn subtrie_cursors<C, F>(
    mut make_cursor: F,
    prefix: &[u8],
    nbins: usize,
) -> Result<Vec<BoundCursor<C>>>
where
    C: Cursor,
    F: FnMut(&[u8]) -> C,
{
    make_ranges(prefix, nbins)?
        .into_iter()
        .map(|range| {
            let key = nibbles_to_key(&range.lower)?;
            Ok(BoundCursor::new(make_cursor(&key), range))
        })
        .collect()
}
