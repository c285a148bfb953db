//! Pre-order predecessor of a path

use super::codec::{MAX_NIBBLE, MAX_PATH_LEN};

/// Rewind to the path of the previous (pre-order) position.
///
/// If the last nibble is zero it is dropped (`[1 2 0]` => `[1 2]`). Otherwise
/// it is decremented and the path padded with `0xf` out to [`MAX_PATH_LEN`]
/// (`[1]` => `[0 f f f ...]`). Longer paths are padded to the next even
/// length instead, so an odd input always comes back even. The input is not
/// modified.
pub fn rewind(path: &[u8]) -> Vec<u8> {
    let Some((&last, head)) = path.split_last() else {
        return Vec::new();
    };
    if last == 0 {
        return head.to_vec();
    }

    let target = MAX_PATH_LEN.max(path.len() + path.len() % 2);
    let mut rewound = Vec::with_capacity(target);
    rewound.extend_from_slice(head);
    rewound.push(last - 1);
    rewound.resize(target, MAX_NIBBLE);
    rewound
}
