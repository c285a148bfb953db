//! Nibble path utilities
//!
//! Paths identify positions in the trie as sequences of nibbles (one nibble
//! per byte, `0x0..=0xf`). Lexicographic order over paths is the same as the
//! trie's pre-order, so paths double as cursor positions and range bounds.
//!
//! # Overview
//!
//! - Conversion between nibble paths and packed key bytes
//! - Hex encoding used by the recovery file
//! - `PathRange`, the inclusive bounds used by partitions and bound cursors
//! - `rewind` for turning an odd-length resume path into an even-length one

mod codec;
mod range;
mod rewind;

pub use codec::{
    decode_path, encode_path, format_nibbles, key_to_nibbles, nibbles_to_key, parse_nibbles,
    validate_nibbles, MAX_NIBBLE, MAX_PATH_LEN,
};
pub use range::PathRange;
pub use rewind::rewind;
