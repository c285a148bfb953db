//! Conversions between nibble paths, packed keys and text

use crate::error::{Error, Result};

/// Length in nibbles of a full 32-byte trie key
pub const MAX_PATH_LEN: usize = 64;

/// Largest value a single nibble can take
pub const MAX_NIBBLE: u8 = 0x0f;

/// Check that every element of `path` is a nibble
pub fn validate_nibbles(path: &[u8]) -> Result<()> {
    match path.iter().position(|&n| n > MAX_NIBBLE) {
        Some(index) => Err(Error::InvalidNibble {
            index,
            value: path[index],
        }),
        None => Ok(()),
    }
}

/// Expand packed key bytes into a nibble path (high nibble first)
pub fn key_to_nibbles(key: &[u8]) -> Vec<u8> {
    let mut path = Vec::with_capacity(key.len() * 2);
    for byte in key {
        path.push(byte >> 4);
        path.push(byte & MAX_NIBBLE);
    }
    path
}

/// Pack a nibble path into key bytes
///
/// Cursor construction works on whole bytes, so the path must have even length.
pub fn nibbles_to_key(path: &[u8]) -> Result<Vec<u8>> {
    if path.len() % 2 != 0 {
        return Err(Error::OddPathLength { len: path.len() });
    }
    validate_nibbles(path)?;
    Ok(path
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

/// Hex-encode a nibble path as stored in the recovery file (two chars per nibble)
pub fn encode_path(path: &[u8]) -> String {
    hex::encode(path)
}

/// Decode a recovery file field back into a nibble path
pub fn decode_path(field: &str) -> Result<Vec<u8>> {
    let path = hex::decode(field).map_err(|e| Error::invalid_hex(field, e.to_string()))?;
    validate_nibbles(&path)?;
    Ok(path)
}

/// Parse a compact nibble string such as `"8a0"` (one hex digit per nibble)
pub fn parse_nibbles(input: &str) -> Result<Vec<u8>> {
    input
        .chars()
        .map(|c| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| Error::invalid_hex(input, format!("'{c}' is not a hex digit")))
        })
        .collect()
}

/// Format a nibble path compactly, one hex digit per nibble
pub fn format_nibbles(path: &[u8]) -> String {
    path.iter()
        .map(|&n| char::from_digit(u32::from(n & MAX_NIBBLE), 16).unwrap_or('?'))
        .collect()
}
