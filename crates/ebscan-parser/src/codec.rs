//! Hex string codec: encoding, decoding and field extraction.
//!
//! Advertisement payloads travel through this crate as lowercase hex strings
//! (one byte = two characters, no separators). Fields inside those strings are
//! addressed by an offset in hex characters and a length in bytes:
//!
//! ```text
//!  "22 a1b2c3d4e5f60718 ..."
//!   ^  ^
//!   |  offset 2, length 8  -> identifier
//!   offset 0, length 1     -> header byte
//! ```

use crate::{Result, ScanError};

/// Order of significance of the bytes of a multi-byte field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteDirection {
    /// First byte in the string is the most significant one.
    OldYoung,
    /// First byte in the string is the least significant one (little-endian).
    YoungOld,
}

impl ByteDirection {
    /// Reorder field bytes, as they appear in the string, into
    /// most-significant-first order.
    fn to_significance_order(self, mut bytes: Vec<u8>) -> Vec<u8> {
        if self == ByteDirection::YoungOld {
            bytes.reverse();
        }
        bytes
    }
}

/// Encode a byte buffer as a lowercase hex string.
///
/// `{0x01, 0xE2}` becomes `"01e2"`. Byte order is preserved. Returns `None`
/// for `None` input and an empty string for an empty buffer.
pub fn hex_string_from_data(data: Option<&[u8]>) -> Option<String> {
    data.map(hex::encode)
}

/// Strip angle brackets and whitespace, turning a textual data description
/// such as `<01e2 ff00>` into `01e2ff00`.
pub fn remove_angle_brackets_and_spaces(string: &str) -> String {
    string
        .chars()
        .filter(|c| *c != '<' && *c != '>' && !c.is_whitespace())
        .collect()
}

/// Decode a hex string into bytes.
///
/// Upper and lower case digits are accepted, and a surrounding data
/// description (`<01e2 ff00>`) is cleaned up first.
pub fn bytes_from_hex_string(hex_string: &str) -> Result<Vec<u8>> {
    let cleaned = remove_angle_brackets_and_spaces(hex_string);
    Ok(hex::decode(cleaned)?)
}

/// Extract `length` bytes starting at hex-character `offset` and re-encode
/// them most significant byte first.
pub fn string_from_hex(
    hex_string: &str,
    offset: usize,
    length: usize,
    direction: ByteDirection,
) -> Result<String> {
    let bytes = field_bytes(hex_string, offset, length)?;
    Ok(hex::encode(direction.to_significance_order(bytes)))
}

/// Extract `length` bytes starting at hex-character `offset` as an unsigned
/// integer.
///
/// Fields wider than four bytes are rejected with [`ScanError::Overflow`].
pub fn unsigned_from_hex(
    hex_string: &str,
    offset: usize,
    length: usize,
    direction: ByteDirection,
) -> Result<u32> {
    if length > std::mem::size_of::<u32>() {
        return Err(ScanError::Overflow { length });
    }

    let bytes = field_bytes(hex_string, offset, length)?;
    let value = direction
        .to_significance_order(bytes)
        .into_iter()
        .fold(0u32, |acc, byte| (acc << 8) | u32::from(byte));
    Ok(value)
}

/// Slice out and decode a field.
fn field_bytes(hex_string: &str, offset: usize, length: usize) -> Result<Vec<u8>> {
    let out_of_range = || ScanError::OutOfRange {
        offset,
        length,
        available: hex_string.len(),
    };

    let end = length
        .checked_mul(2)
        .and_then(|chars| chars.checked_add(offset))
        .ok_or_else(out_of_range)?;
    if end > hex_string.len() {
        return Err(out_of_range());
    }

    let field = hex_string
        .get(offset..end)
        .ok_or_else(|| ScanError::invalid_hex(format!("field at {} is not ASCII", offset)))?;
    Ok(hex::decode(field)?)
}
