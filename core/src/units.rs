//! Encoded-offset helpers.
//!
//! Host text surfaces address text in UTF-16 code units, while Rust strings
//! are indexed by UTF-8 byte. Every conversion between the two goes through
//! this module so that the rest of the crate never slices a `String` with a
//! host-supplied number.

/// Length of `text` in UTF-16 code units.
pub fn unit_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Convert a UTF-16 offset into a byte offset.
///
/// Offsets past the end clamp to `text.len()`. An offset that falls between
/// the two halves of a surrogate pair snaps down to the start of that scalar.
pub fn unit_to_byte(text: &str, unit: usize) -> usize {
    let mut units = 0;
    for (idx, ch) in text.char_indices() {
        let next = units + ch.len_utf16();
        if next > unit {
            return idx;
        }
        units = next;
    }
    text.len()
}

/// Convert a byte offset into a UTF-16 offset.
///
/// `byte` is clamped to the text length and rounded down to a char boundary.
pub fn byte_to_unit(text: &str, byte: usize) -> usize {
    let mut byte = byte.min(text.len());
    while !text.is_char_boundary(byte) {
        byte -= 1;
    }
    unit_len(&text[..byte])
}

/// Snap a UTF-16 offset onto the nearest scalar boundary at or below it,
/// clamped to the text length.
pub fn snap_unit(text: &str, unit: usize) -> usize {
    byte_to_unit(text, unit_to_byte(text, unit))
}
