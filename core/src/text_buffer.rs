//! Document buffer with cursor and selection tracking.
//!
//! The buffer stores the composed text and a cursor/selection expressed in
//! UTF-16 code units, the unit host text widgets use for their selection
//! ranges. Every public operation is total: offsets coming from the host are
//! clamped (and snapped onto scalar boundaries) instead of being rejected, so
//! the buffer can never be driven into an invalid state.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::units::{byte_to_unit, snap_unit, unit_len, unit_to_byte};

/// Text buffer tracking content, cursor and selection.
///
/// Invariants: `cursor <= len()` and `cursor + selection_len <= len()`, both
/// measured in UTF-16 units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    cursor: usize,        // UTF-16 offset, not byte offset
    selection_len: usize, // UTF-16 units
}

impl TextBuffer {
    /// Create a new empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding `text` with the cursor at the start.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
            selection_len: 0,
        }
    }

    /// Get the buffer content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the cursor position (UTF-16 offset).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Get the selection length (UTF-16 units).
    pub fn selection_len(&self) -> usize {
        self.selection_len
    }

    /// The active selection as a UTF-16 range starting at the cursor.
    pub fn selection(&self) -> Range<usize> {
        self.cursor..self.cursor + self.selection_len
    }

    /// Length of the content in UTF-16 units.
    pub fn len(&self) -> usize {
        unit_len(&self.text)
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Clear the content and reset the cursor.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.selection_len = 0;
    }

    /// Replace the whole content, keeping the cursor and selection where they
    /// were as far as the new content allows.
    pub fn reset(&mut self, text: impl Into<String>) {
        self.text = text.into();
        let (cursor, len) = (self.cursor, self.selection_len);
        self.set_selection(cursor, len);
    }

    /// Set cursor and selection from host-supplied offsets.
    ///
    /// The cursor is clamped to `[0, len]` and the selection to the remaining
    /// length; both ends are snapped down onto scalar boundaries.
    pub fn set_selection(&mut self, cursor: usize, selection_len: usize) {
        let start = snap_unit(&self.text, cursor);
        let end = snap_unit(&self.text, start.saturating_add(selection_len));
        self.cursor = start;
        self.selection_len = end - start;
    }

    /// Place the cursor, collapsing any selection.
    pub fn set_cursor(&mut self, pos: usize) {
        self.set_selection(pos, 0);
    }

    /// Replace the selection (or insert at the cursor when nothing is
    /// selected) with `s`. The cursor ends up right after the inserted text.
    pub fn insert(&mut self, s: &str) {
        let range = self.selection();
        self.replace_units(range, s);
    }

    /// Insert a single character.
    pub fn insert_char(&mut self, ch: char) {
        let mut tmp = [0u8; 4];
        self.insert(ch.encode_utf8(&mut tmp));
    }

    /// Delete the active selection.
    /// Returns true if anything was removed.
    pub fn delete_selection(&mut self) -> bool {
        if self.selection_len == 0 {
            return false;
        }
        let range = self.selection();
        self.replace_units(range, "");
        true
    }

    /// Replace a UTF-16 range with `s`, leaving the cursor after the
    /// replacement and the selection empty.
    pub fn replace_units(&mut self, range: Range<usize>, s: &str) {
        let start = unit_to_byte(&self.text, range.start);
        let end = unit_to_byte(&self.text, range.end.max(range.start));
        self.replace_bytes(start..end, s);
    }

    /// Byte-level splice used by the deletion engine once it has located a
    /// cluster. `range` must lie on char boundaries.
    pub(crate) fn replace_bytes(&mut self, range: Range<usize>, s: &str) {
        let start = range.start.min(self.text.len());
        let end = range.end.clamp(start, self.text.len());
        tracing::trace!(start, end, inserted = s, "buffer splice");
        self.text.replace_range(start..end, s);
        self.cursor = byte_to_unit(&self.text, start + s.len());
        self.selection_len = 0;
    }

    /// Byte offset of the cursor.
    pub(crate) fn cursor_byte(&self) -> usize {
        unit_to_byte(&self.text, self.cursor)
    }

    /// Move the cursor one grapheme cluster to the left.
    /// A non-empty selection collapses to its start instead.
    /// Returns true if the cursor moved or the selection collapsed.
    pub fn move_left(&mut self) -> bool {
        if self.selection_len > 0 {
            self.selection_len = 0;
            return true;
        }
        let byte = self.cursor_byte();
        if byte == 0 {
            return false;
        }
        let prev = self.text[..byte]
            .grapheme_indices(true)
            .next_back()
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        self.cursor = byte_to_unit(&self.text, prev);
        true
    }

    /// Move the cursor one grapheme cluster to the right.
    /// A non-empty selection collapses to its end instead.
    /// Returns true if the cursor moved or the selection collapsed.
    pub fn move_right(&mut self) -> bool {
        if self.selection_len > 0 {
            self.cursor += self.selection_len;
            self.selection_len = 0;
            return true;
        }
        let byte = self.cursor_byte();
        if byte >= self.text.len() {
            return false;
        }
        let next = self.text[byte..]
            .graphemes(true)
            .next()
            .map(|g| byte + g.len())
            .unwrap_or(self.text.len());
        self.cursor = byte_to_unit(&self.text, next);
        true
    }

    /// Move the cursor to the beginning.
    pub fn move_to_start(&mut self) {
        self.set_cursor(0);
    }

    /// Move the cursor to the end.
    pub fn move_to_end(&mut self) {
        let len = self.len();
        self.set_cursor(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_into_empty_buffer() {
        let mut buf = TextBuffer::new();
        buf.insert("नम");
        assert_eq!(buf.text(), "नम");
        assert_eq!(buf.cursor(), 2);
        assert_eq!(buf.selection_len(), 0);
    }

    #[test]
    fn insert_replaces_selection() {
        let mut buf = TextBuffer::from_text("namaste");
        buf.set_selection(0, 7);
        buf.insert("s");
        assert_eq!(buf.text(), "s");
        assert_eq!(buf.cursor(), 1);
        assert_eq!(buf.selection_len(), 0);
    }

    #[test]
    fn insert_in_the_middle() {
        let mut buf = TextBuffer::from_text("ac");
        buf.set_cursor(1);
        buf.insert("b");
        assert_eq!(buf.text(), "abc");
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn cursor_counts_utf16_units() {
        let mut buf = TextBuffer::new();
        buf.insert("😀");
        assert_eq!(buf.cursor(), 2);
        buf.insert_char('x');
        assert_eq!(buf.cursor(), 3);
    }

    #[test]
    fn selection_is_clamped() {
        let mut buf = TextBuffer::from_text("abc");
        buf.set_selection(10, 4);
        assert_eq!(buf.cursor(), 3);
        assert_eq!(buf.selection_len(), 0);

        buf.set_selection(1, 99);
        assert_eq!(buf.selection(), 1..3);
    }

    #[test]
    fn offsets_inside_surrogate_pair_snap_down() {
        let mut buf = TextBuffer::from_text("😀");
        buf.set_cursor(1);
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn delete_selection_collapses_to_start() {
        let mut buf = TextBuffer::from_text("hello world");
        buf.set_selection(5, 6);
        assert!(buf.delete_selection());
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.cursor(), 5);
        assert!(!buf.delete_selection());
    }

    #[test]
    fn reset_reclamps_cursor() {
        let mut buf = TextBuffer::from_text("hello");
        buf.move_to_end();
        buf.reset("hi");
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn cursor_moves_by_grapheme() {
        // क + ि renders as a single cluster.
        let mut buf = TextBuffer::from_text("कि");
        buf.move_to_end();
        assert!(buf.move_left());
        assert_eq!(buf.cursor(), 0);
        assert!(!buf.move_left());
        assert!(buf.move_right());
        assert_eq!(buf.cursor(), 2);
        assert!(!buf.move_right());
    }

    #[test]
    fn move_collapses_selection() {
        let mut buf = TextBuffer::from_text("abcd");
        buf.set_selection(1, 2);
        assert!(buf.move_right());
        assert_eq!(buf.cursor(), 3);
        buf.set_selection(1, 2);
        assert!(buf.move_left());
        assert_eq!(buf.cursor(), 1);
    }
}
