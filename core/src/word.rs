//! Locating the word under the cursor.

use std::ops::Range;

use crate::units::{byte_to_unit, unit_to_byte};

/// A whitespace-delimited run of text and its position in UTF-16 units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSpan {
    pub word: String,
    pub start: usize,
    pub end: usize,
}

impl WordSpan {
    /// Length of the word in UTF-16 units.
    pub fn unit_len(&self) -> usize {
        self.end - self.start
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Find the maximal non-whitespace run containing or touching `cursor`.
///
/// Scans left while the preceding character is not whitespace and right while
/// the character at the position is not whitespace. Returns `None` when both
/// neighbours of the cursor are whitespace (or the buffer edge).
pub fn locate(text: &str, cursor: usize) -> Option<WordSpan> {
    let pivot = unit_to_byte(text, cursor);

    let start = text[..pivot]
        .char_indices()
        .rev()
        .find(|(_, ch)| ch.is_whitespace())
        .map(|(idx, ch)| idx + ch.len_utf8())
        .unwrap_or(0);

    let end = text[pivot..]
        .char_indices()
        .find(|(_, ch)| ch.is_whitespace())
        .map(|(idx, _)| pivot + idx)
        .unwrap_or(text.len());

    if end <= start {
        return None;
    }

    Some(WordSpan {
        word: text[start..end].to_string(),
        start: byte_to_unit(text, start),
        end: byte_to_unit(text, end),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_inside_second_word() {
        let span = locate("नमस्ते दुनिया", 9).unwrap();
        assert_eq!(span.word, "दुनिया");
        assert_eq!(span.start, 7);
        assert_eq!(span.end, 13);
    }

    #[test]
    fn cursor_at_word_end_picks_preceding_word() {
        let span = locate("नमस्ते दुनिया", 6).unwrap();
        assert_eq!(span.word, "नमस्ते");
        assert_eq!(span.range(), 0..6);
    }

    #[test]
    fn cursor_between_spaces_has_no_word() {
        assert_eq!(locate("नमस्ते  दुनिया", 7), None);
        assert_eq!(locate("", 0), None);
        assert_eq!(locate("   ", 1), None);
    }

    #[test]
    fn newlines_delimit_words() {
        let span = locate("hello\nworld", 8).unwrap();
        assert_eq!(span.word, "world");
        assert_eq!(span.start, 6);
    }

    #[test]
    fn offsets_count_utf16_units() {
        let span = locate("😀 abc", 4).unwrap();
        assert_eq!(span.word, "abc");
        assert_eq!(span.range(), 3..6);
        assert_eq!(span.unit_len(), 3);
    }

    #[test]
    fn out_of_range_cursor_is_clamped() {
        let span = locate("abc", 50).unwrap();
        assert_eq!(span.word, "abc");
    }
}
