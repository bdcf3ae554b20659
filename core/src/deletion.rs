//! Script-aware backspace.
//!
//! One call removes one "backspace unit" ending at the cursor: the selection
//! if there is one, otherwise either a single trailing combining mark (for
//! scripts composed mark-by-mark) or the whole preceding grapheme cluster.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::script::{Script, ScriptClass};
use crate::text_buffer::TextBuffer;

/// What a backspace removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Buffer was already at the start; nothing changed.
    Nothing,
    /// The active selection was removed.
    Selection,
    /// A single trailing combining mark was stripped from a cluster.
    Mark,
    /// A whole grapheme cluster was removed.
    Cluster,
}

impl DeleteOutcome {
    pub fn changed(self) -> bool {
        self != DeleteOutcome::Nothing
    }
}

/// Delete one backspace unit before the cursor using the strategy of `script`.
pub fn delete_backward(buffer: &mut TextBuffer, script: Script) -> DeleteOutcome {
    if buffer.delete_selection() {
        return DeleteOutcome::Selection;
    }
    if buffer.cursor() == 0 {
        return DeleteOutcome::Nothing;
    }

    let Some(cluster) = cluster_before(buffer.text(), buffer.cursor_byte()) else {
        return DeleteOutcome::Nothing;
    };

    match script.class() {
        ScriptClass::SimpleGraphemeFamily => {
            buffer.replace_bytes(cluster, "");
            DeleteOutcome::Cluster
        }
        ScriptClass::CombiningMarkFamily => strip_trailing_mark(buffer, cluster, script),
    }
}

/// Strip the last mark of the cluster when it has one, else remove the cluster.
fn strip_trailing_mark(buffer: &mut TextBuffer, cluster: Range<usize>, script: Script) -> DeleteOutcome {
    let text = &buffer.text()[cluster.clone()];
    let mut chars = text.char_indices();
    let last = chars.next_back();
    // A lone mark (no base before it) goes as a whole cluster.
    let has_base = chars.next().is_some();

    match last {
        Some((offset, ch)) if has_base && script.is_combining_mark(ch) => {
            let mark = cluster.start + offset..cluster.end;
            tracing::trace!(mark = %ch.escape_unicode(), "stripping combining mark");
            buffer.replace_bytes(mark, "");
            DeleteOutcome::Mark
        }
        _ => {
            buffer.replace_bytes(cluster, "");
            DeleteOutcome::Cluster
        }
    }
}

/// Byte range of the grapheme cluster containing the scalar just before `byte`.
///
/// When `byte` falls inside a cluster (a host can place the cursor there) the
/// whole cluster is returned, including the part after `byte`.
fn cluster_before(text: &str, byte: usize) -> Option<Range<usize>> {
    if byte == 0 {
        return None;
    }
    text.grapheme_indices(true)
        .map(|(idx, g)| idx..idx + g.len())
        .find(|range| range.start < byte && byte <= range.end)
}
