//! Flattening a layout into pages ("blocks") of key slots.
//!
//! The letter grid has room for a fixed number of keys. Scripts with more
//! glyphs than that are shown one block at a time and paged with the arrow
//! keys; the Latin keyboard always fits in a single block.

use crate::layout::language_layout;
use crate::script::Language;

/// Key slots in the first letter row.
pub const ROW1_SLOTS: usize = 10;
/// Key slots in the second letter row.
pub const ROW2_SLOTS: usize = 9;
/// Letter slots in the third row of the Latin keyboard (shift and delete take the rest).
pub const ROW3_LATIN_SLOTS: usize = 7;
/// Letter slots in the third row of paged keyboards (two arrows and delete take the rest).
pub const ROW3_PAGED_SLOTS: usize = 5;

/// Block size of the single-block Latin keyboard.
pub const LATIN_BLOCK_SIZE: usize = ROW1_SLOTS + ROW2_SLOTS + ROW3_LATIN_SLOTS;
/// Block size of paged keyboards.
pub const PAGED_BLOCK_SIZE: usize = ROW1_SLOTS + ROW2_SLOTS + ROW3_PAGED_SLOTS;

/// A language's primary glyphs in order, partitioned into fixed-size blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedLayout {
    glyphs: Vec<String>,
    block_size: usize,
    single_block: bool,
}

impl FlattenedLayout {
    /// Create a paged layout over `glyphs`.
    pub fn new(glyphs: Vec<String>, block_size: usize) -> Self {
        Self {
            glyphs,
            block_size: block_size.max(1),
            single_block: false,
        }
    }

    /// Create a layout that always shows its first `block_size` glyphs.
    pub fn single_block(glyphs: Vec<String>, block_size: usize) -> Self {
        Self {
            single_block: true,
            ..Self::new(glyphs, block_size)
        }
    }

    /// Flatten the built-in rows of `language`.
    pub fn for_language(language: Language) -> Self {
        let rows = language_layout(language).rows();
        if language == Language::English {
            // Letter rows only; the bottom row holds action keys.
            let glyphs = rows
                .iter()
                .take(3)
                .flatten()
                .map(|k| k.main.clone())
                .collect();
            return Self::single_block(glyphs, LATIN_BLOCK_SIZE);
        }
        let glyphs = rows.iter().flatten().map(|k| k.main.clone()).collect();
        Self::new(glyphs, PAGED_BLOCK_SIZE)
    }

    /// All primary glyphs in row order.
    pub fn glyphs(&self) -> &[String] {
        &self.glyphs
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of blocks; never less than one.
    pub fn block_count(&self) -> usize {
        if self.single_block {
            return 1;
        }
        self.glyphs.len().div_ceil(self.block_size).max(1)
    }

    /// Glyphs of block `index`, taken modulo the block count.
    pub fn block_at(&self, index: usize) -> &[String] {
        let index = index % self.block_count();
        let start = (index * self.block_size).min(self.glyphs.len());
        let end = (start + self.block_size).min(self.glyphs.len());
        &self.glyphs[start..end]
    }

    /// Next block index in the given direction, wrapping around.
    pub fn advance(&self, index: usize, forward: bool) -> usize {
        let count = self.block_count();
        let index = index % count;
        if forward {
            (index + 1) % count
        } else {
            (index + count - 1) % count
        }
    }
}
