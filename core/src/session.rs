//! Keyboard session.
//!
//! The `KeyboardSession` owns everything one editing surface needs: the text
//! buffer, the active language, shift and number-mode state, the visible key
//! block and the suggestion pipeline. Hosts feed it key events and
//! direct-manipulation updates and read the buffer, the visible keys and the
//! current suggestions back.
//!
//! Every edit and cursor move goes through [`KeyboardSession::touched`], which
//! notifies the pipeline, so no mutation path can forget to restart it.

use tokio::runtime::Handle;

use crate::deletion::{delete_backward, DeleteOutcome};
use crate::flatten::FlattenedLayout;
use crate::layout::{language_layout, symbol_layout, DELETE_KEY};
use crate::pipeline::SuggestionPipeline;
use crate::script::Language;
use crate::suggestion::{SuggestionResult, SuggestionSource};
use crate::text_buffer::TextBuffer;
use crate::word::locate;
use crate::Config;

/// Key events a host can deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    /// A glyph key (letter, matra, symbol). The label `DEL` acts as Delete.
    Glyph(String),
    /// Backspace
    Delete,
    /// Space bar
    Space,
    /// Enter/Return
    Enter,
    /// Right arrow on paged keyboards
    BlockForward,
    /// Left arrow on paged keyboards
    BlockBack,
    /// Shift key (cycles Off → Shift → CapsLock → Off)
    Shift,
    /// Switch between the letter grid and the symbol pad
    NumberMode(bool),
}

/// Result of processing a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    /// The buffer or cursor changed
    Edited,
    /// Only the visible keys changed (block, shift or number mode)
    LayoutChanged,
    /// Nothing happened (e.g. backspace at the start of the buffer)
    Ignored,
}

/// Shift state of case-sensitive keyboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftState {
    #[default]
    Off,
    Shift,
    CapsLock,
}

impl ShiftState {
    /// Next state in the Off → Shift → CapsLock → Off cycle.
    pub fn next(self) -> Self {
        match self {
            ShiftState::Off => ShiftState::Shift,
            ShiftState::Shift => ShiftState::CapsLock,
            ShiftState::CapsLock => ShiftState::Off,
        }
    }

    pub fn is_on(self) -> bool {
        self != ShiftState::Off
    }
}

/// One editing session of the on-screen keyboard.
pub struct KeyboardSession<S> {
    buffer: TextBuffer,
    language: Language,
    layout: FlattenedLayout,
    block: usize,
    shift: ShiftState,
    number_mode: bool,
    pipeline: SuggestionPipeline<S>,
}

impl<S: SuggestionSource + 'static> KeyboardSession<S> {
    /// Create a session on the current Tokio runtime, starting in the
    /// configured default language.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime; see
    /// [`KeyboardSession::with_handle`].
    pub fn new(source: S, config: &Config) -> Self {
        Self::from_pipeline(SuggestionPipeline::new(source, config), config.language())
    }

    /// Create a session whose lookups run on `runtime`.
    pub fn with_handle(source: S, config: &Config, runtime: Handle) -> Self {
        Self::from_pipeline(
            SuggestionPipeline::with_handle(source, config, runtime),
            config.language(),
        )
    }

    fn from_pipeline(pipeline: SuggestionPipeline<S>, language: Language) -> Self {
        Self {
            buffer: TextBuffer::new(),
            language,
            layout: FlattenedLayout::for_language(language),
            block: 0,
            shift: ShiftState::Off,
            number_mode: false,
            pipeline,
        }
    }

    // ========== State ==========

    /// Get the text buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Get the buffer content.
    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// Get the cursor position (UTF-16 offset).
    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn shift(&self) -> ShiftState {
        self.shift
    }

    pub fn is_number_mode(&self) -> bool {
        self.number_mode
    }

    /// Index of the visible block.
    pub fn block_index(&self) -> usize {
        self.block
    }

    /// Get the flattened layout of the active language.
    pub fn layout(&self) -> &FlattenedLayout {
        &self.layout
    }

    pub fn pipeline(&self) -> &SuggestionPipeline<S> {
        &self.pipeline
    }

    /// The suggestions currently on display.
    pub fn suggestions(&self) -> SuggestionResult {
        self.pipeline.current_suggestions()
    }

    // ========== Keys ==========

    /// Process a key event.
    pub fn process_key(&mut self, event: KeyEvent) -> KeyResult {
        match event {
            KeyEvent::Glyph(label) if label == DELETE_KEY => self.delete(),
            KeyEvent::Glyph(label) => {
                let glyph = self.apply_case(&label);
                self.insert(&glyph);
                KeyResult::Edited
            }
            KeyEvent::Delete => self.delete(),
            KeyEvent::Space => {
                self.insert(" ");
                KeyResult::Edited
            }
            KeyEvent::Enter => {
                self.insert("\n");
                KeyResult::Edited
            }
            KeyEvent::BlockForward => self.page(true),
            KeyEvent::BlockBack => self.page(false),
            KeyEvent::Shift => {
                if !self.language.has_case() {
                    return KeyResult::Ignored;
                }
                self.shift = self.shift.next();
                tracing::trace!(shift = ?self.shift, "shift toggled");
                KeyResult::LayoutChanged
            }
            KeyEvent::NumberMode(on) => {
                if self.number_mode == on {
                    return KeyResult::Ignored;
                }
                self.number_mode = on;
                KeyResult::LayoutChanged
            }
        }
    }

    /// Glyphs the key grid should show right now.
    ///
    /// The symbol pad in number mode; otherwise the active block, uppercased
    /// while shift is on.
    pub fn visible_block(&self) -> Vec<String> {
        if self.number_mode {
            return symbol_layout()
                .rows()
                .iter()
                .flatten()
                .map(|k| k.main.clone())
                .collect();
        }
        self.layout
            .block_at(self.block)
            .iter()
            .map(|g| self.apply_case(g))
            .collect()
    }

    /// Long-press variants of a key in the active language.
    pub fn popup_variants(&self, main: &str) -> &[String] {
        if self.number_mode {
            return symbol_layout().popup_variants(main);
        }
        language_layout(self.language).popup_variants(&main.to_lowercase())
    }

    /// Switch language. Resets the block index and the shift state, and
    /// restarts the suggestion lookup for the new language.
    pub fn set_language(&mut self, language: Language) {
        if language == self.language {
            return;
        }
        tracing::debug!(from = %self.language, to = %language, "switching language");
        self.language = language;
        self.layout = FlattenedLayout::for_language(language);
        self.block = 0;
        self.shift = ShiftState::Off;
        // Lookups are keyed on the language; restart for the new one.
        self.touched();
    }

    fn page(&mut self, forward: bool) -> KeyResult {
        let next = self.layout.advance(self.block, forward);
        if next == self.block {
            return KeyResult::Ignored;
        }
        self.block = next;
        KeyResult::LayoutChanged
    }

    fn apply_case(&self, glyph: &str) -> String {
        if self.language.has_case() && self.shift.is_on() {
            glyph.to_uppercase()
        } else {
            glyph.to_string()
        }
    }

    // ========== Editing ==========

    /// Insert text at the cursor, replacing any selection.
    pub fn insert(&mut self, s: &str) {
        self.buffer.insert(s);
        self.touched();
    }

    /// One backspace.
    pub fn delete(&mut self) -> KeyResult {
        match delete_backward(&mut self.buffer, self.language.script()) {
            DeleteOutcome::Nothing => KeyResult::Ignored,
            _ => {
                self.touched();
                KeyResult::Edited
            }
        }
    }

    /// Cursor/selection update from the host (clamped).
    pub fn set_selection(&mut self, cursor: usize, selection_len: usize) {
        self.buffer.set_selection(cursor, selection_len);
        self.touched();
    }

    /// Replace the whole content, e.g. when the host field is reassigned.
    pub fn reset_text(&mut self, text: &str) {
        self.buffer.reset(text);
        self.touched();
    }

    /// Move the cursor one grapheme to the left.
    pub fn move_left(&mut self) -> bool {
        let moved = self.buffer.move_left();
        if moved {
            self.touched();
        }
        moved
    }

    /// Move the cursor one grapheme to the right.
    pub fn move_right(&mut self) -> bool {
        let moved = self.buffer.move_right();
        if moved {
            self.touched();
        }
        moved
    }

    /// Replace the word around the cursor with `candidate` and a trailing
    /// space. With no word under the cursor the candidate is inserted at it.
    pub fn accept_suggestion(&mut self, candidate: &str) {
        let replacement = format!("{candidate} ");
        match locate(self.buffer.text(), self.buffer.cursor()) {
            Some(span) => self.buffer.replace_units(span.range(), &replacement),
            None => self.buffer.insert(&replacement),
        }
        self.pipeline.clear();
        self.touched();
    }

    /// Accept the `index`-th displayed suggestion.
    /// Returns false when there is no such suggestion.
    pub fn accept_index(&mut self, index: usize) -> bool {
        let current = self.pipeline.current_suggestions();
        match current.words.get(index) {
            Some(word) => {
                let word = word.clone();
                self.accept_suggestion(&word);
                true
            }
            None => false,
        }
    }

    /// Cancel outstanding lookups.
    pub fn shutdown(&mut self) {
        self.pipeline.shutdown();
    }

    fn touched(&mut self) {
        self.pipeline
            .on_mutation(self.buffer.text(), self.buffer.cursor(), self.language);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggestion::LookupError;
    use async_trait::async_trait;

    struct Empty;

    #[async_trait]
    impl SuggestionSource for Empty {
        async fn fetch_suggestions(
            &self,
            _word: &str,
            _language: Language,
        ) -> Result<Vec<String>, LookupError> {
            Ok(Vec::new())
        }
    }

    fn session(code: &str) -> KeyboardSession<Empty> {
        let mut config = Config::default();
        config.set_language(code);
        KeyboardSession::new(Empty, &config)
    }

    #[tokio::test]
    async fn glyphs_insert_and_bump_generation() {
        let mut s = session("hi");
        assert_eq!(s.process_key(KeyEvent::Glyph("न".into())), KeyResult::Edited);
        assert_eq!(s.process_key(KeyEvent::Glyph("म".into())), KeyResult::Edited);
        assert_eq!(s.text(), "नम");
        assert_eq!(s.cursor(), 2);
        assert_eq!(s.pipeline().generation(), 2);
    }

    #[tokio::test]
    async fn del_label_deletes() {
        let mut s = session("ta");
        s.insert("கி");
        assert_eq!(s.process_key(KeyEvent::Glyph(DELETE_KEY.into())), KeyResult::Edited);
        assert_eq!(s.text(), "");
        assert_eq!(s.process_key(KeyEvent::Delete), KeyResult::Ignored);
    }

    #[tokio::test]
    async fn devanagari_backspace_strips_matra() {
        let mut s = session("hi");
        s.insert("कि");
        s.process_key(KeyEvent::Delete);
        assert_eq!(s.text(), "क");
    }

    #[tokio::test]
    async fn shift_cycles_and_uppercases() {
        let mut s = session("en");
        assert_eq!(s.process_key(KeyEvent::Shift), KeyResult::LayoutChanged);
        assert_eq!(s.shift(), ShiftState::Shift);
        s.process_key(KeyEvent::Glyph("a".into()));
        s.process_key(KeyEvent::Glyph("b".into()));
        assert_eq!(s.text(), "AB");
        assert_eq!(s.visible_block()[0], "Q");

        s.process_key(KeyEvent::Shift);
        assert_eq!(s.shift(), ShiftState::CapsLock);
        s.process_key(KeyEvent::Shift);
        assert_eq!(s.shift(), ShiftState::Off);
        s.process_key(KeyEvent::Glyph("c".into()));
        assert_eq!(s.text(), "ABc");
    }

    #[tokio::test]
    async fn shift_is_ignored_without_case() {
        let mut s = session("hi");
        assert_eq!(s.process_key(KeyEvent::Shift), KeyResult::Ignored);
        assert_eq!(s.shift(), ShiftState::Off);
    }

    #[tokio::test]
    async fn paging_wraps_and_language_switch_resets() {
        let mut s = session("hi");
        assert_eq!(s.layout().block_count(), 3);
        s.process_key(KeyEvent::BlockBack);
        assert_eq!(s.block_index(), 2);
        s.process_key(KeyEvent::BlockForward);
        assert_eq!(s.block_index(), 0);
        s.process_key(KeyEvent::BlockForward);
        assert_eq!(s.block_index(), 1);

        s.set_language(Language::English);
        assert_eq!(s.block_index(), 0);
        assert_eq!(s.visible_block().len(), 26);
        assert_eq!(s.process_key(KeyEvent::BlockForward), KeyResult::Ignored);
    }

    #[tokio::test]
    async fn number_mode_shows_symbols() {
        let mut s = session("en");
        assert_eq!(s.process_key(KeyEvent::NumberMode(true)), KeyResult::LayoutChanged);
        assert_eq!(s.visible_block()[0], "1");
        assert_eq!(s.process_key(KeyEvent::NumberMode(true)), KeyResult::Ignored);
        s.process_key(KeyEvent::NumberMode(false));
        assert_eq!(s.visible_block()[0], "q");
    }

    #[tokio::test]
    async fn accept_replaces_word_under_cursor() {
        let mut s = session("en");
        s.insert("say namas");
        s.accept_suggestion("namaste");
        assert_eq!(s.text(), "say namaste ");
        assert_eq!(s.cursor(), 12);
        assert!(s.suggestions().is_empty());
    }

    #[tokio::test]
    async fn accept_without_word_inserts() {
        let mut s = session("en");
        s.insert("hi ");
        s.accept_suggestion("there");
        assert_eq!(s.text(), "hi there ");
    }

    #[tokio::test]
    async fn accept_index_out_of_range() {
        let mut s = session("en");
        assert!(!s.accept_index(0));
        assert_eq!(s.text(), "");
    }

    #[tokio::test]
    async fn selection_from_host_is_clamped() {
        let mut s = session("en");
        s.insert("hello");
        s.set_selection(3, 100);
        assert_eq!(s.buffer().selection(), 3..5);
        s.insert("p");
        assert_eq!(s.text(), "help");
    }

    #[tokio::test]
    async fn popup_variants_follow_language() {
        let s = session("en");
        assert!(s.popup_variants("e").contains(&"É".to_string()));
        assert!(s.popup_variants("E").contains(&"É".to_string()));
        assert!(s.popup_variants("z").is_empty());
    }

    /// Answers `<word>-<language>` after a fixed network delay.
    struct Tagged;

    #[async_trait]
    impl SuggestionSource for Tagged {
        async fn fetch_suggestions(
            &self,
            word: &str,
            language: Language,
        ) -> Result<Vec<String>, LookupError> {
            tokio::time::sleep(std::time::Duration::from_millis(300)).await;
            Ok(vec![format!("{word}-{language}")])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn language_switch_restarts_lookup() {
        let mut s = KeyboardSession::new(Tagged, &Config::default());
        s.insert("hello");
        // Debounce has elapsed; the English lookup is in flight.
        tokio::time::sleep(std::time::Duration::from_millis(160)).await;
        let before = s.pipeline().generation();

        s.set_language(Language::Hindi);
        assert_eq!(s.pipeline().generation(), before + 1);

        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        assert_eq!(s.language(), Language::Hindi);
        assert_eq!(s.suggestions().words, vec!["hello-hi".to_string()]);
    }

    #[tokio::test]
    async fn same_language_is_not_a_mutation() {
        let mut s = session("en");
        s.set_language(Language::English);
        assert_eq!(s.pipeline().generation(), 0);
    }
}
