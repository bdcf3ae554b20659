//! End-to-end typing through `KeyboardSession` with an offline lexicon.

use std::time::Duration;

use libindic_core::{
    Config, KeyEvent, KeyResult, KeyboardSession, Language, Lexicon, ScriptClass,
};
use tokio::time::sleep;

const WORDS: &str = "नमस्ते\t100\nनमक\t40\nनमन\t10\nnamaste\t50\nnamak\t20\n";

fn session(code: &str) -> KeyboardSession<Lexicon> {
    let lexicon = Lexicon::from_word_list(WORDS).unwrap();
    let mut config = Config::default();
    config.set_language(code);
    KeyboardSession::new(lexicon, &config)
}

async fn settle() {
    sleep(Duration::from_millis(200)).await;
}

#[tokio::test(start_paused = true)]
async fn type_delete_and_replace_selection() {
    let mut s = session("hi");
    assert_eq!(s.language().script_class(), ScriptClass::CombiningMarkFamily);

    s.insert("नम");
    assert_eq!(s.cursor(), 2);

    // म carries no mark, so the whole cluster goes.
    assert_eq!(s.process_key(KeyEvent::Delete), KeyResult::Edited);
    assert_eq!(s.text(), "न");
    assert_eq!(s.cursor(), 1);

    s.reset_text("namaste");
    s.set_selection(0, 7);
    s.insert("s");
    assert_eq!(s.text(), "s");
    assert_eq!(s.cursor(), 1);
    assert_eq!(s.buffer().selection_len(), 0);
}

#[tokio::test(start_paused = true)]
async fn suggestions_follow_typing() {
    let mut s = session("hi");
    for glyph in ["न", "म"] {
        s.process_key(KeyEvent::Glyph(glyph.into()));
    }
    settle().await;
    assert_eq!(s.suggestions().words, vec!["नमस्ते", "नमक", "नमन"]);

    assert!(s.accept_index(0));
    assert_eq!(s.text(), "नमस्ते ");
    assert_eq!(s.cursor(), 7);
    assert!(s.suggestions().is_empty());

    // The cursor now sits after a space: nothing to look up.
    settle().await;
    assert!(s.suggestions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn vowel_sign_is_removed_before_consonant() {
    let mut s = session("hi");
    s.insert("नमस्ते");
    assert_eq!(s.cursor(), 6);

    s.process_key(KeyEvent::Delete);
    assert_eq!(s.text(), "नमस्त");
    assert_eq!(s.cursor(), 5);

    while s.process_key(KeyEvent::Delete) == KeyResult::Edited {}
    assert_eq!(s.text(), "");
    assert_eq!(s.cursor(), 0);
}

#[tokio::test(start_paused = true)]
async fn tamil_deletes_whole_cluster() {
    let mut s = session("ta");
    assert_eq!(s.language(), Language::Tamil);
    s.insert("கி");
    s.process_key(KeyEvent::Delete);
    assert_eq!(s.text(), "");
}

#[tokio::test(start_paused = true)]
async fn moving_the_cursor_retargets_suggestions() {
    let mut s = session("en");
    s.insert("namak xy");
    settle().await;
    assert!(s.suggestions().is_empty());

    s.set_selection(4, 0);
    settle().await;
    // Word under the cursor is "namak", an exact entry with no longer completions.
    assert!(s.suggestions().is_empty());

    s.reset_text("nam");
    s.set_selection(3, 0);
    settle().await;
    assert_eq!(s.suggestions().words, vec!["namaste", "namak"]);

    s.move_left();
    s.accept_suggestion("namaste");
    assert_eq!(s.text(), "namaste ");
}

#[tokio::test(start_paused = true)]
async fn english_shift_and_language_switch() {
    let mut s = session("en");
    s.process_key(KeyEvent::Shift);
    s.process_key(KeyEvent::Glyph("n".into()));
    s.process_key(KeyEvent::Glyph("a".into()));
    assert_eq!(s.text(), "NA");

    s.set_language(Language::Hindi);
    assert_eq!(s.block_index(), 0);
    assert_eq!(s.visible_block().len(), 24);
    s.process_key(KeyEvent::Space);
    s.process_key(KeyEvent::Glyph("क".into()));
    assert_eq!(s.text(), "NA क");
}
