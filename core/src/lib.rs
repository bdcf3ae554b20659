//! libindic-core
//!
//! Editing core of an on-screen keyboard for Indic scripts: a text buffer
//! addressed in UTF-16 units, script-aware backspace, word location, a
//! debounced suggestion pipeline and the paged key layouts of each
//! supported language.
//!
//! Public API:
//! - `TextBuffer` - Text, cursor and selection with clamped offsets
//! - `Language` / `Script` - Supported languages and their script class
//! - `delete_backward` - One backspace, mark-aware for Devanagari
//! - `locate` - Whitespace-delimited word around the cursor
//! - `SuggestionPipeline` - Debounced, generation-checked lookups
//! - `FlattenedLayout` - Glyph blocks for the key grid
//! - `KeyboardSession` - Host-facing engine tying everything together
//! - `Config` - Configuration and timing
use serde::{Deserialize, Serialize};

pub mod units;

pub mod text_buffer;
pub use text_buffer::TextBuffer;

pub mod script;
pub use script::{Language, Script, ScriptClass};

pub mod deletion;
pub use deletion::{delete_backward, DeleteOutcome};

pub mod word;
pub use word::{locate, WordSpan};

pub mod layout;
pub use layout::{
    language_layout, layout_for, popup_variants, symbol_layout, KeyLayout, KeySpec, DELETE_KEY,
};

pub mod flatten;
pub use flatten::{FlattenedLayout, LATIN_BLOCK_SIZE, PAGED_BLOCK_SIZE};

pub mod suggestion;
pub use suggestion::{CachedSource, LookupError, SuggestionResult, SuggestionSource};

pub mod pipeline;
pub use pipeline::{PipelineSettings, SuggestionPipeline, SuggestionRequest, SuggestionSlot};

pub mod lexicon;
pub use lexicon::Lexicon;

pub mod session;
pub use session::{KeyEvent, KeyResult, KeyboardSession, ShiftState};

/// Generic configuration for the keyboard core.
///
/// Only language-agnostic timing and size limits live here. Network and
/// dictionary options belong to `IndicConfig` in the `libindic` crate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Quiet interval after the last edit before a lookup starts (ms)
    pub debounce_ms: u64,
    /// Upper bound on a single lookup (ms)
    pub lookup_timeout_ms: u64,
    /// Words shorter than this (in UTF-16 units) are never looked up
    pub min_word_units: usize,
    /// Maximum number of suggestions published
    pub max_suggestions: usize,

    // Cache Management
    /// Maximum number of entries in the word -> suggestions cache
    pub max_cache_size: usize,

    /// Empty the displayed suggestions on every edit instead of keeping them
    /// until the next lookup publishes
    pub clear_on_mutation: bool,

    /// Language code selected at start-up (e.g. "en", "hi", "ta")
    pub default_language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            lookup_timeout_ms: 500,
            min_word_units: 2,
            max_suggestions: suggestion::MAX_SUGGESTIONS,
            max_cache_size: 1000,
            clear_on_mutation: false,
            default_language: "en".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("read config {}: {e}", path.display()))?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    // ========== Language ==========

    /// The start-up language, falling back to English for unknown codes.
    pub fn language(&self) -> Language {
        Language::from_code(&self.default_language)
    }

    /// Set the start-up language by code.
    pub fn set_language(&mut self, code: &str) {
        self.default_language = code.to_string();
    }

    // ========== Timing ==========

    /// Set the debounce interval in milliseconds.
    pub fn set_debounce_ms(&mut self, ms: u64) {
        self.debounce_ms = ms;
    }

    /// Get the debounce interval.
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }

    /// Get the lookup timeout.
    pub fn lookup_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.lookup_timeout_ms)
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}
