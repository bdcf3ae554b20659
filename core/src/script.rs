//! Languages, scripts and their deletion behaviour.
//!
//! `Language` is the closed set of keyboards the crate ships. Each language
//! maps to a `Script`, and each script to a `ScriptClass` that selects the
//! backspace strategy used by the deletion engine.

use std::fmt;

use phf::phf_map;

/// Backspace strategy for a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptClass {
    /// Backspace strips a trailing combining mark before touching the base.
    CombiningMarkFamily,
    /// Backspace always removes a whole grapheme cluster.
    SimpleGraphemeFamily,
}

/// Writing system used by a keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Devanagari,
    Telugu,
    Tamil,
    Kannada,
    Malayalam,
    Odia,
    Bengali,
    Gujarati,
    Gurmukhi,
    Arabic,
    Latin,
}

/// Devanagari vowel signs, nasalisation marks, visarga, nukta and virama.
const DEVANAGARI_MARKS: &[char] = &[
    '\u{0901}', '\u{0902}', '\u{0903}', '\u{093C}', '\u{093E}', '\u{093F}', '\u{0940}',
    '\u{0941}', '\u{0942}', '\u{0943}', '\u{0944}', '\u{0945}', '\u{0946}', '\u{0947}',
    '\u{0948}', '\u{0949}', '\u{094A}', '\u{094B}', '\u{094C}', '\u{094D}',
];

impl Script {
    /// Combining marks that backspace strips one at a time.
    ///
    /// Only Devanagari is composed mark-by-mark on these keyboards; every
    /// other script deletes whole clusters.
    pub fn combining_marks(self) -> &'static [char] {
        match self {
            Script::Devanagari => DEVANAGARI_MARKS,
            _ => &[],
        }
    }

    /// The deletion strategy for this script.
    pub fn class(self) -> ScriptClass {
        if self.combining_marks().is_empty() {
            ScriptClass::SimpleGraphemeFamily
        } else {
            ScriptClass::CombiningMarkFamily
        }
    }

    /// Check whether `ch` is one of the strippable marks of this script.
    pub fn is_combining_mark(self, ch: char) -> bool {
        self.combining_marks().contains(&ch)
    }
}

/// A supported keyboard language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    Hindi,
    Marathi,
    Sanskrit,
    Telugu,
    Tamil,
    Kannada,
    Malayalam,
    Odia,
    Bengali,
    Assamese,
    Gujarati,
    Punjabi,
    Urdu,
    #[default]
    English,
}

static LANGUAGE_CODES: phf::Map<&'static str, Language> = phf_map! {
    "hi" => Language::Hindi, "hin" => Language::Hindi,
    "mr" => Language::Marathi, "mar" => Language::Marathi,
    "sa" => Language::Sanskrit, "san" => Language::Sanskrit,
    "te" => Language::Telugu, "tel" => Language::Telugu,
    "ta" => Language::Tamil, "tam" => Language::Tamil,
    "kn" => Language::Kannada, "kan" => Language::Kannada,
    "ml" => Language::Malayalam, "mal" => Language::Malayalam,
    "or" => Language::Odia, "ori" => Language::Odia,
    "bn" => Language::Bengali, "ben" => Language::Bengali,
    "as" => Language::Assamese, "asm" => Language::Assamese,
    "gu" => Language::Gujarati, "guj" => Language::Gujarati,
    "pa" => Language::Punjabi, "pan" => Language::Punjabi,
    "ur" => Language::Urdu, "urd" => Language::Urdu,
    "en" => Language::English, "eng" => Language::English,
};

impl Language {
    /// Every supported language, in keyboard-picker order.
    pub const ALL: [Language; 14] = [
        Language::Hindi,
        Language::Marathi,
        Language::Sanskrit,
        Language::Telugu,
        Language::Tamil,
        Language::Kannada,
        Language::Malayalam,
        Language::Odia,
        Language::Bengali,
        Language::Assamese,
        Language::Gujarati,
        Language::Punjabi,
        Language::Urdu,
        Language::English,
    ];

    /// Look up a language by ISO 639-1 or 639-2 code (case-insensitive).
    pub fn lookup(code: &str) -> Option<Language> {
        LANGUAGE_CODES
            .get(code.trim().to_ascii_lowercase().as_str())
            .copied()
    }

    /// Resolve a code, falling back to English for anything unrecognised.
    pub fn from_code(code: &str) -> Language {
        Self::lookup(code).unwrap_or_else(|| {
            tracing::debug!(code, "unknown language code, using English");
            Language::English
        })
    }

    /// Two-letter code.
    pub fn code(self) -> &'static str {
        match self {
            Language::Hindi => "hi",
            Language::Marathi => "mr",
            Language::Sanskrit => "sa",
            Language::Telugu => "te",
            Language::Tamil => "ta",
            Language::Kannada => "kn",
            Language::Malayalam => "ml",
            Language::Odia => "or",
            Language::Bengali => "bn",
            Language::Assamese => "as",
            Language::Gujarati => "gu",
            Language::Punjabi => "pa",
            Language::Urdu => "ur",
            Language::English => "en",
        }
    }

    pub fn script(self) -> Script {
        match self {
            Language::Hindi | Language::Marathi | Language::Sanskrit => Script::Devanagari,
            Language::Telugu => Script::Telugu,
            Language::Tamil => Script::Tamil,
            Language::Kannada => Script::Kannada,
            Language::Malayalam => Script::Malayalam,
            Language::Odia => Script::Odia,
            Language::Bengali | Language::Assamese => Script::Bengali,
            Language::Gujarati => Script::Gujarati,
            Language::Punjabi => Script::Gurmukhi,
            Language::Urdu => Script::Arabic,
            Language::English => Script::Latin,
        }
    }

    pub fn script_class(self) -> ScriptClass {
        self.script().class()
    }

    /// Locale hint sent to suggestion services (`en`, `hi-IN`, ...).
    pub fn locale_hint(self) -> String {
        match self {
            Language::English => "en".to_string(),
            other => format!("{}-IN", other.code()),
        }
    }

    /// Whether the keyboard has case (shift / caps lock).
    pub fn has_case(self) -> bool {
        self == Language::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
