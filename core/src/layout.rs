// core/src/layout.rs
//
// Built-in key layout tables for every supported language plus the shared
// symbol pad. Tables are assembled once on first use.

use ahash::AHashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::script::Language;

/// A single key: the glyph it types and its long-press variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySpec {
    pub main: String,
    #[serde(default)]
    pub popup: Vec<String>,
}

impl KeySpec {
    pub fn new<T: Into<String>>(main: T) -> Self {
        Self {
            main: main.into(),
            popup: Vec::new(),
        }
    }

    pub fn with_popup<T: Into<String>>(main: T, popup: &[&str]) -> Self {
        Self {
            main: main.into(),
            popup: popup.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Ordered rows of keys for one language.
#[derive(Debug, Clone, Default)]
pub struct KeyLayout {
    rows: Vec<Vec<KeySpec>>,
    // main glyph -> (row, column) of its first occurrence
    index: AHashMap<String, (usize, usize)>,
}

impl KeyLayout {
    /// Build a layout from rows, e.g. rows supplied by a host data source.
    pub fn from_rows(rows: Vec<Vec<KeySpec>>) -> Self {
        let mut index = AHashMap::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, key) in row.iter().enumerate() {
                index.entry(key.main.clone()).or_insert((r, c));
            }
        }
        Self { rows, index }
    }

    pub fn rows(&self) -> &[Vec<KeySpec>] {
        &self.rows
    }

    /// Total number of keys across all rows.
    pub fn key_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Find the first key whose main glyph is `main`.
    pub fn find(&self, main: &str) -> Option<&KeySpec> {
        let &(r, c) = self.index.get(main)?;
        self.rows.get(r)?.get(c)
    }

    /// Long-press variants for `main` (empty if the key has none or is unknown).
    pub fn popup_variants(&self, main: &str) -> &[String] {
        self.find(main).map(|k| k.popup.as_slice()).unwrap_or(&[])
    }
}

/// Rows for a language code; unknown codes get the English layout.
pub fn layout_for(code: &str) -> &'static KeyLayout {
    language_layout(Language::from_code(code))
}

/// Rows for a language.
pub fn language_layout(language: Language) -> &'static KeyLayout {
    match language {
        Language::Hindi | Language::Marathi | Language::Sanskrit => &DEVANAGARI,
        Language::Telugu => &TELUGU,
        Language::Tamil => &TAMIL,
        Language::Kannada => &KANNADA,
        Language::Malayalam => &MALAYALAM,
        Language::Odia => &ODIA,
        Language::Bengali | Language::Assamese => &BENGALI,
        Language::Gujarati => &GUJARATI,
        Language::Punjabi => &GURMUKHI,
        Language::Urdu => &URDU,
        Language::English => &ENGLISH,
    }
}

/// Long-press variants of the first `main` key in `language`'s layout.
pub fn popup_variants(language: Language, main: &str) -> &'static [String] {
    language_layout(language).popup_variants(main)
}

/// The shared `123` symbol pad.
pub fn symbol_layout() -> &'static KeyLayout {
    &SYMBOLS
}

// ========== Table helpers ==========

fn plain(mains: &[&str]) -> Vec<KeySpec> {
    mains.iter().map(|m| KeySpec::new(*m)).collect()
}

/// Consonant row: every key gets `matras`, and keys listed in `extras` get
/// their nukta form appended after the matras.
fn consonants(matras: &[&str], mains: &[&str], extras: &[(&str, &str)]) -> Vec<KeySpec> {
    mains
        .iter()
        .map(|m| {
            let mut key = KeySpec::with_popup(*m, matras);
            for (base, variant) in extras {
                if base == m {
                    key.popup.push(variant.to_string());
                }
            }
            key
        })
        .collect()
}

// ========== Matra lists (matras first, variants last) ==========

const DEVANAGARI_MATRAS: &[&str] = &[
    "ा", "ि", "ी", "ु", "ू", "ृ", "ॄ", "े", "ै", "ो", "ौ", "ं", "ः", "ँ", "्",
];
const TELUGU_MATRAS: &[&str] = &[
    "ా", "ి", "ీ", "ు", "ూ", "ృ", "ౄ", "ె", "ే", "ై", "ొ", "ో", "ౌ", "్",
];
const TAMIL_MATRAS: &[&str] = &["ா", "ி", "ீ", "ு", "ூ", "ெ", "ே", "ை", "ொ", "ோ", "ௌ", "்"];
const KANNADA_MATRAS: &[&str] = &[
    "ಾ", "ಿ", "ೀ", "ು", "ೂ", "ೃ", "ೄ", "ೆ", "ೇ", "ೈ", "ೊ", "ೋ", "ೌ", "್",
];
const MALAYALAM_MATRAS: &[&str] = &[
    "ാ", "ി", "ീ", "ു", "ൂ", "ൃ", "ൄ", "െ", "േ", "ൈ", "ൊ", "ോ", "ൗ", "്",
];
const ODIA_MATRAS: &[&str] = &["ା", "ି", "ୀ", "ୁ", "ୂ", "ୃ", "େ", "ୈ", "ୋ", "ୌ", "ଂ", "ଃ", "୍"];
const BENGALI_MATRAS: &[&str] = &["া", "ি", "ী", "ু", "ূ", "ৃ", "ে", "ৈ", "ো", "ৌ", "ঁ", "ঃ", "্"];
const GUJARATI_MATRAS: &[&str] = &[
    "ા", "િ", "ી", "ુ", "ૂ", "ૃ", "ૄ", "ે", "ૈ", "ો", "ૌ", "ં", "ઃ", "્",
];
const GURMUKHI_MATRAS: &[&str] = &["ਾ", "ਿ", "ੀ", "ੁ", "ੂ", "ੇ", "ੈ", "ੋ", "ੌ", "ਂ", "ੰ", "੍"];

// ========== Tables ==========

static DEVANAGARI: Lazy<KeyLayout> = Lazy::new(|| {
    let m = DEVANAGARI_MATRAS;
    let mut conjuncts = consonants(m, &["ष", "स", "ह", "ळ", "क्ष", "त्र", "ज्ञ", "श्र"], &[]);
    conjuncts.extend(plain(&["ॐ", "ऍ", "ऑ", "ऎ", "ऒ"]));
    KeyLayout::from_rows(vec![
        vec![
            KeySpec::with_popup("अ", &["आ"]),
            KeySpec::new("आ"),
            KeySpec::with_popup("इ", &["ई"]),
            KeySpec::new("ई"),
            KeySpec::with_popup("उ", &["ऊ"]),
            KeySpec::new("ऊ"),
            KeySpec::with_popup("ऋ", &["ॠ"]),
            KeySpec::new("ॠ"),
            KeySpec::new("ऌ"),
            KeySpec::new("ए"),
        ],
        vec![
            KeySpec::new("ऐ"),
            KeySpec::with_popup("ओ", &["औ"]),
            KeySpec::new("औ"),
            KeySpec::new("अं"),
            KeySpec::new("अः"),
        ],
        consonants(
            m,
            &["क", "ख", "ग", "घ", "ङ", "च", "छ", "ज", "झ", "ञ"],
            &[("क", "क़"), ("ख", "ख़"), ("ग", "ग़"), ("ज", "ज़")],
        ),
        consonants(
            m,
            &["ट", "ठ", "ड", "ढ", "ण", "त", "थ", "द", "ध", "न"],
            &[("ड", "ड़"), ("ढ", "ढ़")],
        ),
        consonants(
            m,
            &["प", "फ", "ब", "भ", "म", "य", "र", "ल", "व", "श"],
            &[("फ", "फ़")],
        ),
        conjuncts,
        plain(&["ा", "ि", "ी", "ु", "ू", "ृ", "े", "ै", "ो", "ौ", "्"]),
    ])
});

static TELUGU: Lazy<KeyLayout> = Lazy::new(|| {
    let m = TELUGU_MATRAS;
    KeyLayout::from_rows(vec![
        plain(&["అ", "ఆ", "ఇ", "ఈ", "ఉ", "ఊ", "ఋ", "ౠ", "ఎ", "ఏ"]),
        plain(&["ఐ", "ఒ", "ఓ", "ఔ", "అం", "అః"]),
        consonants(m, &["క", "ఖ", "గ", "ఘ", "ఙ", "చ", "ఛ", "జ", "ఝ", "ఞ"], &[]),
        consonants(m, &["ట", "ఠ", "డ", "ఢ", "ణ", "త", "థ", "ద", "ధ", "న"], &[]),
        consonants(m, &["ప", "ఫ", "బ", "భ", "మ", "య", "ర", "ల", "వ", "శ"], &[]),
        consonants(m, &["ష", "స", "హ", "ళ", "క్ష", "ఱ"], &[]),
    ])
});

static TAMIL: Lazy<KeyLayout> = Lazy::new(|| {
    let m = TAMIL_MATRAS;
    KeyLayout::from_rows(vec![
        plain(&["அ", "ஆ", "இ", "ஈ", "உ", "ஊ", "எ", "ஏ", "ஐ", "ஒ"]),
        plain(&["ஓ", "ஔ", "ஃ"]),
        consonants(m, &["க", "ங", "ச", "ஞ", "ட", "ண", "த", "ந", "ப", "ம"], &[]),
        consonants(m, &["ய", "ர", "ற", "ல", "ள", "ழ", "வ", "ஷ", "ஸ", "ஹ"], &[]),
        plain(&[DELETE_KEY]),
    ])
});

static KANNADA: Lazy<KeyLayout> = Lazy::new(|| {
    let m = KANNADA_MATRAS;
    KeyLayout::from_rows(vec![
        plain(&["ಅ", "ಆ", "ಇ", "ಈ", "ಉ", "ಊ", "ಋ", "ೠ", "ಎ", "ಏ"]),
        plain(&["ಐ", "ಒ", "ಓ", "ಔ", "ಅಂ", "ಅಃ"]),
        consonants(m, &["ಕ", "ಖ", "ಗ", "ಘ", "ಙ", "ಚ", "ಛ", "ಜ", "ಝ", "ಞ"], &[]),
        consonants(m, &["ಟ", "ಠ", "ಡ", "ಢ", "ಣ", "ತ", "ಥ", "ದ", "ಧ", "ನ"], &[]),
        consonants(m, &["ಪ", "ಫ", "ಬ", "ಭ", "ಮ", "ಯ", "ರ", "ಲ", "ವ", "ಶ"], &[]),
        consonants(m, &["ಷ", "ಸ", "ಹ", "ಳ", "ಕ್ಷ"], &[]),
    ])
});

static MALAYALAM: Lazy<KeyLayout> = Lazy::new(|| {
    let m = MALAYALAM_MATRAS;
    KeyLayout::from_rows(vec![
        plain(&["അ", "ആ", "ഇ", "ഈ", "ഉ", "ഊ", "ഋ", "എ", "ഏ", "ഐ"]),
        plain(&["ഒ", "ഓ", "ഔ", "അം", "അഃ"]),
        consonants(m, &["ക", "ഖ", "ഗ", "ഘ", "ങ", "ച", "ഛ", "ജ", "ഝ", "ഞ"], &[]),
        consonants(m, &["ട", "ഠ", "ഡ", "ഢ", "ണ", "ത", "ഥ", "ദ", "ധ", "ന"], &[]),
        consonants(m, &["പ", "ഫ", "ബ", "ഭ", "മ", "യ", "ര", "ല", "വ", "ശ"], &[]),
        consonants(m, &["ഷ", "സ", "ഹ", "ള", "ഴ", "റ"], &[]),
    ])
});

static ODIA: Lazy<KeyLayout> = Lazy::new(|| {
    let m = ODIA_MATRAS;
    KeyLayout::from_rows(vec![
        plain(&["ଅ", "ଆ", "ଇ", "ଈ", "ଉ", "ଊ", "ଋ", "ଏ", "ଐ", "ଓ"]),
        plain(&["ଔ", "ଅଂ", "ଅଃ"]),
        consonants(m, &["କ", "ଖ", "ଗ", "ଘ", "ଙ", "ଚ", "ଛ", "ଜ", "ଝ", "ଞ"], &[]),
        consonants(m, &["ଟ", "ଠ", "ଡ", "ଢ", "ଣ", "ତ", "ଥ", "ଦ", "ଧ", "ନ"], &[]),
        consonants(m, &["ପ", "ଫ", "ବ", "ଭ", "ମ", "ଯ", "ର", "ଲ", "ଳ", "ଵ"], &[]),
        consonants(m, &["ଶ", "ଷ", "ସ", "ହ"], &[]),
    ])
});

static BENGALI: Lazy<KeyLayout> = Lazy::new(|| {
    let m = BENGALI_MATRAS;
    let mut last = consonants(m, &["স", "হ"], &[]);
    last.extend(plain(&["়", "্"]));
    KeyLayout::from_rows(vec![
        plain(&["অ", "আ", "ই", "ঈ", "উ", "ঊ", "ঋ", "এ", "ঐ", "ও"]),
        plain(&["ঔ", "অং", "অঃ"]),
        consonants(m, &["ক", "খ", "গ", "ঘ", "ঙ", "চ", "ছ", "জ", "ঝ", "ঞ"], &[]),
        consonants(m, &["ট", "ঠ", "ড", "ঢ", "ণ", "ত", "থ", "দ", "ধ", "ন"], &[]),
        consonants(m, &["প", "ফ", "ব", "ভ", "ম", "য", "র", "ল", "শ", "ষ"], &[]),
        last,
    ])
});

static GUJARATI: Lazy<KeyLayout> = Lazy::new(|| {
    let m = GUJARATI_MATRAS;
    KeyLayout::from_rows(vec![
        plain(&["અ", "આ", "ઇ", "ઈ", "ઉ", "ઊ", "ઋ", "એ", "ઐ", "ઓ"]),
        plain(&["ઔ", "અં", "અઃ"]),
        consonants(
            m,
            &["ક", "ખ", "ગ", "ઘ", "ઙ", "ચ", "છ", "જ", "ઝ", "ઞ"],
            &[("ક", "ક઼"), ("ગ", "ગ઼"), ("જ", "જ઼")],
        ),
        consonants(m, &["ટ", "ઠ", "ડ", "ઢ", "ણ", "ત", "થ", "દ", "ધ", "ન"], &[]),
        consonants(
            m,
            &["પ", "ફ", "બ", "ભ", "મ", "ય", "ર", "લ", "વ", "શ"],
            &[("ફ", "ફ઼")],
        ),
        consonants(m, &["ષ", "સ", "હ", "્"], &[]),
    ])
});

static GURMUKHI: Lazy<KeyLayout> = Lazy::new(|| {
    let m = GURMUKHI_MATRAS;
    KeyLayout::from_rows(vec![
        plain(&["ਅ", "ਆ", "ਇ", "ਈ", "ਉ", "ਊ", "ਏ", "ਐ", "ਓ", "ਔ"]),
        consonants(
            m,
            &["ਕ", "ਖ", "ਗ", "ਘ", "ਙ", "ਚ", "ਛ", "ਜ", "ਝ", "ਞ"],
            &[("ਕ", "ਕ਼"), ("ਖ", "ਖ਼"), ("ਗ", "ਗ਼"), ("ਜ", "ਜ਼")],
        ),
        consonants(m, &["ਟ", "ਠ", "ਡ", "ਢ", "ਣ", "ਤ", "ਥ", "ਦ", "ਧ", "ਨ"], &[]),
        consonants(
            m,
            &["ਪ", "ਫ", "ਬ", "ਭ", "ਮ", "ਯ", "ਰ", "ਲ", "ਵ", "ਸ"],
            &[("ਫ", "ਫ਼")],
        ),
        consonants(m, &["ਹ", "ਖ਼", "ਗ਼", "ਜ਼", "ੜ", "ਫ਼"], &[]),
    ])
});

static URDU: Lazy<KeyLayout> = Lazy::new(|| {
    KeyLayout::from_rows(vec![
        vec![
            KeySpec::with_popup("ا", &["آ"]),
            KeySpec::with_popup("ب", &["پ"]),
            KeySpec::with_popup("ت", &["ٹ"]),
            KeySpec::new("ث"),
            KeySpec::with_popup("ج", &["چ"]),
            KeySpec::new("ح"),
            KeySpec::new("خ"),
            KeySpec::with_popup("د", &["ڈ"]),
            KeySpec::new("ذ"),
            KeySpec::with_popup("ر", &["ڑ"]),
        ],
        vec![
            KeySpec::with_popup("ز", &["ژ"]),
            KeySpec::with_popup("س", &["ش"]),
            KeySpec::new("ص"),
            KeySpec::new("ض"),
            KeySpec::new("ط"),
            KeySpec::new("ظ"),
            KeySpec::new("ع"),
            KeySpec::new("غ"),
            KeySpec::new("ف"),
            KeySpec::new("ق"),
        ],
        vec![
            KeySpec::with_popup("ک", &["گ"]),
            KeySpec::new("ل"),
            KeySpec::new("م"),
            KeySpec::with_popup("ن", &["ں"]),
            KeySpec::new("و"),
            KeySpec::with_popup("ہ", &["ھ"]),
            KeySpec::with_popup("ی", &["ئ"]),
            KeySpec::new("ء"),
            KeySpec::new("ؠ"),
            KeySpec::new("؎"),
        ],
        plain(&[DELETE_KEY]),
    ])
});

static ENGLISH: Lazy<KeyLayout> = Lazy::new(|| {
    KeyLayout::from_rows(vec![
        vec![
            KeySpec::new("q"),
            KeySpec::new("w"),
            KeySpec::with_popup("e", &["È", "É", "Ê", "Ë"]),
            KeySpec::new("r"),
            KeySpec::new("t"),
            KeySpec::new("y"),
            KeySpec::with_popup("u", &["Ù", "Ú", "Û", "Ü"]),
            KeySpec::with_popup("i", &["Ì", "Í", "Î", "Ï"]),
            KeySpec::with_popup("o", &["Ò", "Ó", "Ô", "Õ", "Ö", "Ø"]),
            KeySpec::new("p"),
        ],
        vec![
            KeySpec::with_popup("a", &["À", "Á", "Â", "Ã", "Ä", "Å", "Æ"]),
            KeySpec::new("s"),
            KeySpec::new("d"),
            KeySpec::new("f"),
            KeySpec::new("g"),
            KeySpec::new("h"),
            KeySpec::new("j"),
            KeySpec::new("k"),
            KeySpec::new("l"),
        ],
        vec![
            KeySpec::new("z"),
            KeySpec::new("x"),
            KeySpec::with_popup("c", &["Ç"]),
            KeySpec::new("v"),
            KeySpec::new("b"),
            KeySpec::with_popup("n", &["Ñ"]),
            KeySpec::new("m"),
        ],
        vec![
            KeySpec::new("123"),
            KeySpec::new(","),
            KeySpec::with_popup(".", &["?", "!"]),
            KeySpec::new(" "),
        ],
    ])
});

static SYMBOLS: Lazy<KeyLayout> = Lazy::new(|| {
    KeyLayout::from_rows(vec![
        plain(&["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"]),
        plain(&["@", "#", "₹", "$", "%", "^", "&", "*", "(", ")"]),
        plain(&["-", "/", ":", ";", "(", ")", "₹", "&", "@", "\""]),
        plain(&["?", "!", "'", "\"", ",", ".", "_", "=", "+"]),
    ])
});

/// Label of the in-grid delete key some tables carry.
pub const DELETE_KEY: &str = "DEL";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_keys() {
        for lang in Language::ALL {
            assert!(language_layout(lang).key_count() > 0, "{lang} has no keys");
        }
    }

    #[test]
    fn popup_lookup_by_language() {
        assert!(popup_variants(Language::English, "o").contains(&"Ö".to_string()));
        assert!(popup_variants(Language::English, "nope").is_empty());
    }

    #[test]
    fn unknown_code_gets_english() {
        let layout = layout_for("klingon");
        assert_eq!(layout.rows()[0][0].main, "q");
    }

    #[test]
    fn devanagari_shape() {
        let layout = layout_for("hi");
        let lens: Vec<usize> = layout.rows().iter().map(Vec::len).collect();
        assert_eq!(lens, vec![10, 5, 10, 10, 10, 13, 11]);
        assert!(std::ptr::eq(layout_for("mr"), layout));
    }

    #[test]
    fn consonant_popups_have_matras_then_nukta() {
        let popup = layout_for("hi").popup_variants("क");
        assert_eq!(popup.first().map(String::as_str), Some("ा"));
        assert_eq!(popup.last().map(String::as_str), Some("क़"));
        assert_eq!(popup.len(), DEVANAGARI_MATRAS.len() + 1);

        let plain = layout_for("hi").popup_variants("घ");
        assert_eq!(plain.len(), DEVANAGARI_MATRAS.len());
    }

    #[test]
    fn unknown_key_has_no_popup() {
        assert!(layout_for("ta").popup_variants("zz").is_empty());
        assert!(layout_for("en").popup_variants("q").is_empty());
        assert_eq!(layout_for("en").popup_variants("c"), ["Ç"]);
    }

    #[test]
    fn symbol_pad_rows() {
        let lens: Vec<usize> = symbol_layout().rows().iter().map(Vec::len).collect();
        assert_eq!(lens, vec![10, 10, 10, 9]);
    }

    #[test]
    fn from_rows_indexes_first_occurrence() {
        let layout = KeyLayout::from_rows(vec![
            vec![KeySpec::with_popup("x", &["1"])],
            vec![KeySpec::with_popup("x", &["2"])],
        ]);
        assert_eq!(layout.popup_variants("x"), ["1"]);
    }
}
