//! Offline word list backed by an FST.
//!
//! Maps each word to a frequency. Prefix completion walks the FST with a
//! `starts_with` automaton, so lookups stay fast even for large word lists.
//! The lexicon is a [`SuggestionSource`] and can stand in for the network
//! lookup when running offline.

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use fst::automaton::{Automaton, Str};
use fst::{IntoStreamer, Map, MapBuilder, Streamer};

use crate::script::Language;
use crate::suggestion::{LookupError, SuggestionSource, MAX_SUGGESTIONS};

/// Word → frequency map with prefix completion.
#[derive(Clone)]
pub struct Lexicon {
    map: Map<Vec<u8>>,
    limit: usize,
}

impl Lexicon {
    /// Build from `(word, frequency)` pairs. Duplicate words keep their
    /// highest frequency.
    pub fn from_entries<I, W>(entries: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (W, u64)>,
        W: Into<String>,
    {
        let mut entries: Vec<(String, u64)> = entries
            .into_iter()
            .map(|(w, f)| (w.into(), f))
            .filter(|(w, _)| !w.is_empty())
            .collect();
        // FST keys must be inserted in lexicographic order.
        entries.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
        entries.dedup_by(|next, kept| next.0 == kept.0);

        let mut builder = MapBuilder::memory();
        for (word, freq) in &entries {
            builder.insert(word, *freq)?;
        }
        let bytes = builder.into_inner()?;
        Ok(Self {
            map: Map::new(bytes)?,
            limit: MAX_SUGGESTIONS,
        })
    }

    /// Parse a word list: one `word` or `word<TAB>frequency` per line.
    /// Blank lines and lines starting with `#` are skipped; a missing or
    /// unparsable frequency counts as 1.
    pub fn from_word_list(content: &str) -> anyhow::Result<Self> {
        let entries = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| {
                let mut parts = line.split('\t');
                let word = parts.next().unwrap_or_default().trim().to_string();
                let freq = parts
                    .next()
                    .and_then(|f| f.trim().parse::<u64>().ok())
                    .unwrap_or(1);
                (word, freq)
            });
        Self::from_entries(entries)
    }

    /// Load a word list from disk.
    pub fn load_word_list<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read word list {}", path.display()))?;
        Self::from_word_list(&content)
    }

    /// Load a prebuilt FST map from disk.
    pub fn load_fst<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read fst {}", path.display()))?;
        let map = Map::new(bytes).with_context(|| format!("parse fst {}", path.display()))?;
        Ok(Self {
            map,
            limit: MAX_SUGGESTIONS,
        })
    }

    /// Write the FST bytes to disk.
    pub fn save_fst<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.map.as_fst().as_bytes())
            .with_context(|| format!("write fst {}", path.display()))
    }

    /// Set the maximum number of completions returned.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Frequency of an exact word.
    pub fn frequency(&self, word: &str) -> Option<u64> {
        self.map.get(word)
    }

    /// Words starting with `prefix` (the prefix itself excluded), most
    /// frequent first, ties in lexicographic order.
    pub fn complete(&self, prefix: &str) -> Vec<String> {
        if prefix.is_empty() {
            return Vec::new();
        }
        let automaton = Str::new(prefix).starts_with();
        let mut stream = self.map.search(automaton).into_stream();

        let mut found: Vec<(String, u64)> = Vec::new();
        while let Some((key, freq)) = stream.next() {
            if key == prefix.as_bytes() {
                continue;
            }
            if let Ok(word) = std::str::from_utf8(key) {
                found.push((word.to_string(), freq));
            }
        }
        // Stable sort keeps lexicographic order among equal frequencies.
        found.sort_by(|a, b| b.1.cmp(&a.1));
        found
            .into_iter()
            .take(self.limit)
            .map(|(word, _)| word)
            .collect()
    }
}

impl std::fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexicon")
            .field("words", &self.map.len())
            .field("limit", &self.limit)
            .finish()
    }
}

#[async_trait]
impl SuggestionSource for Lexicon {
    async fn fetch_suggestions(
        &self,
        word: &str,
        _language: Language,
    ) -> Result<Vec<String>, LookupError> {
        Ok(self.complete(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Lexicon {
        Lexicon::from_word_list(
            "# sample\nनमस्ते\t50\nनमक\t20\nनमन\t20\nनदी\t90\nhello\nhelp\t5\n\n",
        )
        .unwrap()
    }

    #[test]
    fn completes_by_frequency() {
        let lex = sample();
        assert_eq!(lex.complete("नम"), vec!["नमस्ते", "नमक", "नमन"]);
        assert_eq!(lex.complete("hel"), vec!["help", "hello"]);
    }

    #[test]
    fn exact_word_is_not_a_completion() {
        let lex = sample();
        assert_eq!(lex.complete("help"), Vec::<String>::new());
        assert_eq!(lex.frequency("help"), Some(5));
    }

    #[test]
    fn empty_prefix_and_misses() {
        let lex = sample();
        assert!(lex.complete("").is_empty());
        assert!(lex.complete("zzz").is_empty());
    }

    #[test]
    fn duplicates_keep_highest_frequency() {
        let lex = Lexicon::from_entries(vec![("ab", 1), ("ab", 7), ("abc", 3)]).unwrap();
        assert_eq!(lex.len(), 2);
        assert_eq!(lex.frequency("ab"), Some(7));
    }

    #[test]
    fn limit_caps_results() {
        let words = (0..20).map(|i| (format!("w{i:02}"), 1u64));
        let lex = Lexicon::from_entries(words).unwrap();
        assert_eq!(lex.complete("w").len(), MAX_SUGGESTIONS);
        assert_eq!(lex.clone().with_limit(3).complete("w").len(), 3);
    }

    #[test]
    fn fst_round_trip_on_disk() {
        let path = std::env::temp_dir().join(format!("libindic_lexicon_{}.fst", std::process::id()));
        let lex = sample();
        lex.save_fst(&path).unwrap();
        let loaded = Lexicon::load_fst(&path).unwrap();
        assert_eq!(loaded.len(), lex.len());
        assert_eq!(loaded.complete("नम"), lex.complete("नम"));
        let _ = std::fs::remove_file(&path);
    }
}
