//! Suggestion sources.
//!
//! A `SuggestionSource` turns a partial word into completions. The pipeline
//! only ever sees this trait, so the network client, the offline lexicon and
//! test doubles are interchangeable.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use lru::LruCache;

use crate::script::Language;

/// Upper bound on the number of completions shown.
pub const MAX_SUGGESTIONS: usize = 8;

/// Why a lookup produced nothing.
///
/// None of these reach the user; the pipeline logs them and publishes an
/// empty list.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("lookup timed out")]
    Timeout,
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("lookup disabled")]
    Disabled,
}

/// Asynchronous word-completion lookup.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Return completions for `word`, best first.
    async fn fetch_suggestions(
        &self,
        word: &str,
        language: Language,
    ) -> Result<Vec<String>, LookupError>;
}

#[async_trait]
impl<S: SuggestionSource + ?Sized> SuggestionSource for std::sync::Arc<S> {
    async fn fetch_suggestions(
        &self,
        word: &str,
        language: Language,
    ) -> Result<Vec<String>, LookupError> {
        (**self).fetch_suggestions(word, language).await
    }
}

/// The suggestion set currently on display and the generation that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionResult {
    pub generation: u64,
    pub words: Vec<String>,
}

impl SuggestionResult {
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// LRU cache in front of another source.
///
/// Keyed on (language, word). Failures are never cached so a flaky network
/// gets retried on the next keystroke.
pub struct CachedSource<S> {
    inner: S,
    cache: Mutex<LruCache<(Language, String), Vec<String>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<S: SuggestionSource> CachedSource<S> {
    /// Wrap `inner` with a cache holding up to `capacity` entries
    /// (a capacity of zero falls back to 1000).
    pub fn new(inner: S, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or(NonZeroUsize::new(1000).unwrap_or(NonZeroUsize::MIN));
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (usize, usize) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    fn cached(&self, key: &(Language, String)) -> Option<Vec<String>> {
        self.cache.lock().ok()?.get(key).cloned()
    }
}

#[async_trait]
impl<S: SuggestionSource> SuggestionSource for CachedSource<S> {
    async fn fetch_suggestions(
        &self,
        word: &str,
        language: Language,
    ) -> Result<Vec<String>, LookupError> {
        let key = (language, word.to_string());
        if let Some(words) = self.cached(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(words);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let words = self.inner.fetch_suggestions(word, language).await?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, words.clone());
        }
        Ok(words)
    }
}
