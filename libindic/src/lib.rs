//! libindic crate root
//!
//! This crate wires the editing core from `libindic-core` to concrete
//! suggestion backends: the cloud client, an offline FST word list, or
//! nothing at all.
//!
//! Public API exported here:
//! - `CloudSuggest` and `CloudProvider` from `cloud`
//! - `IndicConfig` from `config`
//! - `IndicSource`, the backend picked from a config
//! - `new_session` to build a `KeyboardSession` from an `IndicConfig`

pub mod cloud;
pub mod config;

use async_trait::async_trait;

// Re-export the core types callers need.
pub use libindic_core::{
    delete_backward, layout_for, locate, CachedSource, Config, DeleteOutcome, FlattenedLayout,
    KeyEvent, KeyResult, KeyboardSession, Language, Lexicon, LookupError, ScriptClass,
    ShiftState, SuggestionPipeline, SuggestionResult, SuggestionSource, TextBuffer, WordSpan,
};

pub use cloud::{CloudProvider, CloudSuggest};
pub use config::IndicConfig;

/// The suggestion backend selected by configuration.
pub enum IndicSource {
    /// Network lookups behind an LRU cache
    Cloud(CachedSource<CloudSuggest>),
    /// Offline word list
    Lexicon(Lexicon),
    /// No suggestions
    Offline,
}

impl IndicSource {
    /// Pick a backend: a configured word list wins, then the cloud if
    /// enabled, otherwise none.
    pub fn from_config(config: &IndicConfig) -> anyhow::Result<Self> {
        if let Some(path) = &config.lexicon_path {
            let lexicon = Lexicon::load_word_list(path)?
                .with_limit(config.base.max_suggestions);
            tracing::info!(path = %path.display(), words = lexicon.len(), "loaded word list");
            return Ok(Self::Lexicon(lexicon));
        }
        if config.cloud_enabled {
            let cloud =
                CloudSuggest::with_timeout(config.cloud_provider(), config.base.lookup_timeout_ms);
            return Ok(Self::Cloud(CachedSource::new(cloud, config.base.max_cache_size)));
        }
        Ok(Self::Offline)
    }

    pub fn name(&self) -> &'static str {
        match self {
            IndicSource::Cloud(_) => "cloud",
            IndicSource::Lexicon(_) => "lexicon",
            IndicSource::Offline => "offline",
        }
    }
}

#[async_trait]
impl SuggestionSource for IndicSource {
    async fn fetch_suggestions(
        &self,
        word: &str,
        language: Language,
    ) -> Result<Vec<String>, LookupError> {
        match self {
            IndicSource::Cloud(cloud) => cloud.fetch_suggestions(word, language).await,
            IndicSource::Lexicon(lexicon) => lexicon.fetch_suggestions(word, language).await,
            IndicSource::Offline => Ok(Vec::new()),
        }
    }
}

/// Build a keyboard session for `config` on the current Tokio runtime.
pub fn new_session(config: &IndicConfig) -> anyhow::Result<KeyboardSession<IndicSource>> {
    let source = IndicSource::from_config(config)?;
    tracing::debug!(source = source.name(), language = %config.base.language(), "new session");
    Ok(KeyboardSession::new(source, &config.base))
}
