//! Debounced, cancellable suggestion lookup.
//!
//! Every buffer mutation calls [`SuggestionPipeline::on_mutation`], which
//! cancels whatever was outstanding, bumps the generation counter and starts
//! a new task:
//!
//! 1. wait for the quiet interval (cancel-and-replace, never queued)
//! 2. locate the word under the cursor in the snapshot taken at mutation time
//! 3. ask the [`SuggestionSource`] for completions, bounded by a timeout
//! 4. publish the result through the [`SuggestionSlot`]
//!
//! Cancellation is best effort: a network call may not stop when asked. The
//! slot therefore re-checks the generation on every write and drops results
//! from superseded requests, so an old lookup finishing late can never
//! overwrite a newer one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::script::Language;
use crate::suggestion::{SuggestionResult, SuggestionSource, MAX_SUGGESTIONS};
use crate::utils::normalize;
use crate::word::locate;
use crate::Config;

/// A lookup issued for one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub word: String,
    pub language: Language,
    pub generation: u64,
}

/// Timing and size limits of the pipeline, taken from [`Config`].
///
/// `max_suggestions` never exceeds [`MAX_SUGGESTIONS`], whatever the config says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub debounce: Duration,
    pub lookup_timeout: Duration,
    pub min_word_units: usize,
    pub max_suggestions: usize,
    pub clear_on_mutation: bool,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            lookup_timeout: Duration::from_millis(config.lookup_timeout_ms),
            min_word_units: config.min_word_units,
            max_suggestions: config.max_suggestions.min(MAX_SUGGESTIONS),
            clear_on_mutation: config.clear_on_mutation,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

#[derive(Debug, Default)]
struct SlotState {
    latest: u64,
    current: SuggestionResult,
}

/// The single write point for the displayed suggestion set.
///
/// Both the edit path (bumping the generation, clearing) and background
/// lookups (publishing) go through here, under one lock.
#[derive(Debug, Default)]
pub struct SuggestionSlot {
    state: Mutex<SlotState>,
}

impl SuggestionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new generation and return it. With `clear` the displayed set
    /// is emptied at the same time.
    pub fn begin_generation(&self, clear: bool) -> u64 {
        let mut state = self.lock();
        state.latest += 1;
        if clear {
            state.current = SuggestionResult {
                generation: state.latest,
                words: Vec::new(),
            };
        }
        state.latest
    }

    /// Most recent generation handed out.
    pub fn latest_generation(&self) -> u64 {
        self.lock().latest
    }

    /// Publish `words` if `generation` is still the latest.
    /// Returns false (and leaves the slot untouched) for stale results.
    pub fn publish(&self, generation: u64, words: Vec<String>) -> bool {
        let mut state = self.lock();
        if generation != state.latest {
            tracing::debug!(generation, latest = state.latest, "discarding stale suggestions");
            return false;
        }
        tracing::debug!(generation, count = words.len(), "publishing suggestions");
        state.current = SuggestionResult { generation, words };
        true
    }

    /// Empty the displayed set.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.current = SuggestionResult {
            generation: state.latest,
            words: Vec::new(),
        };
    }

    /// Snapshot of the displayed set.
    pub fn current(&self) -> SuggestionResult {
        self.lock().current.clone()
    }
}

struct PendingLookup {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Owns the debounce timer, the generation counter and the in-flight lookup
/// for one editing session.
pub struct SuggestionPipeline<S> {
    source: Arc<S>,
    slot: Arc<SuggestionSlot>,
    settings: PipelineSettings,
    runtime: Handle,
    pending: Option<PendingLookup>,
}

impl<S: SuggestionSource + 'static> SuggestionPipeline<S> {
    /// Create a pipeline on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime; use
    /// [`SuggestionPipeline::with_handle`] in that case.
    pub fn new(source: S, config: &Config) -> Self {
        Self::with_handle(source, config, Handle::current())
    }

    /// Create a pipeline that spawns its lookups on `runtime`.
    pub fn with_handle(source: S, config: &Config, runtime: Handle) -> Self {
        Self {
            source: Arc::new(source),
            slot: Arc::new(SuggestionSlot::new()),
            settings: PipelineSettings::from(config),
            runtime,
            pending: None,
        }
    }

    pub fn settings(&self) -> PipelineSettings {
        self.settings
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Register a mutation of the buffer (insert, delete or cursor move).
    ///
    /// `text` and `cursor` are snapshotted; the returned value is the new
    /// generation. `cursor` is a UTF-16 offset and is clamped to the text, so
    /// any value is accepted.
    pub fn on_mutation(&mut self, text: &str, cursor: usize, language: Language) -> u64 {
        self.cancel_pending();
        let generation = self.slot.begin_generation(self.settings.clear_on_mutation);

        let cancel = CancellationToken::new();
        let task = self.runtime.spawn(run_lookup(
            Arc::clone(&self.source),
            Arc::clone(&self.slot),
            self.settings,
            Snapshot {
                text: text.to_string(),
                cursor,
                language,
                generation,
            },
            cancel.clone(),
        ));
        self.pending = Some(PendingLookup { cancel, task });
        generation
    }

    /// The suggestion set currently on display.
    pub fn current_suggestions(&self) -> SuggestionResult {
        self.slot.current()
    }

    /// Empty the displayed set (used when a suggestion is accepted).
    pub fn clear(&self) {
        self.slot.clear();
    }

    /// Shared handle to the write point of the displayed set.
    pub fn slot(&self) -> Arc<SuggestionSlot> {
        Arc::clone(&self.slot)
    }

    /// Most recent generation.
    pub fn generation(&self) -> u64 {
        self.slot.latest_generation()
    }

    /// Whether a debounce or lookup is still outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.task.is_finished())
    }

    /// Cancel outstanding work. The pipeline stays usable.
    pub fn shutdown(&mut self) {
        self.cancel_pending();
    }
}

impl<S> SuggestionPipeline<S> {
    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel.cancel();
            pending.task.abort();
        }
    }
}

impl<S> Drop for SuggestionPipeline<S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

struct Snapshot {
    text: String,
    cursor: usize,
    language: Language,
    generation: u64,
}

async fn run_lookup<S: SuggestionSource>(
    source: Arc<S>,
    slot: Arc<SuggestionSlot>,
    settings: PipelineSettings,
    snapshot: Snapshot,
    cancel: CancellationToken,
) {
    let generation = snapshot.generation;

    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = tokio::time::sleep(settings.debounce) => {}
    }

    let word = match locate(&snapshot.text, snapshot.cursor) {
        Some(span) if span.unit_len() >= settings.min_word_units => span.word,
        _ => {
            tracing::trace!(generation, "no word long enough under cursor");
            slot.publish(generation, Vec::new());
            return;
        }
    };

    let request = SuggestionRequest {
        word: normalize(&word),
        language: snapshot.language,
        generation,
    };
    tracing::debug!(
        generation,
        word = %request.word,
        language = %request.language,
        "fetching suggestions"
    );

    let lookup = tokio::time::timeout(
        settings.lookup_timeout,
        source.fetch_suggestions(&request.word, request.language),
    );
    let outcome = tokio::select! {
        _ = cancel.cancelled() => return,
        outcome = lookup => outcome,
    };

    let mut words = match outcome {
        Ok(Ok(words)) => words,
        Ok(Err(err)) => {
            tracing::warn!(generation, error = %err, "suggestion lookup failed");
            Vec::new()
        }
        Err(_) => {
            tracing::warn!(generation, timeout = ?settings.lookup_timeout, "suggestion lookup timed out");
            Vec::new()
        }
    };
    words.truncate(settings.max_suggestions);

    slot.publish(request.generation, words);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_publish_is_rejected() {
        let slot = SuggestionSlot::new();
        let first = slot.begin_generation(false);
        let second = slot.begin_generation(false);

        assert!(slot.publish(second, vec!["new".into()]));
        assert!(!slot.publish(first, vec!["old".into()]));

        let current = slot.current();
        assert_eq!(current.generation, second);
        assert_eq!(current.words, vec!["new".to_string()]);
    }

    #[test]
    fn clear_on_new_generation() {
        let slot = SuggestionSlot::new();
        let g = slot.begin_generation(false);
        slot.publish(g, vec!["a".into()]);

        slot.begin_generation(false);
        assert_eq!(slot.current().words, vec!["a".to_string()]);

        slot.begin_generation(true);
        assert!(slot.current().is_empty());
    }

    #[test]
    fn clear_keeps_generation() {
        let slot = SuggestionSlot::new();
        let g = slot.begin_generation(false);
        slot.publish(g, vec!["a".into()]);
        slot.clear();
        assert!(slot.current().is_empty());
        assert_eq!(slot.current().generation, g);
    }

    #[test]
    fn settings_follow_config() {
        let settings = PipelineSettings::default();
        assert_eq!(settings.debounce, Duration::from_millis(150));
        assert_eq!(settings.max_suggestions, 8);
        assert_eq!(settings.min_word_units, 2);
        assert!(!settings.clear_on_mutation);
    }

    #[test]
    fn settings_cap_max_suggestions() {
        let config = Config {
            max_suggestions: 20,
            ..Config::default()
        };
        assert_eq!(PipelineSettings::from(&config).max_suggestions, MAX_SUGGESTIONS);

        let config = Config {
            max_suggestions: 3,
            ..Config::default()
        };
        assert_eq!(PipelineSettings::from(&config).max_suggestions, 3);
    }
}
