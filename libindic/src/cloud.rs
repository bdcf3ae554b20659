//! Cloud word suggestions.
//!
//! Two providers are supported:
//! - Google's public suggest endpoint (the default)
//! - a custom endpoint taking `{"query", "lang"}` and answering with a JSON
//!   array of strings
//!
//! Every failure (disabled client, transport error, bad payload) comes back
//! as a [`LookupError`]; the pipeline turns those into an empty list, so the
//! user never sees them.

use std::time::Duration;

use async_trait::async_trait;
use libindic_core::suggestion::MAX_SUGGESTIONS;
use libindic_core::{Language, LookupError, SuggestionSource};
use serde_json::Value;

const GOOGLE_SUGGEST_URL: &str = "https://suggestqueries.google.com/complete/search";

/// Words shorter than this (in characters) are not sent.
const MIN_QUERY_CHARS: usize = 2;

/// Cloud suggestion provider options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CloudProvider {
    /// Google suggest (`client=firefox` JSON flavour)
    #[default]
    Google,
    /// Custom endpoint URL for a self-hosted suggestion server
    Custom(String),
}

impl CloudProvider {
    /// `None` selects Google.
    pub fn from_endpoint(endpoint: Option<&str>) -> Self {
        match endpoint {
            Some(url) if !url.trim().is_empty() => Self::Custom(url.trim().to_string()),
            _ => Self::Google,
        }
    }
}

/// Cloud client for querying online suggestion services.
pub struct CloudSuggest {
    provider: CloudProvider,
    enabled: bool,
    timeout_ms: u64,
    client: reqwest::Client,
}

impl CloudSuggest {
    /// Create an enabled client for `provider` with a 500ms timeout.
    pub fn new(provider: CloudProvider) -> Self {
        Self::with_timeout(provider, 500)
    }

    pub fn with_timeout(provider: CloudProvider, timeout_ms: u64) -> Self {
        Self {
            provider,
            enabled: true,
            timeout_ms,
            client: build_client(timeout_ms),
        }
    }

    pub fn provider(&self) -> &CloudProvider {
        &self.provider
    }

    /// Enable or disable network lookups.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check if network lookups are enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the request timeout in milliseconds.
    pub fn set_timeout(&mut self, timeout_ms: u64) {
        self.timeout_ms = timeout_ms;
        self.client = build_client(timeout_ms);
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    async fn query_google(
        &self,
        query: &str,
        language: Language,
    ) -> Result<Vec<String>, LookupError> {
        let url = google_url(query, language);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(transport)?;
        let text = response.text().await.map_err(transport)?;
        parse_google_payload(&text)
    }

    async fn query_custom(
        &self,
        url: &str,
        query: &str,
        language: Language,
    ) -> Result<Vec<String>, LookupError> {
        let body = serde_json::json!({
            "query": query,
            "lang": language.code(),
        });
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(transport)?;
        let text = response.text().await.map_err(transport)?;
        parse_custom_payload(&text)
    }
}

impl Default for CloudSuggest {
    fn default() -> Self {
        Self::new(CloudProvider::default())
    }
}

#[async_trait]
impl SuggestionSource for CloudSuggest {
    async fn fetch_suggestions(
        &self,
        word: &str,
        language: Language,
    ) -> Result<Vec<String>, LookupError> {
        if !self.enabled {
            return Err(LookupError::Disabled);
        }
        let query = word.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        tracing::debug!(query, %language, provider = ?self.provider, "cloud lookup");
        let mut words = match &self.provider {
            CloudProvider::Google => self.query_google(query, language).await?,
            CloudProvider::Custom(url) => self.query_custom(url, query, language).await?,
        };
        words.truncate(MAX_SUGGESTIONS);
        Ok(words)
    }
}

fn build_client(timeout_ms: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "falling back to default HTTP client");
            reqwest::Client::new()
        })
}

fn transport(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        LookupError::Timeout
    } else {
        LookupError::Transport(err.to_string())
    }
}

/// Request URL for Google suggest.
pub fn google_url(query: &str, language: Language) -> String {
    format!(
        "{GOOGLE_SUGGEST_URL}?client=firefox&hl={}&q={}",
        language.locale_hint(),
        urlencoding::encode(query)
    )
}

/// Parse Google's `[query, [suggestion, ...], ...]` payload.
///
/// Non-string entries in the suggestion list are skipped; any other shape is
/// malformed.
pub fn parse_google_payload(body: &str) -> Result<Vec<String>, LookupError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| LookupError::Malformed(e.to_string()))?;
    let list = value
        .as_array()
        .and_then(|top| top.get(1))
        .and_then(Value::as_array)
        .ok_or_else(|| LookupError::Malformed("expected [query, [suggestions]]".into()))?;
    Ok(list
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .take(MAX_SUGGESTIONS)
        .collect())
}

/// Parse a custom endpoint's `["word", ...]` payload.
pub fn parse_custom_payload(body: &str) -> Result<Vec<String>, LookupError> {
    let words: Vec<String> =
        serde_json::from_str(body).map_err(|e| LookupError::Malformed(e.to_string()))?;
    Ok(words.into_iter().take(MAX_SUGGESTIONS).collect())
}
