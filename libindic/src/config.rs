//! Keyboard configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cloud::CloudProvider;

/// Keyboard configuration that extends the base `Config` from core.
///
/// This configuration includes:
/// - All generic options from `libindic_core::Config` (flattened via serde)
/// - Cloud suggestion options (enabled flag, custom endpoint)
/// - An optional offline word list
///
/// # Example
///
/// ```rust
/// use libindic::IndicConfig;
///
/// let config = IndicConfig::from_toml_str("debounce_ms = 100\ncloud_enabled = false\n").unwrap();
/// assert_eq!(config.base().debounce_ms, 100);
/// assert!(!config.cloud_enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicConfig {
    /// Base configuration fields (timing, limits, language)
    #[serde(flatten)]
    pub base: libindic_core::Config,

    /// Query the network for suggestions
    pub cloud_enabled: bool,
    /// Custom suggestion endpoint; Google suggest when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_endpoint: Option<String>,
    /// Word list (`word<TAB>frequency` per line) for offline suggestions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexicon_path: Option<PathBuf>,
}

impl Default for IndicConfig {
    fn default() -> Self {
        Self {
            base: libindic_core::Config::default(),
            cloud_enabled: true,
            cloud_endpoint: None,
            lexicon_path: None,
        }
    }
}

impl IndicConfig {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("read config {}: {e}", path.display()))?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Convert this config into the base config
    pub fn into_base(self) -> libindic_core::Config {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &libindic_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut libindic_core::Config {
        &mut self.base
    }

    /// Cloud provider selected by `cloud_endpoint`.
    pub fn cloud_provider(&self) -> CloudProvider {
        CloudProvider::from_endpoint(self.cloud_endpoint.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = IndicConfig::default();
        assert!(config.cloud_enabled);
        assert_eq!(config.cloud_provider(), CloudProvider::Google);
        assert_eq!(config.base().max_cache_size, 1000);
    }

    #[test]
    fn flattened_fields_parse() {
        let config = IndicConfig::from_toml_str(
            "default_language = \"ta\"\nlookup_timeout_ms = 900\ncloud_endpoint = \"http://localhost/s\"\n",
        )
        .unwrap();
        assert_eq!(config.base().default_language, "ta");
        assert_eq!(config.base().lookup_timeout_ms, 900);
        assert_eq!(config.base().debounce_ms, 150);
        assert_eq!(
            config.cloud_provider(),
            CloudProvider::Custom("http://localhost/s".into())
        );
    }

    #[test]
    fn save_and_load_file() {
        let path = std::env::temp_dir().join(format!("libindic_indic_{}.toml", std::process::id()));
        let mut config = IndicConfig::default();
        config.cloud_enabled = false;
        config.lexicon_path = Some(PathBuf::from("words.txt"));
        config.base_mut().set_language("bn");
        config.save_toml(&path).unwrap();
        assert_eq!(IndicConfig::load_toml(&path).unwrap(), config);
        let _ = std::fs::remove_file(&path);
    }
}
