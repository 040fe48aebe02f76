use crate::EditorError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Base URL of the portfolio backend
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Transport timeout for a single request
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Template category used when the active template names none
    #[serde(default = "default_category")]
    pub default_category: String,

    /// Font used when the theme leaves it unset
    #[serde(default = "default_fallback_font")]
    pub fallback_font: String,
}

fn default_api_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_request_timeout_ms() -> u64 {
    15_000
}

fn default_category() -> String {
    "developer".to_string()
}

fn default_fallback_font() -> String {
    folio_model::DEFAULT_FONT.to_string()
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults if absent
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: EditorConfig = serde_json::from_str(&content)?;
            tracing::debug!("Loaded editor config from {}", config_path.display());
            Ok(config)
        } else {
            Ok(EditorConfig::default())
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Build the REST gateway these settings describe
    #[cfg(feature = "http")]
    pub fn http_gateway(&self) -> Result<folio_gateway::HttpGateway, EditorError> {
        Ok(folio_gateway::HttpGateway::new(
            &self.api_base_url,
            self.request_timeout(),
        )?)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            default_category: default_category(),
            fallback_font: default_fallback_font(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "apiBaseUrl": "https://api.folio.dev",
            "requestTimeoutMs": 2500,
            "defaultCategory": "academic"
        }"#;

        let config: EditorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.api_base_url, "https://api.folio.dev");
        assert_eq!(config.request_timeout(), Duration::from_millis(2500));
        assert_eq!(config.default_category, "academic");
        assert_eq!(config.fallback_font, "Poppins");
    }

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.default_category, "developer");
        assert_eq!(config.request_timeout_ms, 15_000);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::load(dir.path()).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "fallbackFont": "Inter" }"#,
        )
        .unwrap();

        let config = EditorConfig::load(dir.path()).unwrap();
        assert_eq!(config.fallback_font, "Inter");
        assert_eq!(config.default_category, "developer");
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{ not json").unwrap();

        assert!(matches!(
            EditorConfig::load(dir.path()),
            Err(EditorError::Json(_))
        ));
    }
}
