//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};

/// Ollama (local or remote) provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOllamaConfig {
    pub enabled: bool,
    /// API root, including the `/api` suffix
    pub base_url: String,
    /// Environment variable name for the API key (default: "OLLAMA_API_KEY").
    pub api_key_env: String,
    /// Direct API key (prefer the env var).
    pub api_key: Option<String>,
    pub default_model: String,
    pub timeout_secs: u64,
}

impl Default for FileOllamaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://127.0.0.1:11434/api".to_string(),
            api_key_env: "OLLAMA_API_KEY".to_string(),
            api_key: None,
            default_model: "qwen3:8b".to_string(),
            timeout_secs: 120,
        }
    }
}

impl FileOllamaConfig {
    /// Direct key first, then the configured environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub ollama: FileOllamaConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_defaults() {
        let config = FileProvidersConfig::default();
        assert!(config.ollama.enabled);
        assert_eq!(config.ollama.base_url, "http://127.0.0.1:11434/api");
        assert_eq!(config.ollama.default_model, "qwen3:8b");
    }

    #[test]
    fn test_direct_api_key_wins() {
        let config = FileOllamaConfig {
            api_key: Some("secret".to_string()),
            api_key_env: "COUNCIL_TEST_UNSET_OLLAMA_KEY".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("secret"));
    }

    #[test]
    fn test_missing_api_key() {
        let config = FileOllamaConfig {
            api_key_env: "COUNCIL_TEST_UNSET_OLLAMA_KEY".to_string(),
            ..Default::default()
        };
        assert!(config.resolve_api_key().is_none());
    }
}
