//! Backend configuration from TOML (`[backends.<name>]` sections)

use crate::providers::ProviderKind;
use chorus_domain::Topic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw configuration of one backend
///
/// # Example
///
/// ```toml
/// [backends.openai]
/// provider = "openai"            # "openai", "anthropic" or "google"
/// model = "gpt-4"
/// api_key_env = "OPENAI_API_KEY"
/// timeout_seconds = 30
/// strengths = ["code", "reasoning"]
/// ```
///
/// Unset capability fields fall back to the provider's built-in table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    pub provider: String,
    /// Provider model identifier, passed through as is
    pub model: String,
    /// Environment variable holding the API key (provider default when unset)
    pub api_key_env: Option<String>,
    /// Direct API key; prefer `api_key_env`
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Overrides `[execution] timeout_seconds` for this backend
    pub timeout_seconds: Option<u64>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub strengths: Option<Vec<Topic>>,
    pub weaknesses: Option<Vec<Topic>>,
    pub cost_per_1k_tokens: Option<f64>,
    pub enabled: bool,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            provider: String::new(),
            model: String::new(),
            api_key_env: None,
            api_key: None,
            base_url: None,
            timeout_seconds: None,
            max_tokens: 1000,
            temperature: 0.7,
            strengths: None,
            weaknesses: None,
            cost_per_1k_tokens: None,
            enabled: true,
        }
    }
}

impl FileBackendConfig {
    pub fn for_provider(kind: ProviderKind) -> Self {
        Self {
            provider: kind.as_str().to_string(),
            model: kind.default_model().to_string(),
            ..Default::default()
        }
    }

    /// Provider kind; `None` for an unknown provider name
    pub fn provider_kind(&self) -> Option<ProviderKind> {
        self.provider.parse().ok()
    }

    /// API key from `api_key`, else from the configured environment variable
    pub fn resolve_api_key(&self, kind: ProviderKind) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| {
                let var = self
                    .api_key_env
                    .as_deref()
                    .unwrap_or(kind.default_api_key_env());
                std::env::var(var).ok()
            })
            .filter(|key| !key.trim().is_empty())
    }
}

/// The backends configured out of the box
pub fn default_backends() -> BTreeMap<String, FileBackendConfig> {
    ProviderKind::all()
        .into_iter()
        .map(|kind| (kind.as_str().to_string(), FileBackendConfig::for_provider(kind)))
        .collect()
}
