//! LLM provider adapters
//!
//! One [`Backend`](chorus_application::Backend) implementation per hosted
//! provider, all sharing the HTTP plumbing in [`http`] and the retry
//! executor in [`retry`].

pub mod anthropic;
pub mod factory;
pub mod google;
pub mod http;
pub mod openai;
pub mod retry;

pub use anthropic::AnthropicBackend;
pub use factory::{build_registry, execution_params};
pub use google::GoogleBackend;
pub use http::AdapterSettings;
pub use openai::OpenAiBackend;
pub use retry::RetryPolicy;

use chorus_domain::{ModelCapabilities, Topic};
use std::fmt;
use std::str::FromStr;

/// Supported LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Google,
}

impl ProviderKind {
    pub fn all() -> [ProviderKind; 3] {
        [ProviderKind::OpenAi, ProviderKind::Anthropic, ProviderKind::Google]
    }

    /// Identifier used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Google => "google",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Google => "Google",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4",
            ProviderKind::Anthropic => "claude-3-opus-20240229",
            ProviderKind::Google => "gemini-pro",
        }
    }

    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Google => "GOOGLE_API_KEY",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://api.openai.com",
            ProviderKind::Anthropic => "https://api.anthropic.com",
            ProviderKind::Google => "https://generativelanguage.googleapis.com",
        }
    }

    /// Built-in capability descriptor for a backend of this provider
    pub fn default_capabilities(&self, name: &str, model: &str) -> ModelCapabilities {
        let caps = ModelCapabilities::new(name).with_model(model);
        match self {
            ProviderKind::OpenAi => caps
                .with_strengths([
                    Topic::GeneralKnowledge,
                    Topic::Code,
                    Topic::Creative,
                    Topic::Reasoning,
                ])
                .with_weaknesses([Topic::RecentEvents, Topic::Math])
                .with_cost(0.03),
            ProviderKind::Anthropic => caps
                .with_strengths([
                    Topic::Reasoning,
                    Topic::Creative,
                    Topic::Code,
                    Topic::GeneralKnowledge,
                ])
                .with_weaknesses([Topic::RecentEvents])
                .with_cost(0.015),
            ProviderKind::Google => caps
                .with_strengths([Topic::RecentEvents, Topic::Math, Topic::GeneralKnowledge])
                .with_weaknesses([Topic::Creative])
                .with_cost(0.00125),
        }
    }

    /// Text of the `Unavailable` failure when no key is configured
    pub fn missing_key_message(&self, backend: &str, env_var: &str) -> String {
        format!(
            "{} API key not configured. Set {} or backends.{}.api_key.",
            self.display_name(),
            env_var,
            backend
        )
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "google" | "gemini" => Ok(ProviderKind::Google),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}
