//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod backends;
mod execution;
mod mixer;
mod output;
mod repl;
mod retry;
mod router;

pub use backends::{FileBackendConfig, default_backends};
pub use execution::FileExecutionConfig;
pub use mixer::FileMixerConfig;
pub use output::FileOutputConfig;
pub use repl::FileReplConfig;
pub use retry::FileRetryConfig;
pub use router::FileRouterConfig;

use chorus_domain::config::validation::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Topic classification and backend selection
    pub router: FileRouterConfig,
    /// Response fusion
    pub mixer: FileMixerConfig,
    /// Timeouts and system prompt
    pub execution: FileExecutionConfig,
    /// Provider retry policy
    pub retry: FileRetryConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Backends by name
    pub backends: BTreeMap<String, FileBackendConfig>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            router: FileRouterConfig::default(),
            mixer: FileMixerConfig::default(),
            execution: FileExecutionConfig::default(),
            retry: FileRetryConfig::default(),
            output: FileOutputConfig::default(),
            repl: FileReplConfig::default(),
            backends: default_backends(),
        }
    }
}

impl FileConfig {
    /// Enabled backends, in name order
    pub fn enabled_backends(&self) -> impl Iterator<Item = (&String, &FileBackendConfig)> {
        self.backends.iter().filter(|(_, b)| b.enabled)
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Mixer strategy, vote rule and thresholds
    /// 2. Timeouts and retry attempts
    /// 3. Backend providers
    /// 4. Backend names referenced by the router
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Mixer
        issues.extend(self.mixer.validate());

        // 2. Timeouts and retries
        if self.execution.timeout_seconds == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "execution.timeout_seconds".to_string(),
                    value: "0".to_string(),
                },
                "execution.timeout_seconds cannot be 0",
            ));
        }
        if self.retry.max_attempts == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "retry.max_attempts".to_string(),
                    value: "0".to_string(),
                },
                "retry.max_attempts must be at least 1",
            ));
        }

        // 3. Backends
        for (name, backend) in &self.backends {
            if backend.provider_kind().is_none() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: format!("backends.{}.provider", name),
                        value: backend.provider.clone(),
                        valid_values: vec![
                            "openai".to_string(),
                            "anthropic".to_string(),
                            "google".to_string(),
                        ],
                    },
                    format!(
                        "backends.{}.provider: unknown provider '{}'",
                        name, backend.provider
                    ),
                ));
            }
            if backend.timeout_seconds == Some(0) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::OutOfRange {
                        field: format!("backends.{}.timeout_seconds", name),
                        value: "0".to_string(),
                    },
                    format!("backends.{}.timeout_seconds cannot be 0", name),
                ));
            }
        }

        let enabled: Vec<&str> = self.enabled_backends().map(|(n, _)| n.as_str()).collect();
        if enabled.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoBackends,
                "no backend is enabled",
            ));
        }

        // 4. Router references
        if !enabled.is_empty() && !enabled.contains(&self.router.default_model.as_str()) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnknownBackend {
                    field: "router.default_model".to_string(),
                    name: self.router.default_model.clone(),
                },
                format!(
                    "router.default_model: '{}' is not an enabled backend, the highest-priority backend is used instead",
                    self.router.default_model
                ),
            ));
        }
        for name in &self.router.priority {
            if !self.backends.contains_key(name) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::UnknownBackend {
                        field: "router.priority".to_string(),
                        name: name.clone(),
                    },
                    format!("router.priority: '{}' is not a configured backend", name),
                ));
            }
        }

        issues
    }
}
