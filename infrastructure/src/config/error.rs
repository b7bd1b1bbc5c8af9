//! Configuration errors

use chorus_domain::{ConfigIssue, DomainError};
use thiserror::Error;

/// Errors raised while turning configuration into a running system
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid configuration:\n{}", format_issues(.0))]
    Invalid(Vec<ConfigIssue>),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("backends.{backend}: unknown provider '{provider}'")]
    UnknownProvider { backend: String, provider: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

fn format_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("  - {}", i.message))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ConfigError {
    /// Fail on error-severity issues; warnings pass through
    pub fn check(issues: &[ConfigIssue]) -> Result<(), ConfigError> {
        let errors: Vec<ConfigIssue> = issues.iter().filter(|i| i.is_error()).cloned().collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}
