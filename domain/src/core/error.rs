//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Everything here is either a startup/configuration error or a caller-side
/// cancellation. Per-backend failures are not errors at this level; they are
/// recorded as [`crate::BackendFailure`] values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("No backend available: the capability registry is empty")]
    NoBackendAvailable,

    #[error("Unknown mixer strategy: {0}. Valid: best_parts, average, vote")]
    UnknownStrategy(String),

    #[error("Unknown agreement rule: {0}. Valid: majority, unanimous, atleast:N, N%")]
    UnknownAgreementRule(String),

    #[error("Backend registered twice: {0}")]
    DuplicateBackend(String),

    #[error("Invalid backend name: {0:?}")]
    InvalidBackendName(String),

    #[error("Invalid threshold {name}={value}: must be within [0, 1]")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("Invalid topic vocabulary: {0}")]
    InvalidVocabulary(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}
