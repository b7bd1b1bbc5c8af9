//! Backend port
//!
//! Defines the interface every LLM provider adapter implements.

use async_trait::async_trait;
use chorus_domain::{BackendFailure, FailureKind, ModelCapabilities};
use thiserror::Error;

/// Errors a backend invocation can produce
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Missing or rejected credentials; the text is shown to the user
    #[error("{0}")]
    Unavailable(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),

    /// Rejected by the provider; retrying the same request will not help
    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            BackendError::Unavailable(_) => FailureKind::Unavailable,
            BackendError::Timeout => FailureKind::Timeout,
            BackendError::Transport(_)
            | BackendError::Rejected { .. }
            | BackendError::RetriesExhausted { .. }
            | BackendError::InvalidResponse(_) => FailureKind::Transport,
        }
    }

    /// Whether another attempt may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, BackendError::Timeout | BackendError::Transport(_))
    }

    pub fn to_failure(&self) -> BackendFailure {
        BackendFailure::new(self.failure_kind(), self.to_string())
    }
}

/// A language-model backend
///
/// Adapters live in the infrastructure layer; the application layer only
/// sees `Arc<dyn Backend>`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Immutable capability descriptor
    fn capabilities(&self) -> &ModelCapabilities;

    /// Unique backend name, equal to `capabilities().name`
    fn name(&self) -> &str {
        &self.capabilities().name
    }

    /// Generate a response for `prompt`
    ///
    /// `system_prompt` defaults to the adapter's own when `None`.
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kinds() {
        assert_eq!(
            BackendError::Unavailable("no key".into()).failure_kind(),
            FailureKind::Unavailable
        );
        assert_eq!(BackendError::Timeout.failure_kind(), FailureKind::Timeout);
        assert_eq!(
            BackendError::RetriesExhausted {
                attempts: 3,
                last: "503".into()
            }
            .failure_kind(),
            FailureKind::Transport
        );
    }

    #[test]
    fn test_unavailable_message_is_verbatim() {
        let failure = BackendError::Unavailable("OpenAI API key not configured.".into()).to_failure();
        assert_eq!(failure.reason, "OpenAI API key not configured.");
    }

    #[test]
    fn test_transient() {
        assert!(BackendError::Transport("reset".into()).is_transient());
        assert!(!BackendError::Unavailable("401".into()).is_transient());
        assert!(!BackendError::InvalidResponse("bad json".into()).is_transient());
        assert!(
            !BackendError::Rejected {
                status: 400,
                message: "bad request".into()
            }
            .is_transient()
        );
    }
}
