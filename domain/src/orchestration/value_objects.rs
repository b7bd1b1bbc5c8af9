//! Orchestration value objects - immutable result types for one query.
//!
//! - [`BackendResult`] - one invoked backend's success or failure
//! - [`ResponseSet`] - all results of one query, in invocation order
//! - [`ModelAnswer`] - a successful response, as consumed by the mixer
//! - [`FinalResponse`] - what the caller receives

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Why a backend invocation did not produce text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Missing or rejected credentials, or the backend is switched off
    Unavailable,
    /// The per-backend timeout elapsed
    Timeout,
    /// Network or provider error after the adapter's own retries
    Transport,
    /// The invocation task was aborted or panicked
    Aborted,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Unavailable => "unavailable",
            FailureKind::Timeout => "timeout",
            FailureKind::Transport => "transport",
            FailureKind::Aborted => "aborted",
        }
    }
}

/// A recorded backend failure with a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendFailure {
    pub kind: FailureKind,
    pub reason: String,
}

impl BackendFailure {
    pub fn new(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(
            FailureKind::Timeout,
            format!("no response within {:.1}s", after.as_secs_f64()),
        )
    }
}

impl std::fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.reason, self.kind.as_str())
    }
}

/// Outcome of a single backend invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    Success(String),
    Failure(BackendFailure),
}

/// Result of invoking one backend for one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendResult {
    pub backend: String,
    pub outcome: Outcome,
}

impl BackendResult {
    pub fn success(backend: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            outcome: Outcome::Success(text.into()),
        }
    }

    pub fn failure(backend: impl Into<String>, failure: BackendFailure) -> Self {
        Self {
            backend: backend.into(),
            outcome: Outcome::Failure(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    /// The successful response, if any
    pub fn answer(&self) -> Option<ModelAnswer> {
        match &self.outcome {
            Outcome::Success(text) => Some(ModelAnswer::new(self.backend.clone(), text.clone())),
            Outcome::Failure(_) => None,
        }
    }

    pub fn failure_ref(&self) -> Option<&BackendFailure> {
        match &self.outcome {
            Outcome::Success(_) => None,
            Outcome::Failure(f) => Some(f),
        }
    }
}

/// A successful backend response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelAnswer {
    pub backend: String,
    pub text: String,
}

impl ModelAnswer {
    pub fn new(backend: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            text: text.into(),
        }
    }
}

/// All results of one query, one per invoked backend, in invocation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSet {
    results: Vec<BackendResult>,
}

impl ResponseSet {
    pub fn new(results: Vec<BackendResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[BackendResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, backend: &str) -> Option<&BackendResult> {
        self.results.iter().find(|r| r.backend == backend)
    }

    /// Successful answers in invocation order
    pub fn successes(&self) -> Vec<ModelAnswer> {
        self.results.iter().filter_map(BackendResult::answer).collect()
    }

    /// Failures in invocation order
    pub fn failures(&self) -> Vec<(&str, &BackendFailure)> {
        self.results
            .iter()
            .filter_map(|r| r.failure_ref().map(|f| (r.backend.as_str(), f)))
            .collect()
    }
}

impl IntoIterator for ResponseSet {
    type Item = BackendResult;
    type IntoIter = std::vec::IntoIter<BackendResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

/// The answer returned to the caller
///
/// Serializes as `{"message": ..., "models_used": [...]}`. An empty
/// `models_used` means every consulted backend failed and `message`
/// explains why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalResponse {
    #[serde(rename = "message")]
    pub text: String,
    pub models_used: Vec<String>,
}

impl FinalResponse {
    pub fn new(text: impl Into<String>, models_used: Vec<String>) -> Self {
        Self {
            text: text.into(),
            models_used,
        }
    }

    /// A user-visible error response; no model contributed
    pub fn degraded(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }

    pub fn is_degraded(&self) -> bool {
        self.models_used.is_empty()
    }
}
