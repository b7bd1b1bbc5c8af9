//! Execution parameters for backend fan-out.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Timeouts and prompt settings used by the execution coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Timeout applied to a backend without its own override.
    pub default_timeout: Duration,
    /// Per-backend timeout overrides, by backend name.
    pub backend_timeouts: HashMap<String, Duration>,
    /// System prompt sent with every query; adapters use their own when `None`.
    pub system_prompt: Option<String>,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(60),
            backend_timeouts: HashMap::new(),
            system_prompt: None,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_backend_timeout(mut self, backend: impl Into<String>, timeout: Duration) -> Self {
        self.backend_timeouts.insert(backend.into(), timeout);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Effective timeout for `backend`
    pub fn timeout_for(&self, backend: &str) -> Duration {
        self.backend_timeouts
            .get(backend)
            .copied()
            .unwrap_or(self.default_timeout)
    }
}
