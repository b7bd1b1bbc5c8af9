//! Retry configuration from TOML (`[retry]` section)

use serde::{Deserialize, Serialize};

/// Raw retry configuration, applied to every provider adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    /// Total attempts including the first
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub multiplier: f64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 2000,
            max_backoff_ms: 10_000,
            multiplier: 2.0,
        }
    }
}
