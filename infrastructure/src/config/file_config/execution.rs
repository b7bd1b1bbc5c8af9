//! Execution configuration from TOML (`[execution]` section)

use serde::{Deserialize, Serialize};

/// Raw execution configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    /// Per-backend timeout in seconds, unless the backend overrides it
    pub timeout_seconds: u64,
    /// System prompt sent with every query (adapter default when unset)
    pub system_prompt: Option<String>,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 60,
            system_prompt: None,
        }
    }
}
