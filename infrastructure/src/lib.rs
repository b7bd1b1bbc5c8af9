//! Infrastructure layer for chorus
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: HTTP provider backends with retry, and
//! configuration file loading.

pub mod config;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, FileConfig, FileOutputConfig, FileReplConfig};
pub use providers::{
    AnthropicBackend, GoogleBackend, OpenAiBackend, ProviderKind, RetryPolicy, build_registry,
    execution_params,
};
