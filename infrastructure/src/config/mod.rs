//! Configuration file loading for chorus
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CHORUS_*` environment variables, e.g. `CHORUS_MIXER__STRATEGY=vote`
//! 2. `--config <path>` specified file
//! 3. Project root: `./chorus.toml` or `./.chorus.toml`
//! 4. Global: `$XDG_CONFIG_HOME/chorus/config.toml`
//! 5. Default values

mod error;
mod file_config;
mod loader;

pub use error::ConfigError;
pub use file_config::{
    FileBackendConfig, FileConfig, FileExecutionConfig, FileMixerConfig, FileOutputConfig,
    FileReplConfig, FileRetryConfig, FileRouterConfig, default_backends,
};
pub use loader::ConfigLoader;
