//! Application-level configuration.
//!
//! - [`ExecutionParams`]: per-backend timeouts and the system prompt

pub mod execution_params;

pub use execution_params::ExecutionParams;
