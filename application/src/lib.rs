//! Application layer for chorus
//!
//! This crate contains use cases, port definitions, the capability registry
//! and application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    backend::{Backend, BackendError},
    progress::{NoProgress, ProgressNotifier},
};
pub use registry::{CapabilityRegistry, CapabilityRegistryBuilder};
pub use use_cases::answer_query::AnswerQueryUseCase;
pub use use_cases::execute_backends::ExecutionCoordinator;
