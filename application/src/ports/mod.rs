//! Port definitions (interfaces for external adapters)

pub mod backend;
pub mod progress;
