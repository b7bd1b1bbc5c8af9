//! Progress notification port
//!
//! Defines the interface for reporting progress while a query is answered.

use chorus_domain::{MixStrategy, ModelCapabilities, Topic};
use std::collections::BTreeSet;

/// Callback for progress updates during one `answer` call
///
/// Implementations live in the presentation layer.
pub trait ProgressNotifier: Send + Sync {
    /// Called once the router has selected backends
    fn on_route(&self, topics: &BTreeSet<Topic>, selected: &[ModelCapabilities]);

    /// Called as each backend settles
    fn on_backend_complete(&self, backend: &str, success: bool);

    /// Called before fusing two or more responses
    fn on_mix(&self, _strategy: MixStrategy, _responses: usize) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_route(&self, _topics: &BTreeSet<Topic>, _selected: &[ModelCapabilities]) {}
    fn on_backend_complete(&self, _backend: &str, _success: bool) {}
}
