//! Capability registry
//!
//! The set of available backends, fixed at startup. Built once with
//! [`CapabilityRegistryBuilder`] and shared read-only afterwards.

use crate::ports::backend::Backend;
use chorus_domain::{DomainError, ModelCapabilities};
use std::sync::Arc;

/// Collects backends before the registry is frozen
#[derive(Default)]
pub struct CapabilityRegistryBuilder {
    backends: Vec<Arc<dyn Backend>>,
}

impl CapabilityRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a backend; names must be non-blank and unique
    pub fn register(mut self, backend: Arc<dyn Backend>) -> Result<Self, DomainError> {
        let name = backend.name();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidBackendName(name.to_string()));
        }
        if self.backends.iter().any(|b| b.name() == name) {
            return Err(DomainError::DuplicateBackend(name.to_string()));
        }
        tracing::debug!(backend = name, "Registered backend");
        self.backends.push(backend);
        Ok(self)
    }

    pub fn build(self) -> CapabilityRegistry {
        let capabilities = self
            .backends
            .iter()
            .map(|b| b.capabilities().clone())
            .collect();
        CapabilityRegistry {
            backends: self.backends,
            capabilities,
        }
    }
}

/// Immutable set of registered backends, in registration order
pub struct CapabilityRegistry {
    backends: Vec<Arc<dyn Backend>>,
    capabilities: Vec<ModelCapabilities>,
}

impl CapabilityRegistry {
    pub fn builder() -> CapabilityRegistryBuilder {
        CapabilityRegistryBuilder::new()
    }

    /// Capability descriptors in registration order
    pub fn all(&self) -> &[ModelCapabilities] {
        &self.capabilities
    }

    pub fn by_name(&self, name: &str) -> Option<&ModelCapabilities> {
        self.capabilities.iter().find(|c| c.name == name)
    }

    pub fn backend(&self, name: &str) -> Option<Arc<dyn Backend>> {
        self.backends.iter().find(|b| b.name() == name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.capabilities.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("backends", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
