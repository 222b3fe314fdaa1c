//! Capability registry
//!
//! Maps each provider to the capability serving it. The registry is built
//! once by the caller and handed to the orchestrator, so tests can inject
//! scripted capabilities.

use super::capability::Capability;
use council_domain::ProviderKind;
use std::sync::Arc;

/// Ordered provider → capability map
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    entries: Vec<(ProviderKind, Arc<dyn Capability>)>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability under its own provider key, replacing any
    /// previous entry for that provider in place
    pub fn register(&mut self, capability: Arc<dyn Capability>) {
        self.register_as(capability.provider(), capability);
    }

    /// Register a capability under an explicit provider key
    pub fn register_as(&mut self, provider: ProviderKind, capability: Arc<dyn Capability>) {
        if let Some(entry) = self.entries.iter_mut().find(|(p, _)| *p == provider) {
            entry.1 = capability;
        } else {
            self.entries.push((provider, capability));
        }
    }

    pub fn with(mut self, capability: Arc<dyn Capability>) -> Self {
        self.register(capability);
        self
    }

    pub fn get(&self, provider: ProviderKind) -> Option<Arc<dyn Capability>> {
        self.entries
            .iter()
            .find(|(p, _)| *p == provider)
            .map(|(_, c)| Arc::clone(c))
    }

    pub fn is_available(&self, provider: ProviderKind) -> bool {
        self.entries.iter().any(|(p, _)| *p == provider)
    }

    /// Registered providers in registration order
    pub fn available(&self) -> Vec<ProviderKind> {
        self.entries.iter().map(|(p, _)| *p).collect()
    }

    pub fn first_available(&self) -> Option<(ProviderKind, Arc<dyn Capability>)> {
        self.entries
            .first()
            .map(|(p, c)| (*p, Arc::clone(c)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("providers", &self.available())
            .finish()
    }
}
