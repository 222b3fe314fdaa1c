//! Provider adapters implementing the [`Capability`] port.

pub mod ollama;

pub use ollama::OllamaCapability;

use crate::config::FileConfig;
use council_application::{Capability, CapabilityRegistry};
use std::sync::Arc;
use tracing::info;

/// Build the capability registry from the enabled providers
pub fn build_registry(config: &FileConfig) -> Result<CapabilityRegistry, reqwest::Error> {
    let mut registry = CapabilityRegistry::new();

    if config.providers.ollama.enabled {
        let ollama = OllamaCapability::new(&config.providers.ollama)?;
        info!(
            "Registered Ollama provider at {} (default model {})",
            config.providers.ollama.base_url,
            ollama.default_model()
        );
        registry.register(Arc::new(ollama));
    }

    Ok(registry)
}
