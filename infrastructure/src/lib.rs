//! Infrastructure layer for agents-council
//!
//! Adapters for the ports defined in the application layer: configuration
//! loading, the Ollama provider, JSON persistence and JSONL event logging.

pub mod config;
pub mod logging;
pub mod providers;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigIssue, ConfigLoader, FileConfig, FileCouncilConfig,
    FileDeliberationConfig, FileLoggingConfig, FileMemberConfig, FileOllamaConfig,
    FileOutputConfig, FileProvidersConfig, FileStorageConfig, Severity,
};
pub use logging::JsonlEventLogger;
pub use providers::{OllamaCapability, build_registry};
pub use storage::{INTERRUPTED_MESSAGE, JsonDeliberationStore, StoreError};
