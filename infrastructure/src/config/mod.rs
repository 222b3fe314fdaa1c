//! Configuration file loading for agents-council
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables prefixed `COUNCIL_` (nested keys split on `__`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./council.toml` or `./.council.toml`
//! 4. Global: `$XDG_CONFIG_HOME/agents-council/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileConfig, FileCouncilConfig, FileDeliberationConfig, FileLoggingConfig,
    FileMemberConfig, FileOllamaConfig, FileOutputConfig, FileProvidersConfig, FileStorageConfig,
    Severity,
};
pub use loader::{ConfigError, ConfigLoader};
