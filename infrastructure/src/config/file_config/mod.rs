//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod council;
mod deliberation;
mod output;
mod providers;

pub use council::{FileCouncilConfig, FileMemberConfig};
pub use deliberation::FileDeliberationConfig;
pub use output::{FileLoggingConfig, FileOutputConfig, FileStorageConfig};
pub use providers::{FileOllamaConfig, FileProvidersConfig};

use council_domain::{ConsensusThreshold, MIN_MEMBERS, ProviderKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Panel definition
    pub council: FileCouncilConfig,
    /// Per-call timeouts and token budgets
    pub deliberation: FileDeliberationConfig,
    /// Provider settings
    pub providers: FileProvidersConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Deliberation store
    pub storage: FileStorageConfig,
    /// Event transcript
    pub logging: FileLoggingConfig,
}

/// How serious a configuration issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The configuration still works, possibly not as intended
    Warning,
    /// A deliberation cannot start with this configuration
    Error,
}

/// One problem found by [`FileConfig::validate`]
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Dotted path of the offending key
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks:
    /// 1. Council rules (round budget, threshold, member count)
    /// 2. Members (names, provider keys, providers without an adapter)
    /// 3. Zero timeouts and token budgets
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let council = &self.council;

        // 1. Council rules
        if council.max_rounds == 0 {
            issues.push(ConfigIssue::error(
                "council.max_rounds",
                "round budget must be at least 1",
            ));
        }
        if let Err(e) = ConsensusThreshold::new(council.consensus_threshold) {
            issues.push(ConfigIssue::error(
                "council.consensus_threshold",
                e.to_string(),
            ));
        }
        if council.members.len() < MIN_MEMBERS {
            issues.push(ConfigIssue::error(
                "council.members",
                format!(
                    "a council needs at least {} members, found {}",
                    MIN_MEMBERS,
                    council.members.len()
                ),
            ));
        }

        // 2. Members
        let mut seen = HashSet::new();
        for (i, member) in council.members.iter().enumerate() {
            let field = format!("council.members[{}]", i);
            if member.name.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    format!("{}.name", field),
                    "member name cannot be empty",
                ));
            } else if !seen.insert(member.name.trim().to_lowercase()) {
                issues.push(ConfigIssue::warning(
                    format!("{}.name", field),
                    format!("duplicate member name '{}'", member.name),
                ));
            }

            match member.parse_provider() {
                Ok(provider) if !self.has_adapter(provider) => {
                    issues.push(ConfigIssue::warning(
                        format!("{}.provider", field),
                        format!(
                            "no enabled adapter for provider '{}'; {} will not respond",
                            provider, member.name
                        ),
                    ));
                }
                Ok(_) => {}
                Err(e) => issues.push(ConfigIssue::error(
                    format!("{}.provider", field),
                    e.to_string(),
                )),
            }
        }

        // 3. Limits
        let d = &self.deliberation;
        for (key, value) in [
            ("response_timeout_secs", d.response_timeout_secs),
            ("vote_timeout_secs", d.vote_timeout_secs),
            ("summary_timeout_secs", d.summary_timeout_secs),
        ] {
            if value == 0 {
                issues.push(ConfigIssue::error(
                    format!("deliberation.{}", key),
                    "timeout cannot be 0",
                ));
            }
        }
        for (key, value) in [
            ("response_max_tokens", d.response_max_tokens),
            ("vote_max_tokens", d.vote_max_tokens),
            ("summary_max_tokens", d.summary_max_tokens),
            ("points_max_tokens", d.points_max_tokens),
        ] {
            if value == 0 {
                issues.push(ConfigIssue::error(
                    format!("deliberation.{}", key),
                    "token budget cannot be 0",
                ));
            }
        }

        issues
    }

    /// Whether an adapter will be registered for `provider`
    pub fn has_adapter(&self, provider: ProviderKind) -> bool {
        match provider {
            ProviderKind::Ollama => self.providers.ollama.enabled,
            _ => false,
        }
    }
}
