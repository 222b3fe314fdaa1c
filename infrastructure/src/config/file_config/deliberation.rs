//! Deliberation limits from TOML (`[deliberation]` section)

use council_application::DeliberationParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw per-call timeouts and token budgets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDeliberationConfig {
    pub response_timeout_secs: u64,
    pub vote_timeout_secs: u64,
    pub summary_timeout_secs: u64,
    pub response_max_tokens: u32,
    pub vote_max_tokens: u32,
    pub summary_max_tokens: u32,
    pub points_max_tokens: u32,
}

impl Default for FileDeliberationConfig {
    fn default() -> Self {
        let params = DeliberationParams::default();
        Self {
            response_timeout_secs: params.response_timeout.as_secs(),
            vote_timeout_secs: params.vote_timeout.as_secs(),
            summary_timeout_secs: params.summary_timeout.as_secs(),
            response_max_tokens: params.response_max_tokens,
            vote_max_tokens: params.vote_max_tokens,
            summary_max_tokens: params.summary_max_tokens,
            points_max_tokens: params.points_max_tokens,
        }
    }
}

impl FileDeliberationConfig {
    pub fn to_params(&self) -> DeliberationParams {
        DeliberationParams {
            response_timeout: Duration::from_secs(self.response_timeout_secs),
            vote_timeout: Duration::from_secs(self.vote_timeout_secs),
            summary_timeout: Duration::from_secs(self.summary_timeout_secs),
            response_max_tokens: self.response_max_tokens,
            vote_max_tokens: self.vote_max_tokens,
            summary_max_tokens: self.summary_max_tokens,
            points_max_tokens: self.points_max_tokens,
        }
    }
}
