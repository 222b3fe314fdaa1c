//! Deliberation parameters: per-call limits for the round loop.
//!
//! [`DeliberationParams`] groups the timeouts and token budgets the
//! orchestrator applies to every member call. Round budget and consensus
//! threshold belong to the panel, not here.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-call timeouts and token budgets.
///
/// | Call              | Timeout | Max tokens |
/// |-------------------|---------|------------|
/// | Member response   | 90 s    | 1024       |
/// | Member vote       | 30 s    | 256        |
/// | Narrative summary | 120 s   | 2048       |
/// | Point extraction  | 120 s   | 512        |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationParams {
    pub response_timeout: Duration,
    pub vote_timeout: Duration,
    /// Applies to the narrative summary and each extraction call
    pub summary_timeout: Duration,
    pub response_max_tokens: u32,
    pub vote_max_tokens: u32,
    pub summary_max_tokens: u32,
    pub points_max_tokens: u32,
}

impl Default for DeliberationParams {
    fn default() -> Self {
        Self {
            response_timeout: Duration::from_secs(90),
            vote_timeout: Duration::from_secs(30),
            summary_timeout: Duration::from_secs(120),
            response_max_tokens: 1024,
            vote_max_tokens: 256,
            summary_max_tokens: 2048,
            points_max_tokens: 512,
        }
    }
}

impl DeliberationParams {
    // ==================== Builder Methods ====================

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    pub fn with_vote_timeout(mut self, timeout: Duration) -> Self {
        self.vote_timeout = timeout;
        self
    }

    pub fn with_summary_timeout(mut self, timeout: Duration) -> Self {
        self.summary_timeout = timeout;
        self
    }
}
