//! Vote types for panel consensus
//!
//! This module defines the voting primitives each member casts at the end of
//! a round.

use serde::{Deserialize, Serialize};

/// A single member's stance at the end of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    /// The panel is converging on a reasonable conclusion
    Agree,
    /// Significant concerns remain that need further discussion
    Disagree,
    /// Uncertain, or the answer could not be read
    Abstain,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Agree => "agree",
            VoteType::Disagree => "disagree",
            VoteType::Abstain => "abstain",
        }
    }

    /// Single-character mark for compact displays (e.g., "[●○-]")
    pub fn mark(&self) -> char {
        match self {
            VoteType::Agree => '●',
            VoteType::Disagree => '○',
            VoteType::Abstain => '-',
        }
    }
}

impl std::fmt::Display for VoteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A vote read out of a member's free-text answer, plus the reasoning behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedVote {
    pub vote: VoteType,
    pub rationale: String,
}

impl ParsedVote {
    pub fn new(vote: VoteType, rationale: impl Into<String>) -> Self {
        Self {
            vote,
            rationale: rationale.into(),
        }
    }
}
