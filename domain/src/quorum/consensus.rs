//! Consensus arithmetic
//!
//! A round reaches consensus when the share of AGREE votes among the votes
//! actually cast meets the panel's threshold. Members that failed to vote
//! are not part of the denominator; abstentions are.

use super::vote::VoteType;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Default share of agreeing voters required (80%)
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Vote counts for one round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub agree: usize,
    pub disagree: usize,
    pub abstain: usize,
}

impl VoteTally {
    pub fn new(agree: usize, disagree: usize, abstain: usize) -> Self {
        Self {
            agree,
            disagree,
            abstain,
        }
    }

    /// Count a sequence of votes
    pub fn from_votes<'a>(votes: impl IntoIterator<Item = &'a VoteType>) -> Self {
        let mut tally = Self::default();
        for vote in votes {
            tally.record(*vote);
        }
        tally
    }

    pub fn record(&mut self, vote: VoteType) {
        match vote {
            VoteType::Agree => self.agree += 1,
            VoteType::Disagree => self.disagree += 1,
            VoteType::Abstain => self.abstain += 1,
        }
    }

    /// Number of votes actually cast
    pub fn total(&self) -> usize {
        self.agree + self.disagree + self.abstain
    }

    /// Share of cast votes that agree; 0.0 when nothing was cast
    pub fn agree_ratio(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.agree as f64 / total as f64
        }
    }
}

impl std::fmt::Display for VoteTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Agree({}), Disagree({}), Abstain({})",
            self.agree, self.disagree, self.abstain
        )
    }
}

/// Fraction of agreeing voters a panel requires, in (0, 1]
///
/// # Example
///
/// ```
/// use council_domain::quorum::{ConsensusThreshold, VoteTally};
///
/// let threshold = ConsensusThreshold::new(0.8).unwrap();
/// assert!(threshold.is_satisfied(&VoteTally::new(4, 1, 0)));  // 4/5 = 0.8
/// assert!(!threshold.is_satisfied(&VoteTally::new(1, 1, 0))); // 1/2 < 0.8
/// assert!(!threshold.is_satisfied(&VoteTally::default()));    // nothing cast
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConsensusThreshold(f64);

impl ConsensusThreshold {
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if value.is_finite() && value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidThreshold(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whether a tally meets this threshold. An empty tally never does.
    pub fn is_satisfied(&self, tally: &VoteTally) -> bool {
        tally.total() > 0 && tally.agree_ratio() >= self.0
    }
}

impl Default for ConsensusThreshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl TryFrom<f64> for ConsensusThreshold {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConsensusThreshold> for f64 {
    fn from(threshold: ConsensusThreshold) -> Self {
        threshold.0
    }
}

impl std::fmt::Display for ConsensusThreshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}%", self.0 * 100.0)
    }
}
