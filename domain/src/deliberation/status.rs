//! Deliberation lifecycle states
//!
//! ```text
//! PENDING ──▶ IN_PROGRESS ──┬──▶ CONSENSUS_REACHED
//!    │                      ├──▶ ROUND_LIMIT_REACHED
//!    │                      ├──▶ ERROR
//!    └──────────────────────┴──▶ CANCELLED
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliberationStatus {
    #[default]
    Pending,
    InProgress,
    ConsensusReached,
    RoundLimitReached,
    Cancelled,
    Error,
}

impl DeliberationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliberationStatus::Pending => "pending",
            DeliberationStatus::InProgress => "in_progress",
            DeliberationStatus::ConsensusReached => "consensus_reached",
            DeliberationStatus::RoundLimitReached => "round_limit_reached",
            DeliberationStatus::Cancelled => "cancelled",
            DeliberationStatus::Error => "error",
        }
    }

    /// No transition leaves a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeliberationStatus::ConsensusReached
                | DeliberationStatus::RoundLimitReached
                | DeliberationStatus::Cancelled
                | DeliberationStatus::Error
        )
    }

    /// Terminal states reached by running the round loop to its end
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            DeliberationStatus::ConsensusReached | DeliberationStatus::RoundLimitReached
        )
    }

    pub fn can_transition_to(&self, next: DeliberationStatus) -> bool {
        use DeliberationStatus::*;
        match (self, next) {
            (Pending, InProgress) | (Pending, Cancelled) => true,
            (InProgress, next) => next.is_terminal(),
            _ => false,
        }
    }
}

impl std::fmt::Display for DeliberationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DeliberationStatus {
    type Err = crate::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use DeliberationStatus::*;
        [Pending, InProgress, ConsensusReached, RoundLimitReached, Cancelled, Error]
            .into_iter()
            .find(|status| status.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| crate::DomainError::UnknownValue {
                field: "status",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DeliberationStatus::*;

    #[test]
    fn test_pending_transitions() {
        assert!(Pending.can_transition_to(InProgress));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(ConsensusReached));
    }

    #[test]
    fn test_in_progress_reaches_every_terminal() {
        for next in [ConsensusReached, RoundLimitReached, Cancelled, Error] {
            assert!(InProgress.can_transition_to(next));
        }
        assert!(!InProgress.can_transition_to(Pending));
        assert!(!InProgress.can_transition_to(InProgress));
    }

    #[test]
    fn test_terminal_is_final() {
        for terminal in [ConsensusReached, RoundLimitReached, Cancelled, Error] {
            assert!(terminal.is_terminal());
            for next in [Pending, InProgress, ConsensusReached, RoundLimitReached, Cancelled, Error] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("round_limit_reached".parse::<DeliberationStatus>().ok(), Some(RoundLimitReached));
        assert_eq!(ConsensusReached.to_string(), "consensus_reached");
        assert!("done".parse::<DeliberationStatus>().is_err());
    }
}
