//! Domain error types

use crate::deliberation::status::DeliberationStatus;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Panel must have at least {min} members, got {actual}")]
    TooFewMembers { min: usize, actual: usize },

    #[error("Round budget must be a positive integer")]
    ZeroRoundBudget,

    #[error("Consensus threshold must be a fraction in (0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("Duplicate panel member id: {0}")]
    DuplicateMember(String),

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: DeliberationStatus,
        to: DeliberationStatus,
    },

    #[error("Round {actual} appended out of order (expected round {expected})")]
    RoundOutOfOrder { expected: u32, actual: u32 },

    #[error("Round {round} exceeds the round budget of {budget}")]
    RoundBudgetExceeded { round: u32, budget: u32 },

    #[error("Deliberation is not complete (status: {0})")]
    NotComplete(DeliberationStatus),

    #[error("Unknown value '{value}' for {field}")]
    UnknownValue { field: &'static str, value: String },
}

impl DomainError {
    /// Check if this error came from panel validation
    pub fn is_panel_error(&self) -> bool {
        matches!(
            self,
            DomainError::TooFewMembers { .. }
                | DomainError::ZeroRoundBudget
                | DomainError::InvalidThreshold(_)
                | DomainError::DuplicateMember(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_display() {
        let error = DomainError::InvalidTransition {
            from: DeliberationStatus::Cancelled,
            to: DeliberationStatus::InProgress,
        };
        assert_eq!(
            error.to_string(),
            "Invalid status transition: cancelled -> in_progress"
        );
    }

    #[test]
    fn test_is_panel_error() {
        assert!(DomainError::ZeroRoundBudget.is_panel_error());
        assert!(DomainError::InvalidThreshold(1.5).is_panel_error());
        assert!(!DomainError::InvalidTopic("empty".to_string()).is_panel_error());
    }
}
