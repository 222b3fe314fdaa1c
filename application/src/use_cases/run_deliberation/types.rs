//! Error and outcome types for the RunDeliberation use case.

use council_domain::DomainError;
use thiserror::Error;

/// Orchestration-level failures.
///
/// Member call failures never surface here; they are absorbed per round as
/// [`MemberOutcome::Failure`].
#[derive(Error, Debug)]
pub enum DeliberationError {
    #[error("Invalid panel: {0}")]
    InvalidPanel(DomainError),

    #[error("Deliberation cannot run: {0}")]
    InvalidState(String),

    #[error("Member task failed: {0}")]
    MemberTask(String),

    #[error("Invariant violated: {0}")]
    Invariant(#[from] DomainError),
}

/// Result of one member call within a phase
#[derive(Debug, Clone, PartialEq)]
pub enum MemberOutcome<T> {
    Success(T),
    Failure(String),
}

impl<T> MemberOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, MemberOutcome::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            MemberOutcome::Success(value) => Some(value),
            MemberOutcome::Failure(_) => None,
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for MemberOutcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => MemberOutcome::Success(value),
            Err(e) => MemberOutcome::Failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_result() {
        let ok: MemberOutcome<u32> = Ok::<_, String>(3).into();
        assert_eq!(ok, MemberOutcome::Success(3));

        let failed: MemberOutcome<u32> = Err::<u32, _>("Timed out").into();
        assert!(!failed.is_success());
        assert_eq!(failed, MemberOutcome::Failure("Timed out".to_string()));
        assert_eq!(failed.success(), None);
    }
}
