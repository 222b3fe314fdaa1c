//! Panel (council) definition.

use super::member::PanelMember;
use super::provider::ProviderKind;
use crate::core::error::DomainError;
use crate::core::ids::PanelId;
use crate::quorum::consensus::ConsensusThreshold;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Minimum members required for a deliberation
pub const MIN_MEMBERS: usize = 2;

/// Default round budget
pub const DEFAULT_MAX_ROUNDS: u32 = 5;

/// A fixed set of members plus the rules they deliberate under.
///
/// Immutable for the duration of a run; the orchestrator only ever borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub id: PanelId,
    pub name: String,
    pub members: Vec<PanelMember>,
    pub max_rounds: u32,
    pub consensus_threshold: ConsensusThreshold,
    pub created_at: DateTime<Utc>,
}

impl Panel {
    /// Build and validate a panel with the default round budget and threshold
    pub fn new(name: impl Into<String>, members: Vec<PanelMember>) -> Result<Self, DomainError> {
        let panel = Self {
            id: PanelId::generate(),
            name: name.into(),
            members,
            max_rounds: DEFAULT_MAX_ROUNDS,
            consensus_threshold: ConsensusThreshold::default(),
            created_at: Utc::now(),
        };
        panel.validate()?;
        Ok(panel)
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Result<Self, DomainError> {
        self.max_rounds = max_rounds;
        self.validate()?;
        Ok(self)
    }

    pub fn with_threshold(mut self, threshold: ConsensusThreshold) -> Self {
        self.consensus_threshold = threshold;
        self
    }

    /// Check every structural rule of a panel.
    ///
    /// Deserialized panels bypass the constructor, so the orchestrator calls
    /// this again before running.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.members.len() < MIN_MEMBERS {
            return Err(DomainError::TooFewMembers {
                min: MIN_MEMBERS,
                actual: self.members.len(),
            });
        }
        if self.max_rounds == 0 {
            return Err(DomainError::ZeroRoundBudget);
        }
        ConsensusThreshold::new(self.consensus_threshold.value())?;

        let mut seen = HashSet::new();
        for member in &self.members {
            if !seen.insert(member.id) {
                return Err(DomainError::DuplicateMember(member.id.to_string()));
            }
        }
        Ok(())
    }

    /// Provider and model the summarizer should try first
    pub fn preferred_summarizer(&self) -> Option<(ProviderKind, Option<&str>)> {
        self.members
            .first()
            .map(|m| (m.provider, m.model.as_deref()))
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Markdown bullet list of members, used in summary prompts
    pub fn roster(&self) -> String {
        self.members
            .iter()
            .map(|m| format!("- {}: {} ({})", m.name, m.role, m.provider))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::member::Role;

    fn two_members() -> Vec<PanelMember> {
        vec![
            PanelMember::new("Ada", ProviderKind::Ollama, Role::TechStrategist),
            PanelMember::new("Grace", ProviderKind::OpenAi, Role::DevilsAdvocate),
        ]
    }

    #[test]
    fn test_defaults() {
        let panel = Panel::new("Board", two_members()).unwrap();
        assert_eq!(panel.max_rounds, 5);
        assert_eq!(panel.consensus_threshold.value(), 0.8);
    }

    #[test]
    fn test_rejects_single_member() {
        let mut members = two_members();
        members.pop();
        assert_eq!(
            Panel::new("Solo", members).unwrap_err(),
            DomainError::TooFewMembers { min: 2, actual: 1 }
        );
    }

    #[test]
    fn test_rejects_zero_rounds() {
        let panel = Panel::new("Board", two_members()).unwrap();
        assert_eq!(
            panel.with_max_rounds(0).unwrap_err(),
            DomainError::ZeroRoundBudget
        );
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let a = PanelMember::new("Ada", ProviderKind::Ollama, Role::TechStrategist);
        let b = a.clone();
        assert!(matches!(
            Panel::new("Twins", vec![a, b]).unwrap_err(),
            DomainError::DuplicateMember(_)
        ));
    }

    #[test]
    fn test_preferred_summarizer_is_first_member() {
        let mut members = two_members();
        members[0].model = Some("llama3".to_string());
        let panel = Panel::new("Board", members).unwrap();
        assert_eq!(
            panel.preferred_summarizer(),
            Some((ProviderKind::Ollama, Some("llama3")))
        );
    }

    #[test]
    fn test_roster() {
        let panel = Panel::new("Board", two_members()).unwrap();
        let roster = panel.roster();
        assert!(roster.contains("- Ada: tech_strategist (ollama)"));
        assert!(roster.contains("- Grace: devils_advocate (openai)"));
    }
}
