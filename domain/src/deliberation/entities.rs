//! Deliberation entities
//!
//! A [`Deliberation`] is one run of a panel on a topic. It accumulates
//! [`Round`]s, each holding the members' [`MemberResponse`]s and votes.
//! Only the orchestrator that owns a deliberation mutates it; everyone else
//! sees clones.

use super::status::DeliberationStatus;
use crate::core::error::DomainError;
use crate::core::ids::{DeliberationId, MemberId, PanelId};
use crate::panel::{PanelMember, ProviderKind, Role};
use crate::quorum::{ParsedVote, VoteTally, VoteType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One member's contribution to a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberResponse {
    pub member_id: MemberId,
    pub member_name: String,
    pub role: Role,
    pub provider: ProviderKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote: Option<VoteType>,
    /// Why the member voted the way it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl MemberResponse {
    pub fn new(member: &PanelMember, content: impl Into<String>) -> Self {
        Self {
            member_id: member.id,
            member_name: member.name.clone(),
            role: member.role.clone(),
            provider: member.provider,
            content: content.into(),
            vote: None,
            rationale: None,
            timestamp: Utc::now(),
        }
    }

    /// "Name (role)" label used in transcripts
    pub fn label(&self) -> String {
        format!("{} ({})", self.member_name, self.role)
    }
}

/// A completed round. Immutable once appended to a deliberation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// Round number (1-indexed)
    pub number: u32,
    /// Responses in panel member order; failed members are absent
    pub responses: Vec<MemberResponse>,
    /// Votes keyed by member; members whose vote call failed are absent
    pub votes: BTreeMap<MemberId, VoteType>,
    pub tally: VoteTally,
    pub consensus_reached: bool,
    pub timestamp: DateTime<Utc>,
}

impl Round {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            responses: Vec::new(),
            votes: BTreeMap::new(),
            tally: VoteTally::default(),
            consensus_reached: false,
            timestamp: Utc::now(),
        }
    }

    /// Record a member's vote and copy it onto that member's response, if
    /// the member responded this round
    pub fn record_vote(&mut self, member_id: MemberId, parsed: ParsedVote) {
        self.votes.insert(member_id, parsed.vote);
        if let Some(response) = self
            .responses
            .iter_mut()
            .find(|r| r.member_id == member_id)
        {
            response.vote = Some(parsed.vote);
            response.rationale = Some(parsed.rationale);
        }
    }

    /// Recount the tally from the recorded votes
    pub fn tally_votes(&mut self) -> VoteTally {
        self.tally = VoteTally::from_votes(self.votes.values());
        self.tally
    }
}

/// A complete deliberation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deliberation {
    pub id: DeliberationId,
    pub panel_id: PanelId,
    pub topic: String,
    pub status: DeliberationStatus,
    pub current_round: u32,
    pub rounds: Vec<Round>,
    /// Final Markdown summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub pro_points: Vec<String>,
    #[serde(default)]
    pub against_points: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Deliberation {
    /// Create a pending deliberation on a non-blank topic
    pub fn new(panel_id: PanelId, topic: impl Into<String>) -> Result<Self, DomainError> {
        let topic = topic.into();
        if topic.trim().is_empty() {
            return Err(DomainError::InvalidTopic("topic cannot be empty".to_string()));
        }

        Ok(Self {
            id: DeliberationId::generate(),
            panel_id,
            topic: topic.trim().to_string(),
            status: DeliberationStatus::Pending,
            current_round: 0,
            rounds: Vec::new(),
            summary: None,
            pro_points: Vec::new(),
            against_points: Vec::new(),
            error_message: None,
            created_at: Utc::now(),
            completed_at: None,
        })
    }

    /// Move to `next`, refusing anything the lifecycle does not allow
    pub fn transition(&mut self, next: DeliberationStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Enter the error state with a description, unless already terminal
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if self.transition(DeliberationStatus::Error).is_ok() {
            self.error_message = Some(message.into());
            true
        } else {
            false
        }
    }

    /// Append a finished round, keeping round numbers contiguous from 1
    pub fn append_round(&mut self, round: Round) -> Result<(), DomainError> {
        let expected = self.rounds.len() as u32 + 1;
        if round.number != expected {
            return Err(DomainError::RoundOutOfOrder {
                expected,
                actual: round.number,
            });
        }
        self.rounds.push(round);
        Ok(())
    }

    pub fn last_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Topic, outcome and key points of a finished deliberation
    pub fn report(&self) -> Result<DeliberationReport, DomainError> {
        if !self.status.is_complete() {
            return Err(DomainError::NotComplete(self.status));
        }
        Ok(DeliberationReport {
            topic: self.topic.clone(),
            status: self.status,
            total_rounds: self.rounds.len(),
            summary: self.summary.clone(),
            pro_points: self.pro_points.clone(),
            against_points: self.against_points.clone(),
        })
    }
}

/// Outcome view of a completed deliberation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationReport {
    pub topic: String,
    pub status: DeliberationStatus,
    pub total_rounds: usize,
    pub summary: Option<String>,
    pub pro_points: Vec<String>,
    pub against_points: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str) -> PanelMember {
        PanelMember::new(name, ProviderKind::Ollama, Role::TechStrategist)
    }

    fn deliberation() -> Deliberation {
        Deliberation::new(PanelId::generate(), "Adopt Rust?").unwrap()
    }

    #[test]
    fn test_new_is_pending() {
        let d = deliberation();
        assert_eq!(d.status, DeliberationStatus::Pending);
        assert_eq!(d.current_round, 0);
        assert!(d.rounds.is_empty());
    }

    #[test]
    fn test_blank_topic_rejected() {
        assert!(matches!(
            Deliberation::new(PanelId::generate(), "  "),
            Err(DomainError::InvalidTopic(_))
        ));
    }

    #[test]
    fn test_terminal_status_never_changes() {
        let mut d = deliberation();
        d.transition(DeliberationStatus::InProgress).unwrap();
        d.transition(DeliberationStatus::Cancelled).unwrap();

        assert!(d.transition(DeliberationStatus::InProgress).is_err());
        assert!(!d.fail("late failure"));
        assert_eq!(d.status, DeliberationStatus::Cancelled);
        assert!(d.error_message.is_none());
    }

    #[test]
    fn test_fail_records_message() {
        let mut d = deliberation();
        d.transition(DeliberationStatus::InProgress).unwrap();
        assert!(d.fail("boom"));
        assert_eq!(d.status, DeliberationStatus::Error);
        assert_eq!(d.error_message.as_deref(), Some("boom"));
    }

    #[test]
    fn test_rounds_must_be_contiguous() {
        let mut d = deliberation();
        d.append_round(Round::new(1)).unwrap();
        assert_eq!(
            d.append_round(Round::new(3)).unwrap_err(),
            DomainError::RoundOutOfOrder {
                expected: 2,
                actual: 3
            }
        );
        d.append_round(Round::new(2)).unwrap();
        assert_eq!(d.rounds.len(), 2);
    }

    #[test]
    fn test_record_vote_attaches_to_response() {
        let a = member("Ada");
        let b = member("Grace");
        let mut round = Round::new(1);
        round.responses.push(MemberResponse::new(&a, "Yes."));

        round.record_vote(a.id, ParsedVote::new(VoteType::Agree, "fine"));
        // b did not respond but still voted
        round.record_vote(b.id, ParsedVote::new(VoteType::Disagree, "no"));

        let tally = round.tally_votes();
        assert_eq!(tally, VoteTally::new(1, 1, 0));
        assert_eq!(round.responses.len(), 1);
        assert_eq!(round.responses[0].vote, Some(VoteType::Agree));
        assert_eq!(round.responses[0].rationale.as_deref(), Some("fine"));
        assert_eq!(round.votes.get(&b.id), Some(&VoteType::Disagree));
    }

    #[test]
    fn test_report_requires_completion() {
        let mut d = deliberation();
        assert!(matches!(d.report(), Err(DomainError::NotComplete(_))));

        d.transition(DeliberationStatus::InProgress).unwrap();
        d.transition(DeliberationStatus::RoundLimitReached).unwrap();
        d.append_round(Round::new(1)).unwrap();
        d.pro_points = vec!["cheap".to_string()];

        let report = d.report().unwrap();
        assert_eq!(report.total_rounds, 1);
        assert_eq!(report.pro_points, vec!["cheap"]);
    }

    #[test]
    fn test_json_roundtrip_keeps_votes() {
        let a = member("Ada");
        let mut d = deliberation();
        let mut round = Round::new(1);
        round.responses.push(MemberResponse::new(&a, "content"));
        round.record_vote(a.id, ParsedVote::new(VoteType::Agree, "ok"));
        round.tally_votes();
        d.append_round(round).unwrap();

        let json = serde_json::to_string(&d).unwrap();
        let back: Deliberation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
