//! Round checkpointing
//!
//! [`RoundCheckpointer`] rebuilds each round from the event stream and saves
//! a snapshot of the record through the repository port as soon as the
//! round completes. An interrupted run therefore keeps every round it
//! finished, not just the pending record.

use crate::ports::event_subscriber::EventSubscriber;
use crate::ports::repository::DeliberationRepository;
use async_trait::async_trait;
use council_domain::{
    Deliberation, DeliberationEvent, DeliberationId, EventKind, MemberResponse, Panel,
    PanelMember, ParsedVote, Round, VoteType,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

struct Snapshot {
    deliberation: Deliberation,
    current: Option<Round>,
}

/// Event subscriber that persists the record after every completed round
pub struct RoundCheckpointer {
    deliberation_id: DeliberationId,
    repository: Arc<dyn DeliberationRepository>,
    panel: Panel,
    state: Mutex<Snapshot>,
}

impl RoundCheckpointer {
    /// Start from the record the run was created from
    pub fn new(
        repository: Arc<dyn DeliberationRepository>,
        panel: Panel,
        deliberation: Deliberation,
    ) -> Self {
        Self {
            deliberation_id: deliberation.id,
            repository,
            panel,
            state: Mutex::new(Snapshot {
                deliberation,
                current: None,
            }),
        }
    }

    fn member(&self, event: &DeliberationEvent) -> Option<&PanelMember> {
        let agent_id = event.str_field("agent_id")?;
        self.panel
            .members
            .iter()
            .find(|m| m.id.to_string() == agent_id)
    }

    async fn checkpoint(&self, state: &mut Snapshot, event: &DeliberationEvent) {
        let Some(mut round) = state.current.take() else {
            return;
        };
        round.tally_votes();
        round.consensus_reached = event
            .data
            .get("consensus")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        let number = round.number;

        if let Err(e) = state.deliberation.append_round(round) {
            warn!("Skipping checkpoint for round {}: {}", number, e);
            return;
        }
        state.deliberation.current_round = number;

        match self.repository.save(&state.deliberation).await {
            Ok(()) => debug!(
                "Checkpointed deliberation {} after round {}",
                state.deliberation.id, number
            ),
            Err(e) => warn!("Failed to checkpoint round {}: {}", number, e),
        }
    }
}

#[async_trait]
impl EventSubscriber for RoundCheckpointer {
    async fn on_event(&self, event: &DeliberationEvent) {
        if event.deliberation_id != self.deliberation_id {
            return;
        }
        let mut state = self.state.lock().await;

        match event.kind {
            EventKind::RoundStart => {
                if let Some(number) = event.round() {
                    state.current = Some(Round::new(number));
                }
            }
            EventKind::AgentResponse => {
                let (Some(member), Some(content)) =
                    (self.member(event), event.str_field("content"))
                else {
                    return;
                };
                if let Some(round) = state.current.as_mut() {
                    round.responses.push(MemberResponse::new(member, content));
                }
            }
            EventKind::Vote => {
                let Some(member) = self.member(event) else {
                    return;
                };
                let vote = event
                    .data
                    .get("vote")
                    .cloned()
                    .and_then(|v| serde_json::from_value::<VoteType>(v).ok());
                let Some(vote) = vote else {
                    return;
                };
                let reasoning = event.str_field("reasoning").unwrap_or_default();
                if let Some(round) = state.current.as_mut() {
                    round.record_vote(member.id, ParsedVote::new(vote, reasoning));
                }
            }
            EventKind::RoundComplete => self.checkpoint(&mut state, event).await,
            _ => {}
        }
    }
}
