//! Round coordinator for the RunDeliberation use case.
//!
//! One round is a response phase followed by a vote phase, each a parallel
//! fan-out over the panel. A member whose call fails or times out is left
//! out of that phase; the round carries on with everyone else.

use super::types::{DeliberationError, MemberOutcome};
use crate::config::DeliberationParams;
use crate::events::EventBus;
use crate::ports::capability::{Capability, CapabilityError, GenerationRequest, StreamEvent};
use crate::ports::registry::CapabilityRegistry;
use council_domain::{
    DeliberationEvent, DeliberationId, EventKind, MemberResponse, Panel, PanelMember,
    ParsedVote, PromptTemplate, Round, TOOL_RESULT_PREVIEW_CHARS, parse_vote, round_context,
    truncate_chars,
};
use serde_json::{Value, json};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Runs single rounds for one deliberation
pub(crate) struct RoundCoordinator {
    pub(crate) deliberation_id: DeliberationId,
    pub(crate) registry: Arc<CapabilityRegistry>,
    pub(crate) bus: Arc<EventBus>,
    pub(crate) params: DeliberationParams,
}

impl RoundCoordinator {
    /// Run round `number` given the rounds completed so far
    pub(crate) async fn run(
        &self,
        panel: &Panel,
        topic: &str,
        prior_rounds: &[Round],
        number: u32,
    ) -> Result<Round, DeliberationError> {
        info!("Round {}/{}", number, panel.max_rounds);
        self.emit(
            EventKind::RoundStart,
            json!({ "round": number, "max_rounds": panel.max_rounds }),
        )
        .await;

        let context = round_context(topic, prior_rounds, number);

        for member in &panel.members {
            self.emit(EventKind::AgentThinking, member_payload(number, member, json!({})))
                .await;
        }

        let mut round = Round::new(number);

        // Phase 1: responses
        let responses = self.collect_responses(panel, &context, number).await?;
        for (member, outcome) in panel.members.iter().zip(responses) {
            match outcome {
                MemberOutcome::Success(content) => {
                    let response = MemberResponse::new(member, content);
                    self.emit(
                        EventKind::AgentResponse,
                        member_payload(number, member, json!({ "content": response.content })),
                    )
                    .await;
                    round.responses.push(response);
                }
                MemberOutcome::Failure(reason) => {
                    warn!(
                        "Member {} gave no response in round {}: {}",
                        member.name, number, reason
                    );
                }
            }
        }

        // Phase 2: votes
        let votes = self.collect_votes(panel, &round.responses).await?;
        for (member, outcome) in panel.members.iter().zip(votes) {
            match outcome {
                MemberOutcome::Success(parsed) => {
                    debug!("Member {} voted {}", member.name, parsed.vote);
                    self.emit(
                        EventKind::Vote,
                        member_payload(
                            number,
                            member,
                            json!({ "vote": parsed.vote, "reasoning": parsed.rationale }),
                        ),
                    )
                    .await;
                    round.record_vote(member.id, parsed);
                }
                MemberOutcome::Failure(reason) => {
                    warn!(
                        "Member {} cast no vote in round {}: {}",
                        member.name, number, reason
                    );
                }
            }
        }

        // Phase 3: tally
        let tally = round.tally_votes();
        round.consensus_reached = panel.consensus_threshold.is_satisfied(&tally);
        info!(
            "Round {} votes: {} (consensus: {})",
            number, tally, round.consensus_reached
        );

        self.emit(
            EventKind::RoundComplete,
            json!({
                "round": number,
                "vote_summary": tally,
                "agree_ratio": tally.agree_ratio(),
                "consensus": round.consensus_reached,
            }),
        )
        .await;

        Ok(round)
    }

    /// Ask every member for its perspective, streaming chunks as they arrive
    async fn collect_responses(
        &self,
        panel: &Panel,
        context: &str,
        number: u32,
    ) -> Result<Vec<MemberOutcome<String>>, DeliberationError> {
        let mut join_set = JoinSet::new();

        for (index, member) in panel.members.iter().enumerate() {
            let capability = self.registry.get(member.provider);
            let bus = Arc::clone(&self.bus);
            let deliberation_id = self.deliberation_id;
            let timeout = self.params.response_timeout;
            let request = GenerationRequest::new(
                member.system_prompt(),
                PromptTemplate::round_prompt(context, number, member),
                self.params.response_max_tokens,
            )
            .with_model(member.model.clone());
            let member = member.clone();

            join_set.spawn(async move {
                let result = match capability {
                    Some(capability) => {
                        bounded(
                            timeout,
                            stream_response(
                                capability.as_ref(),
                                &bus,
                                deliberation_id,
                                &member,
                                number,
                                &request,
                            ),
                        )
                        .await
                    }
                    None => Err(CapabilityError::Unavailable(member.provider)),
                };
                (index, MemberOutcome::from(result))
            });
        }

        join_in_member_order(join_set, panel.members.len()).await
    }

    /// Ask every member to vote on the round's responses
    async fn collect_votes(
        &self,
        panel: &Panel,
        responses: &[MemberResponse],
    ) -> Result<Vec<MemberOutcome<ParsedVote>>, DeliberationError> {
        let shown: Vec<(String, String)> = responses
            .iter()
            .map(|r| (r.label(), r.content.clone()))
            .collect();
        let prompt = PromptTemplate::vote_prompt(&shown);

        let mut join_set = JoinSet::new();

        for (index, member) in panel.members.iter().enumerate() {
            let capability = self.registry.get(member.provider);
            let timeout = self.params.vote_timeout;
            let request = GenerationRequest::new(
                PromptTemplate::vote_system(member),
                prompt.clone(),
                self.params.vote_max_tokens,
            )
            .with_model(member.model.clone());
            let provider = member.provider;

            join_set.spawn(async move {
                let result = match capability {
                    Some(capability) => bounded(timeout, capability.generate(&request)).await,
                    None => Err(CapabilityError::Unavailable(provider)),
                };
                (index, MemberOutcome::from(result.map(|text| parse_vote(&text))))
            });
        }

        join_in_member_order(join_set, panel.members.len()).await
    }

    async fn emit(&self, kind: EventKind, data: Value) {
        self.bus
            .emit(DeliberationEvent::new(self.deliberation_id, kind, data))
            .await;
    }
}

/// Apply a per-call deadline; dropping the call abandons any open stream
async fn bounded<F>(timeout: Duration, call: F) -> Result<String, CapabilityError>
where
    F: Future<Output = Result<String, CapabilityError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(CapabilityError::Timeout(timeout)),
    }
}

/// Drain a member's stream, publishing a chunk event per delta
async fn stream_response(
    capability: &dyn Capability,
    bus: &EventBus,
    deliberation_id: DeliberationId,
    member: &PanelMember,
    round: u32,
    request: &GenerationRequest,
) -> Result<String, CapabilityError> {
    let mut handle = capability.generate_stream(request).await?;
    let mut full_content = String::new();

    while let Some(event) = handle.receiver.recv().await {
        match event {
            StreamEvent::Delta(chunk) => {
                full_content.push_str(&chunk);
                emit_chunk(bus, deliberation_id, member, round, &chunk, &full_content).await;
            }
            StreamEvent::ToolCall {
                name,
                arguments,
                result,
            } => {
                debug!("Member {} called tool {}", member.name, name);
                let data = member_payload(
                    round,
                    member,
                    json!({
                        "tool": name,
                        "arguments": arguments,
                        "result": truncate_chars(&result, TOOL_RESULT_PREVIEW_CHARS),
                    }),
                );
                bus.emit(DeliberationEvent::new(deliberation_id, EventKind::ToolCall, data))
                    .await;
            }
            StreamEvent::Completed(text) => {
                // Non-streaming backends deliver everything at once
                if full_content.is_empty() && !text.is_empty() {
                    full_content = text;
                    emit_chunk(bus, deliberation_id, member, round, &full_content, &full_content)
                        .await;
                }
                break;
            }
            StreamEvent::Error(e) => return Err(CapabilityError::Stream(e)),
        }
    }

    Ok(full_content)
}

async fn emit_chunk(
    bus: &EventBus,
    deliberation_id: DeliberationId,
    member: &PanelMember,
    round: u32,
    chunk: &str,
    so_far: &str,
) {
    let data = member_payload(
        round,
        member,
        json!({ "chunk": chunk, "full_content_so_far": so_far }),
    );
    bus.emit(DeliberationEvent::new(
        deliberation_id,
        EventKind::AgentResponseChunk,
        data,
    ))
    .await;
}

/// Wait for every member task and return outcomes indexed by member position.
///
/// A task that panicked or was aborted is an orchestration failure; returning
/// early drops the set and aborts the remaining tasks.
async fn join_in_member_order<T: Send + 'static>(
    mut join_set: JoinSet<(usize, MemberOutcome<T>)>,
    member_count: usize,
) -> Result<Vec<MemberOutcome<T>>, DeliberationError> {
    let mut slots: Vec<Option<MemberOutcome<T>>> = (0..member_count).map(|_| None).collect();

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, outcome)) => {
                if let Some(slot) = slots.get_mut(index) {
                    *slot = Some(outcome);
                }
            }
            Err(e) => return Err(DeliberationError::MemberTask(e.to_string())),
        }
    }

    Ok(slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| MemberOutcome::Failure("no result".to_string())))
        .collect())
}

/// Common member fields of per-member event payloads, merged with `extra`
fn member_payload(round: u32, member: &PanelMember, extra: Value) -> Value {
    let mut payload = json!({
        "round": round,
        "agent_id": member.id.to_string(),
        "agent_name": member.name,
        "role": member.role.as_str(),
        "provider": member.provider.as_str(),
    });
    if let (Some(base), Value::Object(extra)) = (payload.as_object_mut(), extra) {
        base.extend(extra);
    }
    payload
}
