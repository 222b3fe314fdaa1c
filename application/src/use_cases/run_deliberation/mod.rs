//! Run Deliberation use case
//!
//! Drives a panel through rounds until consensus or the round budget runs
//! out, then summarizes. The state machine owns the deliberation record;
//! everyone else observes it through events or the returned copy.
//!
//! ```text
//! PENDING ──▶ IN_PROGRESS ──┬──▶ CONSENSUS_REACHED
//!    │                      ├──▶ ROUND_LIMIT_REACHED
//!    │                      ├──▶ ERROR
//!    └──────────────────────┴──▶ CANCELLED
//! ```
//!
//! | Failure                         | Effect                                  |
//! |---------------------------------|-----------------------------------------|
//! | Member call error / timeout     | Member skipped for that phase           |
//! | Member task panic               | `ERROR`, error returned to caller       |
//! | Summary / extraction failure    | Fallback summary / empty point list     |
//! | Cancellation                    | `CANCELLED`, completed rounds kept      |

mod round;
mod types;

pub use types::{DeliberationError, MemberOutcome};

use crate::config::DeliberationParams;
use crate::events::EventBus;
use crate::ports::event_subscriber::EventSubscriber;
use crate::ports::registry::CapabilityRegistry;
use crate::use_cases::summarize::{SummarizeDeliberationUseCase, SummaryOutput};
use chrono::Utc;
use council_domain::{Deliberation, DeliberationEvent, DeliberationStatus, EventKind, Panel};
use round::RoundCoordinator;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Orchestrator for a single deliberation
pub struct DeliberationStateMachine {
    panel: Panel,
    deliberation: Deliberation,
    registry: Arc<CapabilityRegistry>,
    bus: Arc<EventBus>,
    params: DeliberationParams,
    cancellation_token: CancellationToken,
}

impl DeliberationStateMachine {
    /// Start a fresh deliberation of `panel` on `topic`
    pub fn new(
        panel: Panel,
        topic: impl Into<String>,
        registry: Arc<CapabilityRegistry>,
    ) -> Result<Self, DeliberationError> {
        let deliberation = Deliberation::new(panel.id, topic)
            .map_err(|e| DeliberationError::InvalidState(e.to_string()))?;
        Self::from_deliberation(panel, deliberation, registry)
    }

    /// Take over a record the caller already created (and possibly
    /// persisted). A pending record is moved to `IN_PROGRESS`.
    pub fn from_deliberation(
        panel: Panel,
        mut deliberation: Deliberation,
        registry: Arc<CapabilityRegistry>,
    ) -> Result<Self, DeliberationError> {
        panel.validate().map_err(DeliberationError::InvalidPanel)?;

        if deliberation.panel_id != panel.id {
            return Err(DeliberationError::InvalidState(format!(
                "deliberation {} belongs to panel {}, not {}",
                deliberation.id, deliberation.panel_id, panel.id
            )));
        }

        if deliberation.status == DeliberationStatus::Pending {
            deliberation.transition(DeliberationStatus::InProgress)?;
        }

        let machine = Self {
            panel,
            deliberation,
            registry,
            bus: Arc::new(EventBus::new()),
            params: DeliberationParams::default(),
            cancellation_token: CancellationToken::new(),
        };
        machine.check_runnable()?;
        Ok(machine)
    }

    pub fn with_params(mut self, params: DeliberationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    /// Register a subscriber; only subscribers added before `run()` see events
    pub fn subscribe(&mut self, subscriber: Arc<dyn EventSubscriber>) {
        Arc::make_mut(&mut self.bus).subscribe(subscriber);
    }

    /// Mutable access to the bus for closure subscribers
    pub fn events_mut(&mut self) -> &mut EventBus {
        Arc::make_mut(&mut self.bus)
    }

    /// Token that cancels the in-flight run when triggered
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    /// Current state of the record, including after a failed run
    pub fn deliberation(&self) -> &Deliberation {
        &self.deliberation
    }

    /// Drive the deliberation to a terminal status.
    ///
    /// Cancellation is not an error: the returned record is `CANCELLED`.
    /// Orchestration failures leave the record in `ERROR` (see
    /// [`deliberation`](Self::deliberation)) and are returned.
    pub async fn run(&mut self) -> Result<Deliberation, DeliberationError> {
        if let Err(e) = self.check_runnable() {
            return Err(self.fail(e).await);
        }

        info!(
            "Starting deliberation {} on {:?} with {} members",
            self.deliberation.id,
            self.deliberation.topic,
            self.panel.member_count()
        );
        self.emit(EventKind::DebateStart, self.start_payload()).await;

        let coordinator = RoundCoordinator {
            deliberation_id: self.deliberation.id,
            registry: Arc::clone(&self.registry),
            bus: Arc::clone(&self.bus),
            params: self.params.clone(),
        };

        let token = self.cancellation_token.clone();
        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.drive_rounds(&coordinator) => Some(result),
        };

        let status = match outcome {
            None => {
                self.cancel().await;
                return Ok(self.deliberation.clone());
            }
            Some(Err(e)) => return Err(self.fail(e).await),
            Some(Ok(status)) => status,
        };

        if let Err(e) = self.deliberation.transition(status) {
            return Err(self.fail(e.into()).await);
        }

        let summary = self.summarize(&token).await;
        self.deliberation.summary = Some(summary.summary);
        self.deliberation.pro_points = summary.pro_points;
        self.deliberation.against_points = summary.against_points;
        self.deliberation.completed_at = Some(Utc::now());

        info!(
            "Deliberation {} finished: {} after {} round(s)",
            self.deliberation.id,
            self.deliberation.status,
            self.deliberation.rounds.len()
        );
        self.emit_complete().await;

        Ok(self.deliberation.clone())
    }

    /// Run rounds until consensus or the budget is exhausted; returns the
    /// terminal status to enter
    async fn drive_rounds(
        &mut self,
        coordinator: &RoundCoordinator,
    ) -> Result<DeliberationStatus, DeliberationError> {
        while self.deliberation.current_round < self.panel.max_rounds {
            self.deliberation.current_round += 1;
            let number = self.deliberation.current_round;

            let round = coordinator
                .run(
                    &self.panel,
                    &self.deliberation.topic,
                    &self.deliberation.rounds,
                    number,
                )
                .await?;
            let consensus = round.consensus_reached;
            self.deliberation.append_round(round)?;

            if consensus {
                info!("Consensus reached in round {}", number);
                return Ok(DeliberationStatus::ConsensusReached);
            }
        }

        info!(
            "Round budget of {} exhausted without consensus",
            self.panel.max_rounds
        );
        Ok(DeliberationStatus::RoundLimitReached)
    }

    /// Summarize on its own task; a moderator panic or cancellation yields
    /// the template summary
    async fn summarize(&self, token: &CancellationToken) -> SummaryOutput {
        let summarizer =
            SummarizeDeliberationUseCase::new(Arc::clone(&self.registry), self.params.clone());
        let panel = self.panel.clone();
        let deliberation = self.deliberation.clone();
        let mut task =
            tokio::spawn(async move { summarizer.execute(&panel, &deliberation).await });

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                task.abort();
                warn!("Summary interrupted by cancellation, using fallback");
                SummaryOutput::fallback(&self.deliberation)
            }
            joined = &mut task => match joined {
                Ok(output) => output,
                Err(e) => {
                    warn!("Summary task failed, using fallback: {}", e);
                    SummaryOutput::fallback(&self.deliberation)
                }
            },
        }
    }

    fn check_runnable(&self) -> Result<(), DeliberationError> {
        self.panel
            .validate()
            .map_err(DeliberationError::InvalidPanel)?;

        let d = &self.deliberation;
        if d.status != DeliberationStatus::InProgress || d.current_round != 0 || !d.rounds.is_empty()
        {
            return Err(DeliberationError::InvalidState(format!(
                "expected a fresh in_progress deliberation, found {} at round {}",
                d.status, d.current_round
            )));
        }
        Ok(())
    }

    async fn cancel(&mut self) {
        if self
            .deliberation
            .transition(DeliberationStatus::Cancelled)
            .is_ok()
        {
            warn!(
                "Deliberation {} cancelled during round {}",
                self.deliberation.id, self.deliberation.current_round
            );
            self.deliberation.completed_at = Some(Utc::now());
            self.emit_complete().await;
        }
    }

    /// Record an orchestration failure and hand the error back for returning
    async fn fail(&mut self, e: DeliberationError) -> DeliberationError {
        error!("Deliberation {} failed: {}", self.deliberation.id, e);
        if self.deliberation.fail(e.to_string()) {
            self.deliberation.completed_at = Some(Utc::now());
            self.emit_complete().await;
        }
        e
    }

    fn start_payload(&self) -> Value {
        let members: Vec<Value> = self
            .panel
            .members
            .iter()
            .map(|m| {
                json!({
                    "agent_id": m.id.to_string(),
                    "agent_name": m.name,
                    "role": m.role.as_str(),
                    "provider": m.provider.as_str(),
                })
            })
            .collect();

        json!({
            "topic": self.deliberation.topic,
            "panel_id": self.panel.id.to_string(),
            "panel_name": self.panel.name,
            "max_rounds": self.panel.max_rounds,
            "consensus_threshold": self.panel.consensus_threshold.value(),
            "members": members,
        })
    }

    async fn emit_complete(&self) {
        let d = &self.deliberation;
        let data = json!({
            "status": d.status,
            "total_rounds": d.rounds.len(),
            "summary": d.summary,
            "pro_points": d.pro_points,
            "against_points": d.against_points,
            "error": d.error_message,
        });
        self.emit(EventKind::DebateComplete, data).await;
    }

    async fn emit(&self, kind: EventKind, data: Value) {
        self.bus
            .emit(DeliberationEvent::new(self.deliberation.id, kind, data))
            .await;
    }
}
