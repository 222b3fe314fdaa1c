//! Summarize Deliberation use case
//!
//! Produces the narrative summary and the pro/against argument lists once
//! the round loop has finished. Never fails: without a usable provider the
//! deterministic fallback summary is returned and the lists stay empty.

use crate::config::DeliberationParams;
use crate::ports::capability::{Capability, CapabilityError, GenerationRequest};
use crate::ports::registry::CapabilityRegistry;
use council_domain::{
    Deliberation, Panel, PromptTemplate, fallback_summary, parse_argument_list, rounds_transcript,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Summary text plus extracted arguments
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOutput {
    pub summary: String,
    pub pro_points: Vec<String>,
    pub against_points: Vec<String>,
}

impl SummaryOutput {
    /// Deterministic summary with no argument extraction
    pub fn fallback(deliberation: &Deliberation) -> Self {
        Self {
            summary: fallback_summary(deliberation),
            pro_points: Vec::new(),
            against_points: Vec::new(),
        }
    }
}

/// Use case for summarizing a finished deliberation
pub struct SummarizeDeliberationUseCase {
    registry: Arc<CapabilityRegistry>,
    params: DeliberationParams,
}

impl SummarizeDeliberationUseCase {
    pub fn new(registry: Arc<CapabilityRegistry>, params: DeliberationParams) -> Self {
        Self { registry, params }
    }

    /// Pick the moderator: the panel's preferred provider and model first,
    /// otherwise the first registered provider with its default model
    fn moderator(&self, panel: &Panel) -> Option<(Arc<dyn Capability>, Option<String>)> {
        if let Some((provider, model)) = panel.preferred_summarizer()
            && let Some(capability) = self.registry.get(provider)
        {
            return Some((capability, model.map(str::to_string)));
        }
        self.registry
            .first_available()
            .map(|(_, capability)| (capability, None))
    }

    pub async fn execute(&self, panel: &Panel, deliberation: &Deliberation) -> SummaryOutput {
        let Some((capability, model)) = self.moderator(panel) else {
            info!("No provider available for moderation, using fallback summary");
            return SummaryOutput::fallback(deliberation);
        };
        debug!("Summarizing with {}", capability.provider());

        let transcript = rounds_transcript(deliberation);

        let summary_request = GenerationRequest::new(
            PromptTemplate::summary_system(),
            PromptTemplate::summary_prompt(
                &deliberation.topic,
                &panel.roster(),
                &transcript,
                deliberation.status.as_str(),
            ),
            self.params.summary_max_tokens,
        )
        .with_model(model.clone());
        let pro_request = GenerationRequest::new(
            PromptTemplate::extraction_system(),
            PromptTemplate::pro_points_prompt(&deliberation.topic, &transcript),
            self.params.points_max_tokens,
        )
        .with_model(model.clone());
        let against_request = GenerationRequest::new(
            PromptTemplate::extraction_system(),
            PromptTemplate::against_points_prompt(&deliberation.topic, &transcript),
            self.params.points_max_tokens,
        )
        .with_model(model);

        let capability = capability.as_ref();
        let (summary, pro, against) = tokio::join!(
            self.generate(capability, &summary_request),
            self.generate(capability, &pro_request),
            self.generate(capability, &against_request),
        );

        let summary = match summary {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!("Moderator returned an empty summary, using fallback");
                fallback_summary(deliberation)
            }
            Err(e) => {
                warn!("Summary generation failed, using fallback: {}", e);
                fallback_summary(deliberation)
            }
        };

        SummaryOutput {
            summary,
            pro_points: Self::points(pro, "pro"),
            against_points: Self::points(against, "against"),
        }
    }

    async fn generate(
        &self,
        capability: &dyn Capability,
        request: &GenerationRequest,
    ) -> Result<String, CapabilityError> {
        let timeout = self.params.summary_timeout;
        match tokio::time::timeout(timeout, capability.generate(request)).await {
            Ok(result) => result,
            Err(_) => Err(CapabilityError::Timeout(timeout)),
        }
    }

    fn points(result: Result<String, CapabilityError>, side: &str) -> Vec<String> {
        match result {
            Ok(text) => parse_argument_list(&text),
            Err(e) => {
                warn!("Extracting {} points failed: {}", side, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use council_domain::{
        DeliberationStatus, MemberResponse, PanelMember, ParsedVote, ProviderKind, Role, Round,
        VoteType,
    };
    use std::sync::Mutex;

    /// Moderator that answers by prompt kind and records the models requested
    struct Moderator {
        provider: ProviderKind,
        fail_summary: bool,
        models: Mutex<Vec<Option<String>>>,
    }

    impl Moderator {
        fn new(provider: ProviderKind) -> Self {
            Self {
                provider,
                fail_summary: false,
                models: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Capability for Moderator {
        fn provider(&self) -> ProviderKind {
            self.provider
        }

        fn default_model(&self) -> &str {
            "moderator"
        }

        async fn generate(&self, request: &GenerationRequest) -> Result<String, CapabilityError> {
            self.models.lock().unwrap().push(request.model.clone());
            if request.user_message.contains("PRO arguments") {
                Ok("1. Faster builds\n2) Safer code\n\n- Happier team".to_string())
            } else if request.user_message.contains("AGAINST arguments") {
                Err(CapabilityError::RequestFailed("rate limited".to_string()))
            } else if self.fail_summary {
                Err(CapabilityError::RequestFailed("overloaded".to_string()))
            } else {
                Ok("# Summary\nThe panel agreed.".to_string())
            }
        }
    }

    fn panel() -> Panel {
        Panel::new(
            "Board",
            vec![
                PanelMember::new("Ada", ProviderKind::Anthropic, Role::TechStrategist)
                    .with_model("claude-test"),
                PanelMember::new("Grace", ProviderKind::Ollama, Role::LegalAdvisor),
            ],
        )
        .unwrap()
    }

    fn finished(panel: &Panel) -> Deliberation {
        let mut d = Deliberation::new(panel.id, "Adopt Rust").unwrap();
        d.transition(DeliberationStatus::InProgress).unwrap();
        let mut round = Round::new(1);
        for member in &panel.members {
            round
                .responses
                .push(MemberResponse::new(member, "I agree."));
            round.record_vote(member.id, ParsedVote::new(VoteType::Agree, "ok"));
        }
        round.tally_votes();
        d.append_round(round).unwrap();
        d.transition(DeliberationStatus::ConsensusReached).unwrap();
        d
    }

    #[tokio::test]
    async fn test_no_provider_uses_fallback() {
        let panel = panel();
        let d = finished(&panel);
        let use_case = SummarizeDeliberationUseCase::new(
            Arc::new(CapabilityRegistry::new()),
            DeliberationParams::default(),
        );

        let output = use_case.execute(&panel, &d).await;
        assert!(output.summary.contains("Adopt Rust"));
        assert!(output.summary.contains("- Round 1: Agree(2), Disagree(0), Abstain(0)"));
        assert!(output.pro_points.is_empty());
        assert!(output.against_points.is_empty());
    }

    #[tokio::test]
    async fn test_preferred_provider_and_model_are_used() {
        let panel = panel();
        let d = finished(&panel);
        let ollama = Arc::new(Moderator::new(ProviderKind::Ollama));
        let anthropic = Arc::new(Moderator::new(ProviderKind::Anthropic));
        let registry = CapabilityRegistry::new()
            .with(ollama.clone())
            .with(anthropic.clone());
        let use_case =
            SummarizeDeliberationUseCase::new(Arc::new(registry), DeliberationParams::default());

        let output = use_case.execute(&panel, &d).await;

        assert_eq!(output.summary, "# Summary\nThe panel agreed.");
        assert_eq!(
            output.pro_points,
            vec!["Faster builds", "Safer code", "Happier team"]
        );
        // Failed extraction leaves only that side empty
        assert!(output.against_points.is_empty());

        assert!(ollama.models.lock().unwrap().is_empty());
        let models = anthropic.models.lock().unwrap();
        assert_eq!(models.len(), 3);
        assert!(models.iter().all(|m| m.as_deref() == Some("claude-test")));
    }

    #[tokio::test]
    async fn test_falls_back_to_first_available_provider() {
        let panel = panel();
        let d = finished(&panel);
        let gemini = Arc::new(Moderator::new(ProviderKind::Gemini));
        let registry = CapabilityRegistry::new().with(gemini.clone());
        let use_case =
            SummarizeDeliberationUseCase::new(Arc::new(registry), DeliberationParams::default());

        let output = use_case.execute(&panel, &d).await;

        assert_eq!(output.pro_points.len(), 3);
        // The preferred model belongs to another provider
        assert!(gemini.models.lock().unwrap().iter().all(Option::is_none));
    }

    #[tokio::test]
    async fn test_failed_summary_degrades_to_fallback_text() {
        let panel = panel();
        let d = finished(&panel);
        let mut moderator = Moderator::new(ProviderKind::Anthropic);
        moderator.fail_summary = true;
        let registry = CapabilityRegistry::new().with(Arc::new(moderator));
        let use_case =
            SummarizeDeliberationUseCase::new(Arc::new(registry), DeliberationParams::default());

        let output = use_case.execute(&panel, &d).await;

        assert!(output.summary.starts_with("# Debate Summary"));
        assert!(output.summary.contains("consensus_reached"));
        assert_eq!(output.pro_points.len(), 3);
    }
}
