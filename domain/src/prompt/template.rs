//! Prompt templates for the deliberation flow

use crate::panel::PanelMember;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// User prompt for the response phase of a round
    pub fn round_prompt(context: &str, round: u32, member: &PanelMember) -> String {
        format!(
            r#"You are participating in a council debate on the following topic:

{}

This is round {}. Please provide your perspective, considering other viewpoints shared.
Be concise but thorough. Focus on your area of expertise ({})."#,
            context, round, member.role
        )
    }

    /// System prompt for the vote phase
    pub fn vote_system(member: &PanelMember) -> String {
        format!(
            "You are {}, a {}.\nYou must vote on whether consensus has been reached based on the discussion.",
            member.name, member.role
        )
    }

    /// User prompt for the vote phase
    pub fn vote_prompt(responses: &[(String, String)]) -> String {
        let responses_text = responses
            .iter()
            .map(|(label, content)| format!("{}:\n{}", label, content))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            r#"Based on the following responses from all council members:

{}

Please vote and explain your reasoning.
Respond in this exact format:
VOTE: [AGREE/DISAGREE/ABSTAIN]
REASONING: [Your brief explanation]

Vote AGREE if you believe the council is converging on a reasonable conclusion.
Vote DISAGREE if you have significant concerns that need further discussion.
Vote ABSTAIN if you're uncertain or need more information."#,
            responses_text
        )
    }

    /// System prompt for the narrative summary
    pub fn summary_system() -> &'static str {
        r#"You are a skilled moderator and summarizer. Your task is to create
a clear, structured Markdown summary of a council debate. Be objective and highlight key insights."#
    }

    /// User prompt for the narrative summary
    pub fn summary_prompt(topic: &str, roster: &str, transcript: &str, status: &str) -> String {
        format!(
            r#"Please create a comprehensive summary of this council debate.

**Topic:** {}

**Council Members:**
{}

**Debate Rounds:**
{}

**Final Status:** {}

Please create a Markdown summary with the following sections:
1. **Executive Summary** - Brief overview of the topic and conclusion
2. **Key Discussion Points** - Main arguments and insights from each perspective
3. **Areas of Agreement** - Points where council members converged
4. **Areas of Disagreement** - Points of contention that remained
5. **Conclusion** - Final outcome and recommendations

Use bullet points and clear formatting. Be concise but comprehensive."#,
            topic, roster, transcript, status
        )
    }

    /// System prompt for argument extraction
    pub fn extraction_system() -> &'static str {
        "You extract key arguments from debates. Be concise."
    }

    /// User prompt asking for the arguments in favor
    pub fn pro_points_prompt(topic: &str, transcript: &str) -> String {
        Self::points_prompt(
            topic,
            "PRO arguments \n(arguments in favor of the topic or proposal)",
            transcript,
        )
    }

    /// User prompt asking for the arguments against
    pub fn against_points_prompt(topic: &str, transcript: &str) -> String {
        Self::points_prompt(
            topic,
            "AGAINST arguments \n(arguments opposing the topic or proposal, or concerns raised)",
            transcript,
        )
    }

    fn points_prompt(topic: &str, side: &str, transcript: &str) -> String {
        format!(
            r#"From this debate on "{}", extract the top 3-5 {}.

Debate content:
{}

Return ONLY a numbered list, one argument per line. Be concise (max 2 sentences each)."#,
            topic, side, transcript
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{ProviderKind, Role};

    fn member() -> PanelMember {
        PanelMember::new("Ada", ProviderKind::Ollama, Role::LegalAdvisor)
    }

    #[test]
    fn test_round_prompt_mentions_round_and_role() {
        let prompt = PromptTemplate::round_prompt("Topic: X", 3, &member());
        assert!(prompt.contains("Topic: X"));
        assert!(prompt.contains("This is round 3."));
        assert!(prompt.contains("(legal_advisor)"));
    }

    #[test]
    fn test_vote_prompt_requests_format() {
        let prompt = PromptTemplate::vote_prompt(&[
            ("Ada (legal_advisor)".to_string(), "Risky.".to_string()),
            ("Grace (pr_expert)".to_string(), "Great press.".to_string()),
        ]);
        assert!(prompt.contains("Ada (legal_advisor):\nRisky."));
        assert!(prompt.contains("VOTE: [AGREE/DISAGREE/ABSTAIN]"));
        assert!(prompt.contains("REASONING:"));
    }

    #[test]
    fn test_summary_prompt_has_five_sections() {
        let prompt = PromptTemplate::summary_prompt("T", "- Ada", "rounds", "consensus_reached");
        for section in [
            "Executive Summary",
            "Key Discussion Points",
            "Areas of Agreement",
            "Areas of Disagreement",
            "Conclusion",
        ] {
            assert!(prompt.contains(section), "missing {}", section);
        }
    }

    #[test]
    fn test_points_prompts_name_their_side() {
        assert!(PromptTemplate::pro_points_prompt("T", "x").contains("PRO arguments"));
        assert!(PromptTemplate::against_points_prompt("T", "x").contains("AGAINST arguments"));
    }
}
