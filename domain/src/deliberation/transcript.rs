//! Text renderings of a deliberation's rounds.
//!
//! - [`round_context`]: what members see at the start of a round
//! - [`rounds_transcript`]: Markdown transcript fed to the summarizer
//! - [`fallback_summary`]: deterministic summary when no generator is available

use super::entities::{Deliberation, Round};

/// Build the context members receive for round `round_number`.
///
/// The first round only frames the topic. Later rounds replay every prior
/// round in order, responses in member order, followed by that round's tally.
pub fn round_context(topic: &str, prior_rounds: &[Round], round_number: u32) -> String {
    if round_number <= 1 {
        return format!("This is the first round of debate on the topic: {}", topic);
    }

    let mut parts = vec![format!("Topic: {}\n\nPrevious rounds:", topic)];
    for round in prior_rounds {
        parts.push(format!("\n--- Round {} ---", round.number));
        for response in &round.responses {
            parts.push(format!("\n{}:\n{}", response.label(), response.content));
        }
        parts.push(format!("\nVotes: {}", round.tally));
    }
    parts.join("\n")
}

/// Markdown transcript of all rounds, responses, votes and tallies
pub fn rounds_transcript(deliberation: &Deliberation) -> String {
    let mut parts = Vec::new();
    for round in &deliberation.rounds {
        parts.push(format!("\n### Round {}", round.number));
        for response in &round.responses {
            parts.push(format!(
                "\n**{}** ({}):\n{}",
                response.member_name, response.role, response.content
            ));
            if let Some(vote) = response.vote {
                parts.push(format!("*Vote: {}*", vote));
            }
        }
        parts.push(format!("\n**Round Votes:** {}", round.tally));
    }
    parts.join("\n")
}

/// Deterministic Markdown summary listing topic, status and per-round votes
pub fn fallback_summary(deliberation: &Deliberation) -> String {
    let rounds = deliberation
        .rounds
        .iter()
        .map(|r| format!("- Round {}: {}", r.number, r.tally))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"# Debate Summary

## Topic
{}

## Status
{}

## Rounds
{}

## Note
Detailed AI summary not available (no AI provider configured for moderation).
"#,
        deliberation.topic, deliberation.status, rounds
    )
}
