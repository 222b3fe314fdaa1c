//! Console output formatter for deliberations

use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use council_domain::{Deliberation, DeliberationStatus, Round, VoteType};

/// Formats deliberations for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colors on or off for all console output
    pub fn set_color(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// Format the complete transcript
    pub fn format(deliberation: &Deliberation) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Council Deliberation"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Topic:".cyan().bold(),
            deliberation.topic
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Status:".cyan().bold(),
            Self::status_label(deliberation.status)
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Rounds:".cyan().bold(),
            deliberation.rounds.len()
        ));

        for round in &deliberation.rounds {
            output.push_str(&Self::format_round(round));
        }

        output.push_str(&Self::section_header("Summary"));
        output.push_str(&Self::outcome_body(deliberation));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(deliberation: &Deliberation) -> String {
        serde_json::to_string_pretty(deliberation).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the outcome only (concise output)
    pub fn format_summary_only(deliberation: &Deliberation) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Council Verdict ===".cyan().bold()
        ));
        output.push_str(&format!("{} {}\n", "Topic:".bold(), deliberation.topic));
        output.push_str(&format!(
            "{} {} after {} round(s)\n",
            "Outcome:".bold(),
            Self::status_label(deliberation.status),
            deliberation.rounds.len()
        ));
        if let Some(last) = deliberation.last_round() {
            output.push_str(&format!("{} {}\n", "Final votes:".dimmed(), last.tally));
        }
        output.push('\n');
        output.push_str(&Self::outcome_body(deliberation));

        output
    }

    fn format_round(round: &Round) -> String {
        let mut output = Self::section_header(&format!("Round {}", round.number));

        if round.responses.is_empty() {
            output.push_str(&format!("\n{}\n", "No member responded.".dimmed()));
        }

        for response in &round.responses {
            output.push_str(&format!(
                "\n{} {}\n{}\n",
                format!("── {} · {} ──", response.label(), response.provider)
                    .yellow()
                    .bold(),
                response.vote.map(Self::vote_mark).unwrap_or_default(),
                Self::indent(&response.content, "  ")
            ));
            if let Some(rationale) = response.rationale.as_deref().filter(|r| !r.is_empty()) {
                output.push_str(&format!("  {} {}\n", "Reasoning:".dimmed(), rationale));
            }
        }

        let verdict = if round.consensus_reached {
            "consensus reached".green().bold()
        } else {
            "no consensus".yellow()
        };
        output.push_str(&format!(
            "\n{} {} ({})\n",
            "Votes:".cyan().bold(),
            round.tally,
            verdict
        ));
        output
    }

    fn outcome_body(deliberation: &Deliberation) -> String {
        let mut output = String::new();

        if let Some(error) = &deliberation.error_message {
            output.push_str(&format!("{} {}\n\n", "Error:".red().bold(), error));
        }

        match &deliberation.summary {
            Some(summary) => {
                output.push_str(summary);
                output.push('\n');
            }
            None => output.push_str(&format!("{}\n", "No summary available.".dimmed())),
        }

        if !deliberation.pro_points.is_empty() {
            output.push_str(&format!("\n{}\n", "Arguments For:".green().bold()));
            for point in &deliberation.pro_points {
                output.push_str(&format!("  * {}\n", point));
            }
        }

        if !deliberation.against_points.is_empty() {
            output.push_str(&format!("\n{}\n", "Arguments Against:".red().bold()));
            for point in &deliberation.against_points {
                output.push_str(&format!("  * {}\n", point));
            }
        }

        output
    }

    pub fn status_label(status: DeliberationStatus) -> ColoredString {
        match status {
            DeliberationStatus::ConsensusReached => "consensus reached".green().bold(),
            DeliberationStatus::RoundLimitReached => "round limit reached".yellow().bold(),
            DeliberationStatus::Cancelled => "cancelled".yellow(),
            DeliberationStatus::Error => "error".red().bold(),
            DeliberationStatus::Pending => "pending".dimmed(),
            DeliberationStatus::InProgress => "in progress".cyan(),
        }
    }

    pub fn vote_mark(vote: VoteType) -> ColoredString {
        match vote {
            VoteType::Agree => "[agree]".green(),
            VoteType::Disagree => "[disagree]".red(),
            VoteType::Abstain => "[abstain]".dimmed(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_full(&self, deliberation: &Deliberation) -> String {
        Self::format(deliberation)
    }

    fn format_summary(&self, deliberation: &Deliberation) -> String {
        Self::format_summary_only(deliberation)
    }

    fn format_json(&self, deliberation: &Deliberation) -> String {
        Self::format_json(deliberation)
    }
}
