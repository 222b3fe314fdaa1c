//! Progress reporting for a running deliberation
//!
//! Both reporters are [`EventSubscriber`]s; the binary subscribes one of
//! them to the state machine's event bus.

use async_trait::async_trait;
use colored::Colorize;
use council_application::EventSubscriber;
use council_domain::{DeliberationEvent, EventKind};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use serde_json::Value;
use std::sync::Mutex;

/// Reports progress with a progress bar per round
pub struct ProgressReporter {
    multi: MultiProgress,
    round_bar: Mutex<Option<ProgressBar>>,
    member_count: Mutex<u64>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            round_bar: Mutex::new(None),
            member_count: Mutex::new(0),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn println(&self, line: String) {
        let _ = self.multi.println(line);
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.round_bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }

    fn start_round(&self, event: &DeliberationEvent) {
        let members = self.member_count.lock().map(|n| *n).unwrap_or(0);
        let round = event.round().unwrap_or(0);
        let max_rounds = event.data.get("max_rounds").and_then(Value::as_u64).unwrap_or(0);

        // One step per response and one per vote
        let pb = self.multi.add(ProgressBar::new(members * 2));
        pb.set_style(Self::round_style());
        pb.set_prefix(format!("Round {}/{}", round, max_rounds));
        pb.set_message("Members are thinking...");

        if let Ok(mut slot) = self.round_bar.lock()
            && let Some(old) = slot.replace(pb)
        {
            old.finish_and_clear();
        }
    }

    fn finish_round(&self, event: &DeliberationEvent) {
        let Ok(mut slot) = self.round_bar.lock() else {
            return;
        };
        if let Some(pb) = slot.take() {
            let consensus = event
                .data
                .get("consensus")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let verdict = if consensus {
                "consensus!".green().bold().to_string()
            } else {
                "no consensus".yellow().to_string()
            };
            pb.finish_with_message(format!("{} ({})", tally_text(event), verdict));
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSubscriber for ProgressReporter {
    async fn on_event(&self, event: &DeliberationEvent) {
        match event.kind {
            EventKind::DebateStart => {
                let members = member_names(event);
                if let Ok(mut count) = self.member_count.lock() {
                    *count = members.len() as u64;
                }
                self.println(format!(
                    "{} {} ({})",
                    "Panel:".cyan().bold(),
                    event.str_field("panel_name").unwrap_or("Council"),
                    members.join(", ")
                ));
            }
            EventKind::RoundStart => self.start_round(event),
            EventKind::AgentThinking => {
                let name = event.str_field("agent_name").unwrap_or("?").to_string();
                self.with_bar(|pb| pb.set_message(format!("{} is thinking...", name)));
            }
            EventKind::AgentResponse => {
                let name = event.str_field("agent_name").unwrap_or("?").to_string();
                self.with_bar(|pb| {
                    pb.set_message(format!("{} {} responded", "v".green(), name));
                    pb.inc(1);
                });
            }
            EventKind::ToolCall => {
                self.println(format!(
                    "  {} {} used {}",
                    "*".dimmed(),
                    event.str_field("agent_name").unwrap_or("?"),
                    event.str_field("tool").unwrap_or("a tool").bold()
                ));
            }
            EventKind::Vote => {
                let status = vote_text(event);
                self.with_bar(|pb| {
                    pb.set_message(status);
                    pb.inc(1);
                });
            }
            EventKind::RoundComplete => self.finish_round(event),
            EventKind::DebateComplete => {
                if let Ok(mut slot) = self.round_bar.lock()
                    && let Some(pb) = slot.take()
                {
                    pb.abandon();
                }
                self.println(format!(
                    "{} {}",
                    "Deliberation finished:".cyan().bold(),
                    event.str_field("status").unwrap_or("unknown")
                ));
            }
            EventKind::AgentResponseChunk => {}
        }
    }
}

/// Simple text-based progress on stderr (no fancy UI)
pub struct SimpleProgress;

impl SimpleProgress {
    /// The line printed for an event, if any
    pub fn line(event: &DeliberationEvent) -> Option<String> {
        let agent = event.str_field("agent_name").unwrap_or("?");
        let line = match event.kind {
            EventKind::DebateStart => format!(
                "{} {} ({})",
                "->".cyan(),
                "Deliberation started".bold(),
                member_names(event).join(", ")
            ),
            EventKind::RoundStart => format!(
                "{} {}",
                "->".cyan(),
                format!("Round {}", event.round().unwrap_or(0)).bold()
            ),
            EventKind::AgentResponse => format!("  {} {} responded", "v".green(), agent),
            EventKind::ToolCall => format!(
                "  {} {} used {}",
                "*".dimmed(),
                agent,
                event.str_field("tool").unwrap_or("a tool")
            ),
            EventKind::Vote => format!("  {}", vote_text(event)),
            EventKind::RoundComplete => format!("  {}\n", tally_text(event)),
            EventKind::DebateComplete => format!(
                "{} Finished: {}",
                "->".cyan(),
                event.str_field("status").unwrap_or("unknown")
            ),
            EventKind::AgentThinking | EventKind::AgentResponseChunk => return None,
        };
        Some(line)
    }
}

#[async_trait]
impl EventSubscriber for SimpleProgress {
    async fn on_event(&self, event: &DeliberationEvent) {
        if let Some(line) = Self::line(event) {
            eprintln!("{}", line);
        }
    }
}

fn member_names(event: &DeliberationEvent) -> Vec<String> {
    event
        .data
        .get("members")
        .and_then(Value::as_array)
        .map(|members| {
            members
                .iter()
                .filter_map(|m| m.get("agent_name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn vote_text(event: &DeliberationEvent) -> String {
    let agent = event.str_field("agent_name").unwrap_or("?");
    match event.str_field("vote") {
        Some("agree") => format!("{} {} agrees", "v".green(), agent),
        Some("disagree") => format!("{} {} disagrees", "x".red(), agent),
        _ => format!("{} {} abstains", "-".dimmed(), agent),
    }
}

fn tally_text(event: &DeliberationEvent) -> String {
    let count = |key: &str| {
        event
            .data
            .get("vote_summary")
            .and_then(|t| t.get(key))
            .and_then(Value::as_u64)
            .unwrap_or(0)
    };
    format!(
        "Agree({}), Disagree({}), Abstain({})",
        count("agree"),
        count("disagree"),
        count("abstain")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::DeliberationId;
    use serde_json::json;

    fn event(kind: EventKind, data: Value) -> DeliberationEvent {
        colored::control::set_override(false);
        DeliberationEvent::new(DeliberationId::generate(), kind, data)
    }

    #[test]
    fn test_simple_lines() {
        let start = event(
            EventKind::DebateStart,
            json!({"members": [{"agent_name": "Ada"}, {"agent_name": "Bob"}]}),
        );
        assert_eq!(
            SimpleProgress::line(&start).unwrap(),
            "-> Deliberation started (Ada, Bob)"
        );

        let vote = event(
            EventKind::Vote,
            json!({"round": 1, "agent_name": "Bob", "vote": "disagree"}),
        );
        assert_eq!(SimpleProgress::line(&vote).unwrap(), "  x Bob disagrees");

        let complete = event(
            EventKind::RoundComplete,
            json!({"round": 1, "vote_summary": {"agree": 2, "disagree": 1, "abstain": 0}}),
        );
        assert_eq!(
            SimpleProgress::line(&complete).unwrap(),
            "  Agree(2), Disagree(1), Abstain(0)\n"
        );
    }

    #[test]
    fn test_chunks_are_silent() {
        let chunk = event(
            EventKind::AgentResponseChunk,
            json!({"chunk": "Hel", "full_content_so_far": "Hel"}),
        );
        assert!(SimpleProgress::line(&chunk).is_none());
    }

    #[tokio::test]
    async fn test_reporter_tracks_round_bar() {
        let reporter = ProgressReporter::new();
        reporter.multi.set_draw_target(indicatif::ProgressDrawTarget::hidden());

        reporter
            .on_event(&event(
                EventKind::DebateStart,
                json!({"panel_name": "Test", "members": [{"agent_name": "Ada"}, {"agent_name": "Bob"}]}),
            ))
            .await;
        reporter
            .on_event(&event(EventKind::RoundStart, json!({"round": 1, "max_rounds": 3})))
            .await;
        reporter
            .on_event(&event(EventKind::AgentResponse, json!({"round": 1, "agent_name": "Ada"})))
            .await;
        reporter
            .on_event(&event(
                EventKind::Vote,
                json!({"round": 1, "agent_name": "Ada", "vote": "agree"}),
            ))
            .await;

        {
            let slot = reporter.round_bar.lock().unwrap();
            let pb = slot.as_ref().unwrap();
            assert_eq!(pb.length(), Some(4));
            assert_eq!(pb.position(), 2);
        }

        reporter
            .on_event(&event(
                EventKind::RoundComplete,
                json!({"round": 1, "consensus": false, "vote_summary": {"agree": 1, "disagree": 0, "abstain": 0}}),
            ))
            .await;
        assert!(reporter.round_bar.lock().unwrap().is_none());
    }
}
