//! CLI command definitions

use clap::{Parser, ValueEnum};
use council_domain::OutputFormat;
use std::path::PathBuf;

/// Output format selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Every round, response and vote, then the summary
    Full,
    /// Outcome, summary and key points
    Summary,
    /// The deliberation record as JSON
    Json,
}

impl From<OutputMode> for OutputFormat {
    fn from(mode: OutputMode) -> Self {
        match mode {
            OutputMode::Full => OutputFormat::Full,
            OutputMode::Summary => OutputFormat::Summary,
            OutputMode::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for agents-council
#[derive(Parser, Debug)]
#[command(name = "agents-council")]
#[command(author, version, about = "Agents Council - A panel of LLM personas debates a topic until it agrees")]
#[command(long_about = r#"
Agents Council runs a panel of LLM-backed personas through rounds of debate.

Each round:
1. Every member responds to the topic and the previous rounds in parallel
2. Every member votes agree / disagree / abstain on the state of the debate
3. The votes are tallied against the panel's consensus threshold

The debate stops at consensus or at the round limit, and a moderator
summarizes the arguments for and against.

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables (nested keys split on "__")
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/agents-council/config.toml   Global config

Example:
  agents-council "Should we migrate the billing service to Rust?"
  agents-council -r 3 -t 0.66 -o full "Is remote work here to stay?"
"#)]
pub struct Cli {
    /// The topic for the council to debate
    pub topic: Option<String>,

    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Maximum number of debate rounds (overrides config)
    #[arg(short, long, value_name = "N")]
    pub rounds: Option<u32>,

    /// Share of agreeing votes needed for consensus, in (0, 1]
    #[arg(short, long, value_name = "RATIO")]
    pub threshold: Option<f64>,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputMode>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Persist deliberations to this JSON file (overrides config)
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Append every deliberation event to this JSONL file (overrides config)
    #[arg(long, value_name = "PATH")]
    pub events: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "agents-council",
            "-r",
            "3",
            "-t",
            "0.66",
            "-o",
            "json",
            "-vv",
            "--store",
            "runs.json",
            "Tabs or spaces?",
        ])
        .unwrap();

        assert_eq!(cli.topic.as_deref(), Some("Tabs or spaces?"));
        assert_eq!(cli.rounds, Some(3));
        assert_eq!(cli.threshold, Some(0.66));
        assert_eq!(cli.output, Some(OutputMode::Json));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.store, Some(PathBuf::from("runs.json")));
        assert!(cli.events.is_none());
        assert!(!cli.quiet);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["agents-council", "--show-config"]).unwrap();
        assert!(cli.topic.is_none());
        assert!(cli.show_config);
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_output_mode_maps_to_format() {
        assert_eq!(OutputFormat::from(OutputMode::Full), OutputFormat::Full);
        assert_eq!(OutputFormat::from(OutputMode::Summary), OutputFormat::Summary);
        assert_eq!(OutputFormat::from(OutputMode::Json), OutputFormat::Json);
    }
}
