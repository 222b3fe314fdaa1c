//! Domain layer for agents-council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Panel
//!
//! A panel (council) is a named group of members, each bound to an LLM
//! provider and a role. The panel also fixes the round budget and the
//! consensus threshold.
//!
//! ## Deliberation
//!
//! A deliberation runs the panel on a topic in rounds:
//!
//! - **Response phase**: every member answers in parallel with the prior
//!   rounds as context
//! - **Vote phase**: every member votes AGREE / DISAGREE / ABSTAIN on whether
//!   the panel is converging
//! - **Consensus**: the round ends the run when the agree ratio meets the
//!   threshold; otherwise the next round starts until the budget runs out

pub mod config;
pub mod core;
pub mod deliberation;
pub mod panel;
pub mod prompt;
pub mod quorum;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{
    error::DomainError,
    ids::{DeliberationId, MemberId, PanelId},
    string::truncate_chars,
};
pub use deliberation::{
    Deliberation, DeliberationEvent, DeliberationReport, DeliberationStatus, EventKind,
    MemberResponse, Round, TOOL_RESULT_PREVIEW_CHARS, fallback_summary, round_context,
    rounds_transcript,
};
pub use panel::{DEFAULT_MAX_ROUNDS, MIN_MEMBERS, Panel, PanelMember, ProviderKind, Role};
pub use prompt::PromptTemplate;
pub use quorum::{
    ConsensusThreshold, DEFAULT_THRESHOLD, MAX_ARGUMENTS, ParsedVote, VoteTally, VoteType,
    parse_argument_list, parse_vote,
};
