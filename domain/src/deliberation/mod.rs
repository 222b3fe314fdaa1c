//! Deliberation domain: the record of one panel run and its lifecycle.

pub mod entities;
pub mod event;
pub mod status;
pub mod transcript;

pub use entities::{Deliberation, DeliberationReport, MemberResponse, Round};
pub use event::{DeliberationEvent, EventKind, TOOL_RESULT_PREVIEW_CHARS};
pub use status::DeliberationStatus;
pub use transcript::{fallback_summary, round_context, rounds_transcript};
