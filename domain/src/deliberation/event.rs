//! Progress events published while a deliberation runs.

use crate::core::ids::DeliberationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum characters of a tool result carried in a `tool_call` event
pub const TOOL_RESULT_PREVIEW_CHARS: usize = 500;

/// Kind tag of a [`DeliberationEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    DebateStart,
    RoundStart,
    AgentThinking,
    AgentResponseChunk,
    AgentResponse,
    ToolCall,
    Vote,
    RoundComplete,
    DebateComplete,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::DebateStart => "debate_start",
            EventKind::RoundStart => "round_start",
            EventKind::AgentThinking => "agent_thinking",
            EventKind::AgentResponseChunk => "agent_response_chunk",
            EventKind::AgentResponse => "agent_response",
            EventKind::ToolCall => "tool_call",
            EventKind::Vote => "vote",
            EventKind::RoundComplete => "round_complete",
            EventKind::DebateComplete => "debate_complete",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A snapshot notification about a deliberation's progress.
///
/// The payload is free-form JSON shaped by the event kind; subscribers get
/// owned copies, never a live reference to the deliberation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationEvent {
    pub deliberation_id: DeliberationId,
    #[serde(rename = "event_type")]
    pub kind: EventKind,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
}

impl DeliberationEvent {
    pub fn new(deliberation_id: DeliberationId, kind: EventKind, data: Value) -> Self {
        Self {
            deliberation_id,
            kind,
            data,
            timestamp: Utc::now(),
        }
    }

    /// Round number carried in the payload, if any
    pub fn round(&self) -> Option<u32> {
        self.data
            .get("round")
            .and_then(Value::as_u64)
            .and_then(|r| u32::try_from(r).ok())
    }

    /// String field from the payload
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}
