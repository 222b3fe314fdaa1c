//! Application layer for agents-council
//!
//! This crate contains use cases, port definitions, the event bus, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod events;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::DeliberationParams;
pub use events::{EventBus, RoundCheckpointer};
pub use ports::{
    capability::{Capability, CapabilityError, GenerationRequest, StreamEvent, StreamHandle},
    event_subscriber::EventSubscriber,
    registry::CapabilityRegistry,
    repository::{DeliberationRepository, RepositoryError},
};
pub use use_cases::run_deliberation::{DeliberationError, DeliberationStateMachine, MemberOutcome};
pub use use_cases::summarize::{SummarizeDeliberationUseCase, SummaryOutput};
