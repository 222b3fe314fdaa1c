//! Event subscriber port
//!
//! Anything that wants to follow a deliberation live (console progress,
//! JSONL transcript, a push transport) implements [`EventSubscriber`] and
//! registers on the [`EventBus`](crate::events::EventBus) before the run
//! starts.

use async_trait::async_trait;
use council_domain::DeliberationEvent;

/// Receiver of deliberation events.
///
/// Handlers are awaited in registration order before the next event is
/// emitted, so a slow handler stalls the deliberation.
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    async fn on_event(&self, event: &DeliberationEvent);
}
