//! Event bus
//!
//! An insertion-ordered list of subscribers scoped to one deliberation.
//! Each emitted event is delivered to every subscriber in registration
//! order; the next event is not emitted until all handlers have returned.
//! Nothing is buffered or replayed for late subscribers.

use crate::ports::event_subscriber::EventSubscriber;
use async_trait::async_trait;
use council_domain::DeliberationEvent;
use std::future::Future;
use std::sync::Arc;

/// Ordered multi-subscriber notification channel
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Vec<Arc<dyn EventSubscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: Arc<dyn EventSubscriber>) {
        self.subscribers.push(subscriber);
    }

    /// Register a synchronous handler
    pub fn subscribe_fn<F>(&mut self, handler: F)
    where
        F: Fn(&DeliberationEvent) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(FnSubscriber(handler)));
    }

    /// Register an asynchronous handler; it receives an owned copy of the event
    pub fn subscribe_async<F, Fut>(&mut self, handler: F)
    where
        F: Fn(DeliberationEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.subscribe(Arc::new(AsyncFnSubscriber(handler)));
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Deliver an event to every subscriber, in order
    pub async fn emit(&self, event: DeliberationEvent) {
        for subscriber in &self.subscribers {
            subscriber.on_event(&event).await;
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

struct FnSubscriber<F>(F);

#[async_trait]
impl<F> EventSubscriber for FnSubscriber<F>
where
    F: Fn(&DeliberationEvent) + Send + Sync,
{
    async fn on_event(&self, event: &DeliberationEvent) {
        (self.0)(event)
    }
}

struct AsyncFnSubscriber<F>(F);

#[async_trait]
impl<F, Fut> EventSubscriber for AsyncFnSubscriber<F>
where
    F: Fn(DeliberationEvent) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send,
{
    async fn on_event(&self, event: &DeliberationEvent) {
        (self.0)(event.clone()).await
    }
}
