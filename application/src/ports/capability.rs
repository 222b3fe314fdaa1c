//! Capability port
//!
//! Defines the text-generation interface every panel member calls through.
//! Provider adapters (Ollama, hosted APIs) implement it in the
//! infrastructure layer; retry and backoff are their concern, not the
//! orchestrator's.

use async_trait::async_trait;
use council_domain::ProviderKind;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during a single member call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CapabilityError {
    #[error("Provider {0} not available")]
    Unavailable(ProviderKind),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// One generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_message: String,
    /// Model override; `None` uses the capability's default model
    pub model: Option<String>,
    pub max_tokens: u32,
}

impl GenerationRequest {
    pub fn new(
        system_prompt: impl Into<String>,
        user_message: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_message: user_message.into(),
            model: None,
            max_tokens,
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
}

/// Incremental output of a streaming generation
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A chunk of text
    Delta(String),
    /// An auxiliary call the provider made while generating
    ToolCall {
        name: String,
        arguments: serde_json::Value,
        result: String,
    },
    /// Generation finished; carries the full text
    Completed(String),
    /// Generation failed mid-stream
    Error(String),
}

/// Handle for receiving streaming events from a capability.
///
/// The stream is finite and not restartable. Dropping the handle abandons
/// the generation.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }
}

/// Text generation backend bound to one provider
#[async_trait]
pub trait Capability: Send + Sync {
    /// Provider this capability talks to
    fn provider(&self) -> ProviderKind;

    /// Model used when a request carries no override
    fn default_model(&self) -> &str;

    /// Generate a complete response
    async fn generate(&self, request: &GenerationRequest) -> Result<String, CapabilityError>;

    /// Generate a streaming response.
    ///
    /// Default implementation calls `generate()` and wraps the result in a
    /// single `Completed` event.
    async fn generate_stream(
        &self,
        request: &GenerationRequest,
    ) -> Result<StreamHandle, CapabilityError> {
        let result = self.generate(request).await?;
        let (tx, rx) = mpsc::channel(1);
        let _ = tx.send(StreamEvent::Completed(result)).await;
        Ok(StreamHandle::new(rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Capability for Echo {
        fn provider(&self) -> ProviderKind {
            ProviderKind::Ollama
        }

        fn default_model(&self) -> &str {
            "echo"
        }

        async fn generate(&self, request: &GenerationRequest) -> Result<String, CapabilityError> {
            Ok(request.user_message.clone())
        }
    }

    #[tokio::test]
    async fn test_default_stream_wraps_generate() {
        let request = GenerationRequest::new("sys", "hello", 16);
        let mut handle = Echo.generate_stream(&request).await.unwrap();
        assert_eq!(
            handle.receiver.recv().await,
            Some(StreamEvent::Completed("hello".to_string()))
        );
        assert_eq!(handle.receiver.recv().await, None);
    }
}
