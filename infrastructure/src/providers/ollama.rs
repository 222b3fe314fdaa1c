//! Ollama chat adapter
//!
//! Talks to `POST {base_url}/chat`. Non-streaming calls return
//! `message.content`; streaming calls read newline-delimited JSON chunks
//! until one reports `done: true`.

use crate::config::FileOllamaConfig;
use async_trait::async_trait;
use council_application::{
    Capability, CapabilityError, GenerationRequest, StreamEvent, StreamHandle,
};
use council_domain::ProviderKind;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Buffered stream events per request
const STREAM_BUFFER: usize = 64;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    message: Option<ChunkMessage>,
    #[serde(default)]
    done: bool,
}

#[derive(Debug, Deserialize)]
struct ChunkMessage {
    #[serde(default)]
    content: String,
}

/// Capability backed by an Ollama server
pub struct OllamaCapability {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    default_model: String,
}

impl OllamaCapability {
    pub fn new(config: &FileOllamaConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.resolve_api_key(),
            default_model: config.default_model.clone(),
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url)
    }

    fn body<'a>(&'a self, request: &'a GenerationRequest, stream: bool) -> ChatRequest<'a> {
        ChatRequest {
            model: request.model.as_deref().unwrap_or(&self.default_model),
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_message,
                },
            ],
            stream,
            options: ChatOptions {
                num_predict: request.max_tokens,
            },
        }
    }

    async fn post(
        &self,
        request: &GenerationRequest,
        stream: bool,
    ) -> Result<reqwest::Response, CapabilityError> {
        let mut builder = self.client.post(self.chat_url()).json(&self.body(request, stream));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| CapabilityError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("Ollama API error: {} - {}", status.as_u16(), text);
            return Err(CapabilityError::RequestFailed(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl Capability for OllamaCapability {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, CapabilityError> {
        let response = self.post(request, false).await?;
        let chunk: ChatChunk = response
            .json()
            .await
            .map_err(|e| CapabilityError::InvalidResponse(e.to_string()))?;
        Ok(chunk.message.map(|m| m.content).unwrap_or_default())
    }

    async fn generate_stream(
        &self,
        request: &GenerationRequest,
    ) -> Result<StreamHandle, CapabilityError> {
        let response = self.post(request, true).await?;
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);

        tokio::spawn(async move {
            let mut bytes = response.bytes_stream();
            let mut lines = LineBuffer::default();
            let mut full_text = String::new();

            while let Some(next) = bytes.next().await {
                let chunk = match next {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                        return;
                    }
                };

                for line in lines.push(&chunk) {
                    match parse_line(&line) {
                        Some(ParsedLine::Delta(text)) => {
                            full_text.push_str(&text);
                            if tx.send(StreamEvent::Delta(text)).await.is_err() {
                                // Receiver dropped: the caller gave up
                                return;
                            }
                        }
                        Some(ParsedLine::Done(text)) => {
                            if !text.is_empty() {
                                full_text.push_str(&text);
                                let _ = tx.send(StreamEvent::Delta(text)).await;
                            }
                            let _ = tx.send(StreamEvent::Completed(full_text)).await;
                            return;
                        }
                        None => {}
                    }
                }
            }

            debug!("Ollama stream closed without a done marker");
            let _ = tx.send(StreamEvent::Completed(full_text)).await;
        });

        Ok(StreamHandle::new(rx))
    }
}

/// Splits a byte stream into complete lines
#[derive(Debug, Default)]
struct LineBuffer {
    buffer: String,
}

impl LineBuffer {
    /// Append bytes and return every line completed by them
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(bytes));

        let mut lines = Vec::new();
        while let Some(end) = self.buffer.find('\n') {
            let line = self.buffer[..end].trim().to_string();
            self.buffer.drain(..=end);
            if !line.is_empty() {
                lines.push(line);
            }
        }
        lines
    }
}

#[derive(Debug, PartialEq)]
enum ParsedLine {
    Delta(String),
    /// Final chunk, possibly carrying trailing text
    Done(String),
}

/// Interpret one NDJSON line; malformed or empty lines yield `None`
fn parse_line(line: &str) -> Option<ParsedLine> {
    let chunk: ChatChunk = serde_json::from_str(line).ok()?;
    let text = chunk.message.map(|m| m.content).unwrap_or_default();
    if chunk.done {
        Some(ParsedLine::Done(text))
    } else if text.is_empty() {
        None
    } else {
        Some(ParsedLine::Delta(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_buffer_handles_split_lines() {
        let mut lines = LineBuffer::default();
        assert!(lines.push(b"{\"a\":").is_empty());
        assert_eq!(lines.push(b"1}\n{\"b\":2}\n{\"c\""), vec!["{\"a\":1}", "{\"b\":2}"]);
        assert_eq!(lines.push(b":3}\n\n"), vec!["{\"c\":3}"]);
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line(r#"{"message":{"role":"assistant","content":"Hel"},"done":false}"#),
            Some(ParsedLine::Delta("Hel".to_string()))
        );
        assert_eq!(
            parse_line(r#"{"message":{"role":"assistant","content":""},"done":true}"#),
            Some(ParsedLine::Done(String::new()))
        );
        assert_eq!(parse_line("not json"), None);
        assert_eq!(
            parse_line(r#"{"message":{"role":"assistant","content":""},"done":false}"#),
            None
        );
    }

    #[test]
    fn test_request_body_uses_default_model() {
        let capability = OllamaCapability::new(&FileOllamaConfig {
            base_url: "http://localhost:11434/api/".to_string(),
            api_key_env: "COUNCIL_TEST_UNSET_OLLAMA_KEY".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(capability.chat_url(), "http://localhost:11434/api/chat");

        let request = GenerationRequest::new("sys", "hello", 256);
        let body = serde_json::to_value(capability.body(&request, true)).unwrap();
        assert_eq!(body["model"], "qwen3:8b");
        assert_eq!(body["stream"], true);
        assert_eq!(body["options"]["num_predict"], 256);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hello");

        let request = request.with_model(Some("llama3.1:8b".to_string()));
        let body = serde_json::to_value(capability.body(&request, false)).unwrap();
        assert_eq!(body["model"], "llama3.1:8b");
    }
}
