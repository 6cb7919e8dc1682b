//! Model Gateway
//!
//! The seam between the application services and the model backend.
//! `ModelGateway` is the trait the chat session and extraction engine
//! program against; `HttpGateway` is the reqwest implementation talking
//! to an OpenAI-compatible chat-completions API.

use async_trait::async_trait;
use futures_util::StreamExt;
use loomline_core::{SseParser, StreamEvent};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::extraction::{extraction_user_prompt, parse_arguments, ExtractedPayload, ExtractionKind};
use crate::prompts::build_wire_messages;
use crate::types::{ChatRequest, GatewayConfig, LlmError, LlmResult};

/// Backend seam for streaming chat and structured extraction.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Run one streaming chat completion. Deltas are forwarded on `tx` as
    /// they arrive; the accumulated final text is returned. A dropped
    /// receiver stops delivery but not accumulation.
    async fn stream_chat(
        &self,
        request: ChatRequest,
        tx: mpsc::Sender<StreamEvent>,
    ) -> LlmResult<String>;

    /// Run one forced-tool-call extraction over `content`.
    async fn extract(&self, content: &str, kind: ExtractionKind) -> LlmResult<ExtractedPayload>;
}

/// Map a non-2xx gateway status to the error taxonomy. 429 and 402 carry
/// the body verbatim so callers can show it unchanged.
pub fn classify_http_error(status: u16, body: &str) -> LlmError {
    match status {
        429 => LlmError::RateLimited(body.to_string()),
        402 => LlmError::CreditsExhausted(body.to_string()),
        401 | 403 => LlmError::Auth(body.to_string()),
        _ => LlmError::Server {
            status,
            body: body.to_string(),
        },
    }
}

/// reqwest-backed gateway.
pub struct HttpGateway {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    async fn post(&self, body: &Value) -> LlmResult<reqwest::Response> {
        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body_text = response.text().await.unwrap_or_default();
            warn!(status, "gateway request failed");
            return Err(classify_http_error(status, &body_text));
        }
        Ok(response)
    }
}

#[async_trait]
impl ModelGateway for HttpGateway {
    async fn stream_chat(
        &self,
        request: ChatRequest,
        tx: mpsc::Sender<StreamEvent>,
    ) -> LlmResult<String> {
        let messages = build_wire_messages(&request);
        debug!(
            mode = %request.context.mode,
            turns = messages.len(),
            "starting streaming chat request"
        );

        let body = json!({
            "model": self.config.model,
            "messages": messages,
            "stream": true,
        });

        let response = self.post(&body).await?;

        let mut parser = SseParser::new();
        let mut accumulated = String::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            for event in parser.push(&String::from_utf8_lossy(&chunk)) {
                if let StreamEvent::Delta(delta) = &event {
                    accumulated.push_str(delta);
                }
                // Receiver may be gone; keep accumulating regardless.
                let _ = tx.send(event).await;
            }
            if parser.is_done() {
                break;
            }
        }

        debug!(chars = accumulated.len(), "stream complete");
        Ok(accumulated)
    }

    async fn extract(&self, content: &str, kind: ExtractionKind) -> LlmResult<ExtractedPayload> {
        debug!(kind = kind.as_str(), chars = content.len(), "extraction request");

        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": kind.system_prompt() },
                { "role": "user", "content": extraction_user_prompt(content) },
            ],
            "tools": [kind.tool_schema()],
            "tool_choice": { "type": "function", "function": { "name": kind.tool_name() } },
        });

        let response = self.post(&body).await?;
        let data: Value = response.json().await?;

        let arguments = data["choices"][0]["message"]["tool_calls"][0]["function"]["arguments"]
            .as_str()
            .ok_or(LlmError::MissingToolCall)?;

        parse_arguments(kind, arguments)
    }
}
