//! Gateway request/response types and the error taxonomy.

use loomline_core::StructuredContext;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Connection settings for the model gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the OpenAI-compatible API, without trailing slash.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ai.gateway.lovable.dev/v1".to_string(),
            api_key: String::new(),
            model: "google/gemini-2.5-flash".to_string(),
        }
    }
}

/// One wire-format chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A single streaming chat request: the computed context bundle plus the
/// new user turn. Prompt assembly happens gateway-side (`prompts`), so the
/// caller never builds wire messages itself.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub context: StructuredContext,
    pub user_text: String,
}

/// Errors from the model gateway.
///
/// `RateLimited` and `CreditsExhausted` carry the backend's response body
/// verbatim so the caller can surface it unchanged. Neither is retried.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("credits exhausted: {0}")]
    CreditsExhausted(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("model returned no tool call")]
    MissingToolCall,

    #[error("gateway error ({status}): {body}")]
    Server { status: u16, body: String },
}

impl LlmError {
    pub fn parse(msg: impl Into<String>) -> Self {
        LlmError::Parse(msg.into())
    }
}

pub type LlmResult<T> = Result<T, LlmError>;
