//! Loomline LLM
//!
//! Client layer for the OpenAI-compatible model gateway: streaming chat
//! completions, forced-tool-call extraction, prompt assembly, and the
//! gateway error taxonomy. Everything network-facing sits behind the
//! `ModelGateway` trait so services can be tested against a scripted
//! implementation.

pub mod extraction;
pub mod gateway;
pub mod prompts;
pub mod types;

pub use extraction::{
    parse_arguments, ExtractedDecision, ExtractedDocument, ExtractedItems, ExtractedPayload,
    ExtractedTask, ExtractionKind,
};
pub use gateway::{classify_http_error, HttpGateway, ModelGateway};
pub use prompts::{build_system_prompt, build_wire_messages, mode_system_prompt, render_context};
pub use types::{ChatRequest, ChatTurn, GatewayConfig, LlmError, LlmResult};
