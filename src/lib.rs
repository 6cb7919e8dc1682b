//! Loomline - Project-Knowledge Tracker Engine
//!
//! This library turns AI chat conversations into structured project
//! knowledge. It includes:
//! - Conversation lifecycle management with health tracking and archival
//! - A mode-aware context builder feeding each chat turn
//! - A streaming chat session controller over an SSE model gateway
//! - A forced-tool-call extraction engine for tasks, decisions, documents
//! - Storage layer (SQLite) and cursor-paginated message access

pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use services::{
    ActivityKind, ActivityLog, ArchivedConversationView, ChatSession, ContextService,
    ConversationLifecycle, ExtractionEngine, ExtractionReport, MessagePage, MessageStore,
    MIN_SUMMARY_LENGTH, PAGE_SIZE,
};
pub use state::AppState;
pub use storage::{load_gateway_config, save_gateway_config, Database};
pub use utils::error::{AppError, AppResult};

// Domain and gateway types embedders work with directly.
pub use loomline_core::{
    build_context, default_include_recent_messages, AiMode, Conversation, Decision,
    DecisionStatus, Document, HealthStatus, Impact, Message, MessageRole, Priority, Project,
    StreamEvent, StructuredContext, Task, TaskStatus,
};
pub use loomline_llm::{
    ChatRequest, ExtractedPayload, ExtractionKind, GatewayConfig, HttpGateway, LlmError,
    ModelGateway,
};
