//! Loomline Core
//!
//! Pure domain layer for the project-knowledge tracker: shared types,
//! the mode-aware context builder, conversation health classification,
//! and the incremental SSE parser. No I/O lives here; everything is a
//! function of its inputs so the policy surface stays unit-testable.

pub mod context;
pub mod error;
pub mod health;
pub mod streaming;
pub mod types;

pub use context::{
    build_context, default_include_recent_messages, mode_profile, ContextDecision,
    ContextDocument, ContextMessage, ContextTask, ModeProfile, StructuredContext,
    DOC_CONTENT_MAX_CHARS, MAX_RECENT_MESSAGES,
};
pub use error::{CoreError, CoreResult};
pub use health::HealthStatus;
pub use streaming::{SseParser, StreamEvent};
pub use types::{
    AiMode, Conversation, Decision, DecisionStatus, Document, Impact, Level, Message,
    MessageRole, Priority, Project, Task, TaskStatus,
};
