//! Application Services
//!
//! The service layer wiring storage, the context builder, and the model
//! gateway together.

pub mod activity;
pub mod chat;
pub mod context;
pub mod extraction;
pub mod lifecycle;
pub mod messages;

pub use activity::{ActivityKind, ActivityLog};
pub use chat::ChatSession;
pub use context::ContextService;
pub use extraction::{ExtractionEngine, ExtractionReport};
pub use lifecycle::{ArchivedConversationView, ConversationLifecycle, MIN_SUMMARY_LENGTH};
pub use messages::{MessagePage, MessageStore, PAGE_SIZE};
