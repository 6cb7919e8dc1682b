//! Context Assembly
//!
//! Loads a project's knowledge (tasks, decisions, documents) and hands it
//! to the pure context builder. This is the only place the builder's
//! inputs are gathered; callers never filter knowledge themselves.

use loomline_core::{build_context, Conversation, Message, StructuredContext};
use tracing::debug;

use crate::storage::Database;
use crate::utils::error::{AppError, AppResult};

#[derive(Clone)]
pub struct ContextService {
    db: Database,
}

impl ContextService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Build context from a loaded conversation and an in-memory message
    /// list. The message list is whatever the caller has loaded; no fresh
    /// fetch happens here.
    pub fn build(
        &self,
        conversation: &Conversation,
        messages: &[Message],
        include_recent_messages: bool,
    ) -> AppResult<StructuredContext> {
        let tasks = self.db.list_tasks(&conversation.project_id)?;
        let decisions = self.db.list_decisions(&conversation.project_id)?;
        let documents = self.db.list_documents(&conversation.project_id)?;

        let context = build_context(
            Some(conversation),
            &tasks,
            &decisions,
            &documents,
            messages,
            include_recent_messages,
        );
        debug!(
            mode = %context.mode,
            docs = context.pinned_documents.len(),
            decisions = context.accepted_decisions.len(),
            active = context.active_tasks.len(),
            blocked = context.blocked_tasks.len(),
            recent = context.recent_messages.len(),
            "context assembled"
        );
        Ok(context)
    }

    /// Convenience: load the conversation and its full history, then
    /// build.
    pub fn build_for_conversation(
        &self,
        conversation_id: &str,
        include_recent_messages: bool,
    ) -> AppResult<StructuredContext> {
        let conversation = self
            .db
            .get_conversation(conversation_id)?
            .ok_or_else(|| AppError::not_found(format!("conversation {}", conversation_id)))?;
        let messages = self.db.list_all_messages(conversation_id)?;
        self.build(&conversation, &messages, include_recent_messages)
    }
}
