//! Streaming Chat Session
//!
//! Drives one conversation's send loop: validate, persist the user turn,
//! assemble context, stream the completion, and persist the assistant
//! turn only when the stream ends cleanly. A single-flight guard keeps
//! one send in flight per session; a failed stream discards the partial
//! text but never rolls back the user message.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use loomline_core::{default_include_recent_messages, Conversation, Message, MessageRole, StreamEvent};
use loomline_llm::{ChatRequest, ModelGateway};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::services::context::ContextService;
use crate::services::messages::MessageStore;
use crate::storage::Database;
use crate::utils::error::{AppError, AppResult};

pub struct ChatSession {
    db: Database,
    store: MessageStore,
    context: ContextService,
    gateway: Arc<dyn ModelGateway>,
    conversation_id: String,
    streaming: AtomicBool,
    include_recent_messages: AtomicBool,
}

impl ChatSession {
    /// Open a session for a conversation. The recent-message toggle
    /// starts from the summary-aware default and can be overridden with
    /// `set_include_recent_messages`.
    pub fn open(
        db: Database,
        store: MessageStore,
        context: ContextService,
        gateway: Arc<dyn ModelGateway>,
        conversation_id: &str,
    ) -> AppResult<Self> {
        let conversation = db
            .get_conversation(conversation_id)?
            .ok_or_else(|| AppError::not_found(format!("conversation {}", conversation_id)))?;
        let include_recent = default_include_recent_messages(Some(&conversation));
        Ok(Self {
            db,
            store,
            context,
            gateway,
            conversation_id: conversation_id.to_string(),
            streaming: AtomicBool::new(false),
            include_recent_messages: AtomicBool::new(include_recent),
        })
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming.load(Ordering::SeqCst)
    }

    pub fn include_recent_messages(&self) -> bool {
        self.include_recent_messages.load(Ordering::SeqCst)
    }

    pub fn set_include_recent_messages(&self, include: bool) {
        self.include_recent_messages.store(include, Ordering::SeqCst);
    }

    /// Send one user message and stream the reply. Deltas arrive on `tx`;
    /// the persisted assistant message is returned, or `None` when the
    /// stream produced no content. Dropping the receiver stops delivery
    /// but the send still runs to completion.
    pub async fn send(
        &self,
        user_text: &str,
        tx: mpsc::Sender<StreamEvent>,
    ) -> AppResult<Option<Message>> {
        let trimmed = user_text.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("Message is empty"));
        }

        let conversation = self
            .db
            .get_conversation(&self.conversation_id)?
            .ok_or_else(|| AppError::not_found(format!("conversation {}", self.conversation_id)))?;
        if conversation.is_archived {
            return Err(AppError::validation(
                "Cannot send to an archived conversation",
            ));
        }

        // Single-flight guard; released on every exit path below.
        if self
            .streaming
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AppError::validation("A response is already streaming"));
        }

        let result = self.run_send(&conversation, trimmed, tx).await;
        self.streaming.store(false, Ordering::SeqCst);
        result
    }

    async fn run_send(
        &self,
        conversation: &Conversation,
        user_text: &str,
        tx: mpsc::Sender<StreamEvent>,
    ) -> AppResult<Option<Message>> {
        // History as of before this turn; the new user message rides in
        // the request explicitly, not through the recent window.
        let history = self.store.fetch_all(&self.conversation_id)?;

        // The user turn is durable before any network traffic.
        self.store
            .create(&self.conversation_id, MessageRole::User, user_text)?;

        let context =
            self.context
                .build(conversation, &history, self.include_recent_messages())?;
        let request = ChatRequest {
            context,
            user_text: user_text.to_string(),
        };

        match self.gateway.stream_chat(request, tx).await {
            Ok(full_text) => {
                if full_text.is_empty() {
                    debug!(conversation_id = %self.conversation_id, "stream produced no content");
                    return Ok(None);
                }
                let message = self.store.create(
                    &self.conversation_id,
                    MessageRole::Assistant,
                    &full_text,
                )?;
                info!(
                    conversation_id = %self.conversation_id,
                    chars = full_text.len(),
                    "assistant message persisted"
                );
                Ok(Some(message))
            }
            Err(e) => {
                // Partial text is discarded; the user message stays.
                warn!(conversation_id = %self.conversation_id, error = %e, "stream failed");
                Err(e.into())
            }
        }
    }
}
