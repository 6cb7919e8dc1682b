//! Conversation Lifecycle
//!
//! Creation, archival, and mode management for conversations. Archival
//! requires a meaningful summary; unarchiving keeps the summary so the
//! context builder can still lean on it. Archived conversations open as
//! a summary-only view until history is explicitly requested.

use loomline_core::{AiMode, Conversation, HealthStatus, Message};
use tracing::info;

use crate::services::activity::{ActivityKind, ActivityLog};
use crate::storage::Database;
use crate::utils::error::{AppError, AppResult};
use crate::utils::time::{new_id, now_iso};

/// Minimum trimmed summary length required to archive.
pub const MIN_SUMMARY_LENGTH: usize = 20;

/// Lazily loaded history of an archived conversation.
#[derive(Debug, Clone)]
enum HistoryState {
    SummaryOnly,
    Loaded(Vec<Message>),
}

/// Read view over an archived conversation: summary and purpose are
/// available immediately, messages only after `load_history`.
pub struct ArchivedConversationView {
    db: Database,
    conversation: Conversation,
    history: HistoryState,
}

impl std::fmt::Debug for ArchivedConversationView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchivedConversationView")
            .field("conversation", &self.conversation)
            .field("history", &self.history)
            .finish()
    }
}

impl ArchivedConversationView {
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn summary(&self) -> Option<&str> {
        self.conversation.summary.as_deref()
    }

    pub fn purpose(&self) -> Option<&str> {
        self.conversation.purpose.as_deref()
    }

    /// Whether the full history has been pulled in.
    pub fn history_loaded(&self) -> bool {
        matches!(self.history, HistoryState::Loaded(_))
    }

    /// Load the full message history on first call; later calls return
    /// the already-loaded list.
    pub fn load_history(&mut self) -> AppResult<&[Message]> {
        if let HistoryState::SummaryOnly = self.history {
            let messages = self.db.list_all_messages(&self.conversation.id)?;
            self.history = HistoryState::Loaded(messages);
        }
        match &self.history {
            HistoryState::Loaded(messages) => Ok(messages),
            HistoryState::SummaryOnly => unreachable!("history just loaded"),
        }
    }
}

#[derive(Clone)]
pub struct ConversationLifecycle {
    db: Database,
    activity: ActivityLog,
}

impl ConversationLifecycle {
    pub fn new(db: Database, activity: ActivityLog) -> Self {
        Self { db, activity }
    }

    /// Start a new active conversation.
    pub fn create(
        &self,
        project_id: &str,
        title: &str,
        purpose: Option<&str>,
        mode: AiMode,
    ) -> AppResult<Conversation> {
        let now = now_iso();
        let conversation = Conversation {
            id: new_id(),
            project_id: project_id.to_string(),
            title: title.to_string(),
            purpose: purpose.map(|p| p.to_string()),
            summary: None,
            mode,
            is_archived: false,
            created_at: now.clone(),
            updated_at: now,
            message_count: 0,
        };
        self.db.insert_conversation(&conversation)?;
        self.activity.record(
            project_id,
            ActivityKind::Created,
            "conversation",
            &conversation.id,
            &format!("Started conversation {}", title),
        );
        info!(id = %conversation.id, mode = %mode, "conversation created");
        Ok(conversation)
    }

    pub fn get(&self, id: &str) -> AppResult<Conversation> {
        self.db
            .get_conversation(id)?
            .ok_or_else(|| AppError::not_found(format!("conversation {}", id)))
    }

    /// Conversations of a project, most recently updated first.
    pub fn list(&self, project_id: &str) -> AppResult<Vec<Conversation>> {
        self.db.list_conversations(project_id)
    }

    /// Archive with a summary. The summary is trimmed and must be at
    /// least `MIN_SUMMARY_LENGTH` characters; a too-short summary fails
    /// validation with no state change.
    pub fn archive(
        &self,
        id: &str,
        summary: &str,
        purpose: Option<&str>,
    ) -> AppResult<Conversation> {
        let trimmed = summary.trim();
        if trimmed.chars().count() < MIN_SUMMARY_LENGTH {
            return Err(AppError::validation(format!(
                "Summary must be at least {} characters",
                MIN_SUMMARY_LENGTH
            )));
        }

        let conversation = self.get(id)?;
        self.db
            .archive_conversation(id, trimmed, purpose, &now_iso())?;
        self.activity.record(
            &conversation.project_id,
            ActivityKind::Archived,
            "conversation",
            id,
            &format!("Archived conversation {}", conversation.title),
        );
        info!(id, "conversation archived");
        self.get(id)
    }

    /// Reactivate an archived conversation. No preconditions; the stored
    /// summary survives.
    pub fn unarchive(&self, id: &str) -> AppResult<Conversation> {
        self.db.unarchive_conversation(id, &now_iso())?;
        let conversation = self.get(id)?;
        self.activity.record(
            &conversation.project_id,
            ActivityKind::Updated,
            "conversation",
            id,
            &format!("Reactivated conversation {}", conversation.title),
        );
        info!(id, "conversation unarchived");
        Ok(conversation)
    }

    pub fn set_mode(&self, id: &str, mode: AiMode) -> AppResult<Conversation> {
        self.db.set_conversation_mode(id, mode, &now_iso())?;
        self.get(id)
    }

    pub fn rename(&self, id: &str, title: &str) -> AppResult<Conversation> {
        self.db.rename_conversation(id, title, &now_iso())?;
        self.get(id)
    }

    /// Health classification from the current message count.
    pub fn health(&self, id: &str) -> AppResult<HealthStatus> {
        let count = self.db.message_count(id)?;
        Ok(HealthStatus::classify(count))
    }

    /// Whether the UI should prompt for a summary: the conversation has
    /// crossed the archive-recommended threshold and has none yet.
    pub fn should_prompt_summary(&self, id: &str) -> AppResult<bool> {
        let conversation = self.get(id)?;
        let status = HealthStatus::classify(self.db.message_count(id)?);
        Ok(status == HealthStatus::ArchiveRecommended && conversation.summary.is_none())
    }

    /// Open an archived conversation as a summary-only view.
    pub fn view_archived(&self, id: &str) -> AppResult<ArchivedConversationView> {
        let conversation = self.get(id)?;
        if !conversation.is_archived {
            return Err(AppError::validation(format!(
                "Conversation {} is not archived",
                id
            )));
        }
        Ok(ArchivedConversationView {
            db: self.db.clone(),
            conversation,
            history: HistoryState::SummaryOnly,
        })
    }
}
