//! Message Store
//!
//! Cursor-paginated access to a conversation's messages, newest page
//! first, with an explicitly invalidated per-conversation cache for the
//! first page. Pages are returned in chronological order so the caller
//! can prepend older pages directly.

use mini_moka::sync::Cache;
use serde::Serialize;
use tracing::debug;

use loomline_core::{Message, MessageRole};

use crate::storage::Database;
use crate::utils::error::AppResult;
use crate::utils::time::{new_id, now_iso};

/// Messages fetched per page.
pub const PAGE_SIZE: usize = 20;

/// One page of messages, oldest first within the page.
#[derive(Debug, Clone, Serialize)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    /// Cursor for the next older page: the created_at of the oldest
    /// message in this page.
    pub oldest_cursor: Option<String>,
    /// True when a full page came back, so an older page may exist.
    pub has_more: bool,
}

/// Paginated message accessor with a first-page cache.
#[derive(Clone)]
pub struct MessageStore {
    db: Database,
    first_page_cache: Cache<String, MessagePage>,
}

impl MessageStore {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            first_page_cache: Cache::builder().max_capacity(256).build(),
        }
    }

    /// Fetch one page. No cursor fetches the newest `PAGE_SIZE` messages;
    /// a cursor fetches the page strictly older than it.
    pub fn fetch_page(
        &self,
        conversation_id: &str,
        cursor: Option<&str>,
    ) -> AppResult<MessagePage> {
        if cursor.is_none() {
            if let Some(page) = self.first_page_cache.get(&conversation_id.to_string()) {
                return Ok(page);
            }
        }

        let mut rows = self.db.list_messages_before(conversation_id, cursor, PAGE_SIZE)?;
        let has_more = rows.len() == PAGE_SIZE;
        rows.reverse();
        let page = MessagePage {
            oldest_cursor: rows.first().map(|m| m.created_at.clone()),
            has_more,
            messages: rows,
        };

        if cursor.is_none() {
            self.first_page_cache
                .insert(conversation_id.to_string(), page.clone());
        }
        Ok(page)
    }

    /// Full chronological history, bypassing pagination.
    pub fn fetch_all(&self, conversation_id: &str) -> AppResult<Vec<Message>> {
        self.db.list_all_messages(conversation_id)
    }

    /// Append a message and invalidate cached pages for the conversation.
    pub fn create(
        &self,
        conversation_id: &str,
        role: MessageRole,
        content: &str,
    ) -> AppResult<Message> {
        let now = now_iso();
        let message = Message {
            id: new_id(),
            conversation_id: conversation_id.to_string(),
            role,
            content: content.to_string(),
            created_at: now.clone(),
        };
        self.db.insert_message(&message)?;
        self.db.touch_conversation(conversation_id, &now)?;
        self.invalidate(conversation_id);
        debug!(conversation_id, role = role.as_str(), "message appended");
        Ok(message)
    }

    /// Drop the cached first page for a conversation.
    pub fn invalidate(&self, conversation_id: &str) {
        self.first_page_cache.invalidate(&conversation_id.to_string());
    }
}
