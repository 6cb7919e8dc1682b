//! Application State
//!
//! Composition root: opens the database, loads the gateway config, and
//! wires the services. Embedders hold one `AppState` and open chat
//! sessions per conversation.

use std::sync::Arc;

use loomline_llm::{HttpGateway, ModelGateway};

use crate::services::{
    ActivityLog, ChatSession, ContextService, ConversationLifecycle, ExtractionEngine,
    MessageStore,
};
use crate::storage::{load_gateway_config, Database};
use crate::utils::error::AppResult;

pub struct AppState {
    pub db: Database,
    pub gateway: Arc<dyn ModelGateway>,
    pub messages: MessageStore,
    pub context: ContextService,
    pub lifecycle: ConversationLifecycle,
    pub extraction: ExtractionEngine,
    pub activity: ActivityLog,
}

impl AppState {
    /// Open the on-disk database and build the HTTP gateway from stored
    /// settings.
    pub fn new() -> AppResult<Self> {
        let db = Database::new()?;
        let config = load_gateway_config(&db)?;
        let gateway: Arc<dyn ModelGateway> = Arc::new(HttpGateway::new(config));
        Ok(Self::with_parts(db, gateway))
    }

    /// Assemble state from explicit parts. Tests pass an in-memory
    /// database and a scripted gateway.
    pub fn with_parts(db: Database, gateway: Arc<dyn ModelGateway>) -> Self {
        let activity = ActivityLog::new(db.clone());
        let messages = MessageStore::new(db.clone());
        let context = ContextService::new(db.clone());
        let lifecycle = ConversationLifecycle::new(db.clone(), activity.clone());
        let extraction = ExtractionEngine::new(db.clone(), gateway.clone(), activity.clone());
        Self {
            db,
            gateway,
            messages,
            context,
            lifecycle,
            extraction,
            activity,
        }
    }

    /// Open a chat session bound to one conversation.
    pub fn chat_session(&self, conversation_id: &str) -> AppResult<ChatSession> {
        ChatSession::open(
            self.db.clone(),
            self.messages.clone(),
            self.context.clone(),
            self.gateway.clone(),
            conversation_id,
        )
    }
}
