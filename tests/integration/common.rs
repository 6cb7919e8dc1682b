//! Shared Test Fixtures
//!
//! An in-memory `AppState` wired to a scripted model gateway, plus seed
//! helpers for projects, conversations, and knowledge entities.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use loomline::{
    AiMode, AppState, ChatRequest, Conversation, Database, Decision, DecisionStatus, Document,
    ExtractedPayload, ExtractionKind, LlmError, Message, MessageRole, ModelGateway, Priority,
    Project, StreamEvent, Task, TaskStatus,
};
use loomline_llm::LlmResult;

/// Gateway whose responses are scripted per test.
pub struct ScriptedGateway {
    pub chat_deltas: Vec<String>,
    pub chat_outcome: Mutex<Option<LlmResult<String>>>,
    pub extract_outcome: Mutex<Option<LlmResult<ExtractedPayload>>>,
    pub chat_requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedGateway {
    pub fn chat(deltas: &[&str]) -> Arc<Self> {
        let full: String = deltas.concat();
        Arc::new(Self {
            chat_deltas: deltas.iter().map(|s| s.to_string()).collect(),
            chat_outcome: Mutex::new(Some(Ok(full))),
            extract_outcome: Mutex::new(None),
            chat_requests: Mutex::new(Vec::new()),
        })
    }

    pub fn chat_failing(error: LlmError) -> Arc<Self> {
        Arc::new(Self {
            chat_deltas: vec!["partial".to_string()],
            chat_outcome: Mutex::new(Some(Err(error))),
            extract_outcome: Mutex::new(None),
            chat_requests: Mutex::new(Vec::new()),
        })
    }

    pub fn extracting(payload: ExtractedPayload) -> Arc<Self> {
        Arc::new(Self {
            chat_deltas: Vec::new(),
            chat_outcome: Mutex::new(None),
            extract_outcome: Mutex::new(Some(Ok(payload))),
            chat_requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn stream_chat(
        &self,
        request: ChatRequest,
        tx: mpsc::Sender<StreamEvent>,
    ) -> LlmResult<String> {
        self.chat_requests.lock().unwrap().push(request);
        for delta in &self.chat_deltas {
            let _ = tx.send(StreamEvent::Delta(delta.clone())).await;
        }
        let _ = tx.send(StreamEvent::Done).await;
        self.chat_outcome
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Ok(String::new()))
    }

    async fn extract(&self, _content: &str, _kind: ExtractionKind) -> LlmResult<ExtractedPayload> {
        self.extract_outcome
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(LlmError::MissingToolCall))
    }
}

/// In-memory state wired to the given gateway, seeded with project `p1`.
pub fn state_with_gateway(gateway: Arc<dyn ModelGateway>) -> AppState {
    let db = Database::new_in_memory().expect("in-memory db");
    db.insert_project(&Project {
        id: "p1".to_string(),
        name: "Test Project".to_string(),
        created_at: "2025-01-01T00:00:00Z".to_string(),
    })
    .expect("seed project");
    AppState::with_parts(db, gateway)
}

/// Seed a conversation directly with fixed timestamps.
pub fn seed_conversation(state: &AppState, id: &str, mode: AiMode) -> Conversation {
    let conversation = Conversation {
        id: id.to_string(),
        project_id: "p1".to_string(),
        title: format!("Conversation {}", id),
        purpose: None,
        summary: None,
        mode,
        is_archived: false,
        created_at: "2025-01-01T00:00:00Z".to_string(),
        updated_at: "2025-01-01T00:00:00Z".to_string(),
        message_count: 0,
    };
    state.db.insert_conversation(&conversation).expect("seed conversation");
    conversation
}

/// Seed `count` messages with deterministic ascending timestamps.
pub fn seed_messages(state: &AppState, conversation_id: &str, count: usize) {
    for i in 0..count {
        state
            .db
            .insert_message(&Message {
                id: format!("m{:03}", i),
                conversation_id: conversation_id.to_string(),
                role: if i % 2 == 0 { MessageRole::User } else { MessageRole::Assistant },
                content: format!("msg {}", i),
                created_at: format!("2025-01-01T00:{:02}:{:02}Z", i / 60, i % 60),
            })
            .expect("seed message");
    }
}

pub fn seed_task(state: &AppState, id: &str, status: TaskStatus) {
    state
        .db
        .insert_task(&Task {
            id: id.to_string(),
            project_id: "p1".to_string(),
            conversation_id: None,
            title: format!("Task {}", id),
            description: None,
            status,
            priority: Priority::Medium,
            blocked_reason: if status == TaskStatus::Blocked {
                Some("waiting on dependency".to_string())
            } else {
                None
            },
            next_action: None,
        })
        .expect("seed task");
}

pub fn seed_decision(state: &AppState, id: &str, status: DecisionStatus) {
    state
        .db
        .insert_decision(&Decision {
            id: id.to_string(),
            project_id: "p1".to_string(),
            conversation_id: None,
            title: format!("Decision {}", id),
            decision: "use sqlite".to_string(),
            rationale: None,
            status,
            impact: loomline::Impact::High,
        })
        .expect("seed decision");
}

pub fn seed_document(state: &AppState, id: &str, pinned: bool) {
    state
        .db
        .insert_document(&Document {
            id: id.to_string(),
            project_id: "p1".to_string(),
            title: format!("Doc {}", id),
            content: "content".to_string(),
            is_pinned: pinned,
        })
        .expect("seed document");
}
