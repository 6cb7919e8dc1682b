//! Structured Context Builder
//!
//! Assembles the mode-aware context payload sent to the model backend on
//! each chat turn. The per-mode selection policy is a declarative table
//! (`ModeProfile`) rather than branching logic, so it can be audited and
//! tested in isolation.
//!
//! The builder is a pure function of its inputs: no I/O, identical inputs
//! produce identical output. Filtering by status/pin state happens here,
//! never in the caller.

use serde::{Deserialize, Serialize};

use crate::types::{AiMode, Conversation, Decision, DecisionStatus, Document, Message, Task, TaskStatus};

/// Maximum number of recent messages included in context.
pub const MAX_RECENT_MESSAGES: usize = 10;

/// Character ceiling for document content in context payloads.
pub const DOC_CONTENT_MAX_CHARS: usize = 1000;

// ============================================================================
// Mode selection table
// ============================================================================

/// Which knowledge sections a mode pulls into context.
///
/// | mode           | pinned docs | decisions | active tasks | blocked tasks | force recent |
/// |----------------|-------------|-----------|--------------|---------------|--------------|
/// | design         | yes         | yes       | no           | no            | no           |
/// | debug          | no          | no        | yes          | yes           | yes          |
/// | planning       | no          | yes       | yes          | no            | no           |
/// | implementation | yes         | no        | yes          | no            | no           |
/// | review         | yes         | yes       | no           | no            | no           |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeProfile {
    pub mode: AiMode,
    pub include_pinned_documents: bool,
    pub include_decisions: bool,
    pub include_active_tasks: bool,
    pub include_blocked_tasks: bool,
    /// Debug mode always replays recent messages, regardless of the
    /// caller's preference.
    pub force_recent_messages: bool,
}

/// The selection policy, one row per mode.
pub const MODE_PROFILES: [ModeProfile; 5] = [
    ModeProfile {
        mode: AiMode::Design,
        include_pinned_documents: true,
        include_decisions: true,
        include_active_tasks: false,
        include_blocked_tasks: false,
        force_recent_messages: false,
    },
    ModeProfile {
        mode: AiMode::Debug,
        include_pinned_documents: false,
        include_decisions: false,
        include_active_tasks: true,
        include_blocked_tasks: true,
        force_recent_messages: true,
    },
    ModeProfile {
        mode: AiMode::Planning,
        include_pinned_documents: false,
        include_decisions: true,
        include_active_tasks: true,
        include_blocked_tasks: false,
        force_recent_messages: false,
    },
    ModeProfile {
        mode: AiMode::Implementation,
        include_pinned_documents: true,
        include_decisions: false,
        include_active_tasks: true,
        include_blocked_tasks: false,
        force_recent_messages: false,
    },
    ModeProfile {
        mode: AiMode::Review,
        include_pinned_documents: true,
        include_decisions: true,
        include_active_tasks: false,
        include_blocked_tasks: false,
        force_recent_messages: false,
    },
];

/// Look up the selection profile for a mode.
pub fn mode_profile(mode: AiMode) -> ModeProfile {
    // The table covers every AiMode variant; enforced by a test below.
    MODE_PROFILES
        .iter()
        .copied()
        .find(|p| p.mode == mode)
        .unwrap_or(MODE_PROFILES[0])
}

// ============================================================================
// Context payload types
// ============================================================================

/// Pinned document as rendered into context (content trimmed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDocument {
    pub title: String,
    pub content: String,
}

/// Accepted decision as rendered into context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDecision {
    pub title: String,
    pub decision: String,
    pub impact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

/// Task as rendered into context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextTask {
    pub title: String,
    pub status: String,
    pub priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_action: Option<String>,
}

/// Recent message as replayed into context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: String,
    pub content: String,
}

/// The computed, filtered, size-bounded knowledge bundle for one chat turn.
/// Ephemeral: built per send, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredContext {
    pub mode: AiMode,
    pub pinned_documents: Vec<ContextDocument>,
    pub accepted_decisions: Vec<ContextDecision>,
    pub active_tasks: Vec<ContextTask>,
    pub blocked_tasks: Vec<ContextTask>,
    pub conversation_summary: Option<String>,
    pub conversation_purpose: Option<String>,
    pub recent_messages: Vec<ContextMessage>,
    pub include_recent_messages: bool,
}

// ============================================================================
// Builder
// ============================================================================

/// Build the structured context for one chat turn.
///
/// `messages` is the chronological in-memory message list; the recent
/// window is sliced from it directly, never re-fetched from storage.
pub fn build_context(
    conversation: Option<&Conversation>,
    tasks: &[Task],
    decisions: &[Decision],
    documents: &[Document],
    messages: &[Message],
    include_recent_messages: bool,
) -> StructuredContext {
    let mode = conversation.map(|c| c.mode).unwrap_or_default();
    let profile = mode_profile(mode);

    // Universal filters, computed once.
    let pinned_docs: Vec<&Document> = documents.iter().filter(|d| d.is_pinned).collect();
    let accepted: Vec<&Decision> = decisions
        .iter()
        .filter(|d| d.status == DecisionStatus::Accepted)
        .collect();
    let in_progress: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::InProgress)
        .collect();
    let blocked: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Blocked)
        .collect();

    let include_recent = profile.force_recent_messages || include_recent_messages;

    let recent_messages = if include_recent {
        let start = messages.len().saturating_sub(MAX_RECENT_MESSAGES);
        messages[start..]
            .iter()
            .map(|m| ContextMessage {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    StructuredContext {
        mode,
        pinned_documents: if profile.include_pinned_documents {
            pinned_docs
                .iter()
                .map(|d| ContextDocument {
                    title: d.title.clone(),
                    content: trim_content(&d.content, DOC_CONTENT_MAX_CHARS),
                })
                .collect()
        } else {
            Vec::new()
        },
        accepted_decisions: if profile.include_decisions {
            accepted
                .iter()
                .map(|d| ContextDecision {
                    title: d.title.clone(),
                    decision: d.decision.clone(),
                    impact: d.impact.as_str().to_string(),
                    rationale: d.rationale.clone(),
                })
                .collect()
        } else {
            Vec::new()
        },
        active_tasks: if profile.include_active_tasks {
            in_progress.iter().map(|t| context_task(t)).collect()
        } else {
            Vec::new()
        },
        blocked_tasks: if profile.include_blocked_tasks {
            blocked.iter().map(|t| context_task(t)).collect()
        } else {
            Vec::new()
        },
        conversation_summary: conversation.and_then(|c| c.summary.clone()),
        conversation_purpose: conversation.and_then(|c| c.purpose.clone()),
        recent_messages,
        include_recent_messages: include_recent,
    }
}

/// Initial recent-message toggle when a conversation is (re)loaded: on
/// until a summary exists, since the summary supersedes raw history as the
/// cheaper context source. Explicit user toggles override this afterwards.
pub fn default_include_recent_messages(conversation: Option<&Conversation>) -> bool {
    match conversation {
        None => true,
        Some(c) => c.summary.is_none(),
    }
}

fn context_task(task: &Task) -> ContextTask {
    ContextTask {
        title: task.title.clone(),
        status: task.status.as_str().to_string(),
        priority: task.priority.as_str().to_string(),
        description: task.description.clone(),
        blocked_reason: task.blocked_reason.clone(),
        next_action: task.next_action.clone(),
    }
}

/// Trim to at most `max` characters, appending an ellipsis marker when
/// truncated. Operates on char boundaries.
fn trim_content(content: &str, max: usize) -> String {
    if content.chars().count() <= max {
        return content.to_string();
    }
    let truncated: String = content.chars().take(max).collect();
    format!("{}...", truncated)
}
