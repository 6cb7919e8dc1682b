//! Domain Types
//!
//! Entity types and closed enumerations shared across the Loomline
//! workspace. Enum wire representations match the persisted string values,
//! so a `task_status` column round-trips through `as_str`/`parse` without
//! translation tables.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

// ============================================================================
// Enumerations
// ============================================================================

/// Operating mode of a conversation. Selects which project-knowledge subset
/// and prompt framing apply to each chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiMode {
    Design,
    Debug,
    Planning,
    Implementation,
    Review,
}

impl AiMode {
    /// All modes, in presentation order.
    pub const ALL: [AiMode; 5] = [
        AiMode::Design,
        AiMode::Debug,
        AiMode::Planning,
        AiMode::Implementation,
        AiMode::Review,
    ];

    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AiMode::Design => "design",
            AiMode::Debug => "debug",
            AiMode::Planning => "planning",
            AiMode::Implementation => "implementation",
            AiMode::Review => "review",
        }
    }

    /// Parse from database string representation
    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "design" => Ok(AiMode::Design),
            "debug" => Ok(AiMode::Debug),
            "planning" => Ok(AiMode::Planning),
            "implementation" => Ok(AiMode::Implementation),
            "review" => Ok(AiMode::Review),
            _ => Err(CoreError::parse(format!("Invalid AI mode: {}", s))),
        }
    }
}

impl Default for AiMode {
    fn default() -> Self {
        AiMode::Design
    }
}

impl std::fmt::Display for AiMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            _ => Err(CoreError::parse(format!("Invalid message role: {}", s))),
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Blocked,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Done => "done",
        }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "blocked" => Ok(TaskStatus::Blocked),
            "done" => Ok(TaskStatus::Done),
            _ => Err(CoreError::parse(format!("Invalid task status: {}", s))),
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a recorded decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    Proposed,
    Accepted,
    Deprecated,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Proposed => "proposed",
            DecisionStatus::Accepted => "accepted",
            DecisionStatus::Deprecated => "deprecated",
        }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "proposed" => Ok(DecisionStatus::Proposed),
            "accepted" => Ok(DecisionStatus::Accepted),
            "deprecated" => Ok(DecisionStatus::Deprecated),
            _ => Err(CoreError::parse(format!("Invalid decision status: {}", s))),
        }
    }
}

impl Default for DecisionStatus {
    fn default() -> Self {
        DecisionStatus::Proposed
    }
}

impl std::fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Three-level priority scale shared by tasks (priority) and decisions
/// (impact).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "low" => Ok(Level::Low),
            "medium" => Ok(Level::Medium),
            "high" => Ok(Level::High),
            _ => Err(CoreError::parse(format!("Invalid level: {}", s))),
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::Medium
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Task priority.
pub type Priority = Level;
/// Decision impact.
pub type Impact = Level;

// ============================================================================
// Entities
// ============================================================================

/// A project: scoping parent for conversations and knowledge entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

/// A chat conversation within a project.
///
/// Invariants: `summary` is set exactly when `is_archived` flips
/// false -> true and is never cleared by unarchiving. Conversations always
/// start active with a mode chosen at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub purpose: Option<String>,
    pub summary: Option<String>,
    pub mode: AiMode,
    pub is_archived: bool,
    pub created_at: String,
    pub updated_at: String,
    /// Computed on read from the messages table, not stored.
    #[serde(default)]
    pub message_count: usize,
}

/// A single conversation message. Immutable once created; strictly ordered
/// by `created_at` ascending within its conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: String,
}

/// An actionable task extracted or recorded for a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub conversation_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub blocked_reason: Option<String>,
    pub next_action: Option<String>,
}

/// A recorded decision with rationale and impact assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub id: String,
    pub project_id: String,
    pub conversation_id: Option<String>,
    pub title: String,
    pub decision: String,
    pub rationale: Option<String>,
    pub status: DecisionStatus,
    pub impact: Impact,
}

/// A project document; pinned documents are eligible for AI context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub content: String,
    pub is_pinned: bool,
}
