//! Structured Extraction
//!
//! Turns free-form conversation text into typed project artifacts by
//! forcing the model through a tool call. One tool schema per extraction
//! kind; the `auto` kind returns arrays of all three artifact types.
//! A response without a tool call is a hard error, nothing is guessed.

use loomline_core::{Impact, Priority};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::types::{LlmError, LlmResult};

/// What to extract from a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionKind {
    Task,
    Decision,
    Document,
    Auto,
}

impl ExtractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionKind::Task => "task",
            ExtractionKind::Decision => "decision",
            ExtractionKind::Document => "document",
            ExtractionKind::Auto => "auto",
        }
    }

    /// Name of the forced tool for this kind.
    pub fn tool_name(&self) -> &'static str {
        match self {
            ExtractionKind::Task => "create_task",
            ExtractionKind::Decision => "create_decision",
            ExtractionKind::Document => "create_document",
            ExtractionKind::Auto => "extract_items",
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            ExtractionKind::Task => {
                "You are an expert at extracting actionable tasks from conversations.\n\
                 Analyze the content and extract a clear, actionable task.\n\
                 Focus on what needs to be done, by when, and its priority.\n\
                 If the content doesn't contain a clear task, extract the most actionable item you can find."
            }
            ExtractionKind::Decision => {
                "You are an expert at identifying decisions from conversations.\n\
                 Analyze the content and extract any decision that was made or proposed.\n\
                 Include the reasoning behind the decision and assess its impact level.\n\
                 If multiple decisions exist, extract the most significant one."
            }
            ExtractionKind::Document => {
                "You are an expert at creating documentation from conversations.\n\
                 Analyze the content and create a well-structured document.\n\
                 Format the content in clean markdown with appropriate headers and sections.\n\
                 Preserve important details while organizing them logically."
            }
            ExtractionKind::Auto => {
                "You are an expert at analyzing conversations and extracting structured information.\n\
                 Analyze the content and identify:\n\
                 - Tasks: Actionable items that need to be done\n\
                 - Decisions: Choices or determinations that were made\n\
                 - Documents: Information worth preserving as documentation\n\
                 \n\
                 Extract all relevant items. If a category has no items, return an empty array.\n\
                 Be thorough but don't create items where none exist."
            }
        }
    }

    /// The JSON tool definition sent to the backend.
    pub fn tool_schema(&self) -> Value {
        match self {
            ExtractionKind::Task => json!({
                "type": "function",
                "function": {
                    "name": "create_task",
                    "description": "Extract a task from the conversation content",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "description": "Short, actionable task title" },
                            "description": { "type": "string", "description": "Detailed description of what needs to be done" },
                            "next_action": { "type": "string", "description": "The immediate next step to take" },
                            "priority": { "type": "string", "enum": ["low", "medium", "high"], "description": "Task priority level" },
                        },
                        "required": ["title", "priority"],
                        "additionalProperties": false,
                    },
                },
            }),
            ExtractionKind::Decision => json!({
                "type": "function",
                "function": {
                    "name": "create_decision",
                    "description": "Extract a decision from the conversation content",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "description": "Short title summarizing the decision" },
                            "decision": { "type": "string", "description": "The actual decision that was made" },
                            "rationale": { "type": "string", "description": "Why this decision was made" },
                            "impact": { "type": "string", "enum": ["low", "medium", "high"], "description": "Impact level of this decision" },
                        },
                        "required": ["title", "decision", "impact"],
                        "additionalProperties": false,
                    },
                },
            }),
            ExtractionKind::Document => json!({
                "type": "function",
                "function": {
                    "name": "create_document",
                    "description": "Extract content suitable for a document",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "description": "Document title" },
                            "content": { "type": "string", "description": "The document content in markdown format" },
                            "is_pinned": { "type": "boolean", "description": "Whether this is important enough to pin" },
                        },
                        "required": ["title", "content"],
                        "additionalProperties": false,
                    },
                },
            }),
            ExtractionKind::Auto => json!({
                "type": "function",
                "function": {
                    "name": "extract_items",
                    "description": "Analyze content and extract any tasks, decisions, or documents",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "tasks": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "title": { "type": "string" },
                                        "description": { "type": "string" },
                                        "next_action": { "type": "string" },
                                        "priority": { "type": "string", "enum": ["low", "medium", "high"] },
                                    },
                                    "required": ["title", "priority"],
                                },
                            },
                            "decisions": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "title": { "type": "string" },
                                        "decision": { "type": "string" },
                                        "rationale": { "type": "string" },
                                        "impact": { "type": "string", "enum": ["low", "medium", "high"] },
                                    },
                                    "required": ["title", "decision", "impact"],
                                },
                            },
                            "documents": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "title": { "type": "string" },
                                        "content": { "type": "string" },
                                        "is_pinned": { "type": "boolean" },
                                    },
                                    "required": ["title", "content"],
                                },
                            },
                        },
                        "required": ["tasks", "decisions", "documents"],
                        "additionalProperties": false,
                    },
                },
            }),
        }
    }
}

// ============================================================================
// Extracted payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub next_action: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDecision {
    pub title: String,
    pub decision: String,
    #[serde(default)]
    pub rationale: Option<String>,
    #[serde(default)]
    pub impact: Impact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_pinned: bool,
}

/// Arguments of the `extract_items` tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedItems {
    #[serde(default)]
    pub tasks: Vec<ExtractedTask>,
    #[serde(default)]
    pub decisions: Vec<ExtractedDecision>,
    #[serde(default)]
    pub documents: Vec<ExtractedDocument>,
}

/// Parsed result of one extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedPayload {
    Task(ExtractedTask),
    Decision(ExtractedDecision),
    Document(ExtractedDocument),
    Auto(ExtractedItems),
}

/// Parse the forced tool call's argument JSON for the given kind.
pub fn parse_arguments(kind: ExtractionKind, arguments: &str) -> LlmResult<ExtractedPayload> {
    let payload = match kind {
        ExtractionKind::Task => ExtractedPayload::Task(
            serde_json::from_str(arguments).map_err(|e| LlmError::parse(e.to_string()))?,
        ),
        ExtractionKind::Decision => ExtractedPayload::Decision(
            serde_json::from_str(arguments).map_err(|e| LlmError::parse(e.to_string()))?,
        ),
        ExtractionKind::Document => ExtractedPayload::Document(
            serde_json::from_str(arguments).map_err(|e| LlmError::parse(e.to_string()))?,
        ),
        ExtractionKind::Auto => ExtractedPayload::Auto(
            serde_json::from_str(arguments).map_err(|e| LlmError::parse(e.to_string()))?,
        ),
    };
    Ok(payload)
}

/// The user turn wrapping the content to extract from.
pub fn extraction_user_prompt(content: &str) -> String {
    format!("Extract from this content:\n\n{}", content)
}
