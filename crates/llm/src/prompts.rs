//! Prompt Assembly
//!
//! Per-mode system prompts and the markdown rendering of the structured
//! context bundle. The rendered sections ride inside the system prompt;
//! recent messages are replayed as real chat turns so the model sees them
//! with their original roles.

use loomline_core::{AiMode, StructuredContext};

use crate::types::{ChatRequest, ChatTurn};

/// Character ceiling on document content inside the rendered prompt.
/// Tighter than the context builder's own cap: the prompt pays per token.
pub const PROMPT_DOC_MAX_CHARS: usize = 500;

const BASE_CONTEXT: &str = "You are a helpful AI assistant for a project management and development tool. You have access to the project's tasks, decisions, and documents to provide contextual assistance.";

/// The mode-specific system prompt.
pub fn mode_system_prompt(mode: AiMode) -> String {
    let focus = match mode {
        AiMode::Design => {
            "You are in DESIGN mode. Focus on:\n\
             - Helping with UI/UX design decisions\n\
             - Suggesting visual improvements and user experience enhancements\n\
             - Discussing color schemes, layouts, and component design\n\
             - Reviewing design patterns and best practices\n\
             - Creating wireframes or design specifications in text form"
        }
        AiMode::Debug => {
            "You are in DEBUG mode. Focus on:\n\
             - Analyzing error messages and stack traces\n\
             - Identifying potential bugs and issues\n\
             - Suggesting debugging strategies and approaches\n\
             - Explaining error causes and solutions\n\
             - Helping trace issues through code logic"
        }
        AiMode::Planning => {
            "You are in PLANNING mode. Focus on:\n\
             - Breaking down features into actionable tasks\n\
             - Estimating effort and complexity\n\
             - Identifying dependencies and blockers\n\
             - Suggesting project structure and organization\n\
             - Creating roadmaps and milestones"
        }
        AiMode::Implementation => {
            "You are in IMPLEMENTATION mode. Focus on:\n\
             - Writing clean, maintainable code\n\
             - Suggesting implementation approaches\n\
             - Reviewing code patterns and best practices\n\
             - Helping with specific coding challenges\n\
             - Providing code examples and snippets"
        }
        AiMode::Review => {
            "You are in REVIEW mode. Focus on:\n\
             - Reviewing decisions and their rationale\n\
             - Analyzing completed work\n\
             - Suggesting improvements and optimizations\n\
             - Identifying potential issues or risks\n\
             - Documenting lessons learned"
        }
    };
    format!("{}\n\n{}", BASE_CONTEXT, focus)
}

/// Render the context bundle as a markdown block, empty string when there
/// is nothing to say.
pub fn render_context(ctx: &StructuredContext) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(purpose) = &ctx.conversation_purpose {
        parts.push(format!("## Conversation Purpose\n{}", purpose));
    }
    if let Some(summary) = &ctx.conversation_summary {
        parts.push(format!("## Previous Conversation Summary\n{}", summary));
    }

    let tasks: Vec<&loomline_core::ContextTask> =
        ctx.active_tasks.iter().chain(ctx.blocked_tasks.iter()).collect();
    if !tasks.is_empty() {
        let lines: Vec<String> = tasks
            .iter()
            .map(|t| {
                let mut line = format!("- **{}** [{}] ({} priority)", t.title, t.status, t.priority);
                if let Some(desc) = &t.description {
                    line.push_str(&format!(": {}", desc));
                }
                if let Some(reason) = &t.blocked_reason {
                    line.push_str(&format!(" (blocked: {})", reason));
                }
                line
            })
            .collect();
        parts.push(format!("## Current Tasks\n{}", lines.join("\n")));
    }

    if !ctx.accepted_decisions.is_empty() {
        let lines: Vec<String> = ctx
            .accepted_decisions
            .iter()
            .map(|d| {
                format!(
                    "- **{}** [accepted]: {} ({} impact)",
                    d.title, d.decision, d.impact
                )
            })
            .collect();
        parts.push(format!("## Key Decisions\n{}", lines.join("\n")));
    }

    if !ctx.pinned_documents.is_empty() {
        let blocks: Vec<String> = ctx
            .pinned_documents
            .iter()
            .map(|d| format!("### {}\n{}", d.title, clip(&d.content, PROMPT_DOC_MAX_CHARS)))
            .collect();
        parts.push(format!("## Relevant Documents\n{}", blocks.join("\n\n")));
    }

    if parts.is_empty() {
        return String::new();
    }
    format!("\n\n---\n# Project Context\n\n{}", parts.join("\n\n"))
}

/// Full system prompt: mode prompt plus rendered context.
pub fn build_system_prompt(ctx: &StructuredContext) -> String {
    format!("{}{}", mode_system_prompt(ctx.mode), render_context(ctx))
}

/// Assemble the wire messages for one streaming request: system prompt,
/// the capped recent-message replay (only when the context says so), then
/// the new user turn. Full history is never sent.
pub fn build_wire_messages(request: &ChatRequest) -> Vec<ChatTurn> {
    let mut turns = vec![ChatTurn::system(build_system_prompt(&request.context))];
    if request.context.include_recent_messages {
        for m in &request.context.recent_messages {
            turns.push(ChatTurn {
                role: m.role.clone(),
                content: m.content.clone(),
            });
        }
    }
    turns.push(ChatTurn::user(request.user_text.clone()));
    turns
}

fn clip(content: &str, max: usize) -> String {
    if content.chars().count() <= max {
        return content.to_string();
    }
    let head: String = content.chars().take(max).collect();
    format!("{}...", head)
}
