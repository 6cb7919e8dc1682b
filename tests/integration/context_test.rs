//! Context Assembly Integration Tests
//!
//! Verifies the per-mode selection policy end to end: knowledge loaded
//! from storage, filtered, capped, and shaped for the prompt.

use loomline::{AiMode, DecisionStatus, TaskStatus};
use loomline_core::MAX_RECENT_MESSAGES;

use crate::common::{
    seed_conversation, seed_decision, seed_document, seed_messages, seed_task, state_with_gateway,
    ScriptedGateway,
};

#[test]
fn test_design_mode_selects_docs_and_decisions() {
    let state = state_with_gateway(ScriptedGateway::chat(&[]));
    seed_conversation(&state, "c1", AiMode::Design);
    seed_task(&state, "t1", TaskStatus::InProgress);
    seed_decision(&state, "d1", DecisionStatus::Accepted);
    seed_decision(&state, "d2", DecisionStatus::Proposed);
    seed_document(&state, "doc1", true);
    seed_document(&state, "doc2", false);

    let ctx = state.context.build_for_conversation("c1", false).unwrap();
    assert_eq!(ctx.pinned_documents.len(), 1);
    assert_eq!(ctx.accepted_decisions.len(), 1);
    assert!(ctx.active_tasks.is_empty());
    assert!(ctx.blocked_tasks.is_empty());
}

#[test]
fn test_debug_mode_forces_recent_and_drops_docs() {
    let state = state_with_gateway(ScriptedGateway::chat(&[]));
    seed_conversation(&state, "c1", AiMode::Debug);
    seed_task(&state, "t1", TaskStatus::Blocked);
    seed_task(&state, "t2", TaskStatus::Blocked);
    seed_document(&state, "doc1", true);
    seed_messages(&state, "c1", 15);

    // Caller asks for no recent messages; debug overrides.
    let ctx = state.context.build_for_conversation("c1", false).unwrap();
    assert_eq!(ctx.blocked_tasks.len(), 2);
    assert!(ctx.pinned_documents.is_empty());
    assert_eq!(ctx.recent_messages.len(), MAX_RECENT_MESSAGES);
    assert!(ctx.include_recent_messages);
    // Window holds the newest ten, chronological.
    assert_eq!(ctx.recent_messages[0].content, "msg 5");
    assert_eq!(ctx.recent_messages[9].content, "msg 14");
}

#[test]
fn test_planning_mode_selects_decisions_and_active_tasks() {
    let state = state_with_gateway(ScriptedGateway::chat(&[]));
    seed_conversation(&state, "c1", AiMode::Planning);
    seed_task(&state, "t1", TaskStatus::InProgress);
    seed_task(&state, "t2", TaskStatus::Todo);
    seed_task(&state, "t3", TaskStatus::Done);
    seed_decision(&state, "d1", DecisionStatus::Accepted);
    seed_document(&state, "doc1", true);

    let ctx = state.context.build_for_conversation("c1", false).unwrap();
    assert_eq!(ctx.active_tasks.len(), 1);
    assert_eq!(ctx.active_tasks[0].title, "Task t1");
    assert_eq!(ctx.accepted_decisions.len(), 1);
    assert!(ctx.pinned_documents.is_empty());
}

#[test]
fn test_mode_switch_changes_selection() {
    let state = state_with_gateway(ScriptedGateway::chat(&[]));
    seed_conversation(&state, "c1", AiMode::Implementation);
    seed_task(&state, "t1", TaskStatus::InProgress);
    seed_decision(&state, "d1", DecisionStatus::Accepted);
    seed_document(&state, "doc1", true);

    let ctx = state.context.build_for_conversation("c1", false).unwrap();
    assert_eq!(ctx.pinned_documents.len(), 1);
    assert!(ctx.accepted_decisions.is_empty());
    assert_eq!(ctx.active_tasks.len(), 1);

    state.lifecycle.set_mode("c1", AiMode::Review).unwrap();
    let ctx = state.context.build_for_conversation("c1", false).unwrap();
    assert_eq!(ctx.pinned_documents.len(), 1);
    assert_eq!(ctx.accepted_decisions.len(), 1);
    assert!(ctx.active_tasks.is_empty());
}

#[test]
fn test_empty_project_yields_empty_sections() {
    let state = state_with_gateway(ScriptedGateway::chat(&[]));
    seed_conversation(&state, "c1", AiMode::Design);
    let ctx = state.context.build_for_conversation("c1", true).unwrap();
    assert!(ctx.pinned_documents.is_empty());
    assert!(ctx.accepted_decisions.is_empty());
    assert!(ctx.active_tasks.is_empty());
    assert!(ctx.blocked_tasks.is_empty());
    assert!(ctx.recent_messages.is_empty());
    assert!(ctx.conversation_summary.is_none());
}
