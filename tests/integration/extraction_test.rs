//! Extraction Engine Integration Tests
//!
//! Forced-tool-call extraction through a scripted gateway, materialized
//! into project knowledge and reflected in later context builds.

use loomline::{AiMode, ExtractedPayload, ExtractionKind, LlmError, TaskStatus};
use loomline_llm::{ExtractedDecision, ExtractedItems, ExtractedTask};

use crate::common::{seed_conversation, state_with_gateway, ScriptedGateway};

#[tokio::test]
async fn test_task_extraction_materializes_todo() {
    let gateway = ScriptedGateway::extracting(ExtractedPayload::Task(ExtractedTask {
        title: "Wire up pagination".to_string(),
        description: None,
        next_action: Some("add the cursor query".to_string()),
        priority: loomline::Priority::High,
    }));
    let state = state_with_gateway(gateway);
    seed_conversation(&state, "c1", AiMode::Implementation);

    let report = state
        .extraction
        .extract("p1", Some("c1"), "we should paginate messages", ExtractionKind::Task)
        .await
        .unwrap();
    assert_eq!(report.tasks, 1);
    assert_eq!(report.summary(), "Created 1 task");

    let tasks = state.db.list_tasks("p1").unwrap();
    assert_eq!(tasks[0].status, TaskStatus::Todo);
    assert_eq!(tasks[0].next_action.as_deref(), Some("add the cursor query"));
}

#[tokio::test]
async fn test_auto_extraction_summary_names_non_zero_kinds() {
    let gateway = ScriptedGateway::extracting(ExtractedPayload::Auto(ExtractedItems {
        tasks: vec![
            ExtractedTask {
                title: "A".to_string(),
                description: None,
                next_action: None,
                priority: loomline::Priority::Low,
            },
            ExtractedTask {
                title: "B".to_string(),
                description: None,
                next_action: None,
                priority: loomline::Priority::Medium,
            },
        ],
        decisions: vec![],
        documents: vec![loomline_llm::ExtractedDocument {
            title: "Notes".to_string(),
            content: "# Notes".to_string(),
            is_pinned: true,
        }],
    }));
    let state = state_with_gateway(gateway);

    let report = state
        .extraction
        .extract("p1", None, "a long discussion", ExtractionKind::Auto)
        .await
        .unwrap();
    assert_eq!((report.tasks, report.decisions, report.documents), (2, 0, 1));
    assert_eq!(report.summary(), "Created 2 tasks, 1 document");
}

#[tokio::test]
async fn test_extracted_decision_feeds_context_after_acceptance() {
    // Extraction lands decisions as proposed; only accepted ones reach
    // context, so a freshly extracted decision stays out.
    let gateway = ScriptedGateway::extracting(ExtractedPayload::Decision(ExtractedDecision {
        title: "Cursor pagination".to_string(),
        decision: "use created_at cursors".to_string(),
        rationale: Some("offset pagination drifts".to_string()),
        impact: loomline::Impact::Medium,
    }));
    let state = state_with_gateway(gateway);
    seed_conversation(&state, "c1", AiMode::Planning);

    state
        .extraction
        .extract("p1", Some("c1"), "we settled on cursors", ExtractionKind::Decision)
        .await
        .unwrap();

    let ctx = state.context.build_for_conversation("c1", false).unwrap();
    assert!(ctx.accepted_decisions.is_empty());
    let decisions = state.db.list_decisions("p1").unwrap();
    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].status, loomline::DecisionStatus::Proposed);
}

#[tokio::test]
async fn test_failed_extraction_is_atomic() {
    let gateway = ScriptedGateway::chat(&[]);
    let state = state_with_gateway(gateway);

    let err = state
        .extraction
        .extract("p1", None, "content", ExtractionKind::Auto)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no tool call"));
    assert!(state.db.list_tasks("p1").unwrap().is_empty());
    assert!(state.db.list_documents("p1").unwrap().is_empty());
}

#[tokio::test]
async fn test_extraction_writes_activity_log() {
    let gateway = ScriptedGateway::extracting(ExtractedPayload::Document(
        loomline_llm::ExtractedDocument {
            title: "Runbook".to_string(),
            content: "# Runbook".to_string(),
            is_pinned: false,
        },
    ));
    let state = state_with_gateway(gateway);

    state
        .extraction
        .extract("p1", None, "deployment steps", ExtractionKind::Document)
        .await
        .unwrap();
    let activity = state.activity.recent("p1", 10).unwrap();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].entity_type, "document");
    assert!(activity[0].description.contains("Runbook"));
}

#[tokio::test]
async fn test_missing_tool_call_error_variant() {
    let gateway = ScriptedGateway::chat(&[]);
    let state = state_with_gateway(gateway);
    let err = state
        .extraction
        .extract("p1", None, "content", ExtractionKind::Task)
        .await
        .unwrap_err();
    assert!(matches!(err, loomline::AppError::Llm(LlmError::MissingToolCall)));
}
