//! Conversation Lifecycle Integration Tests
//!
//! Archival validation, summary preservation, health classification, and
//! the summary-first archived view.

use loomline::{AiMode, AppError, HealthStatus, MIN_SUMMARY_LENGTH};

use crate::common::{seed_conversation, seed_messages, state_with_gateway, ScriptedGateway};

#[test]
fn test_created_conversation_starts_active() {
    let state = state_with_gateway(ScriptedGateway::chat(&[]));
    let conversation = state
        .lifecycle
        .create("p1", "Kickoff", Some("scope the mvp"), AiMode::Planning)
        .unwrap();
    assert!(!conversation.is_archived);
    assert_eq!(conversation.mode, AiMode::Planning);
    assert_eq!(conversation.purpose.as_deref(), Some("scope the mvp"));
    assert_eq!(conversation.message_count, 0);
}

#[test]
fn test_archive_validation_boundary() {
    let state = state_with_gateway(ScriptedGateway::chat(&[]));
    seed_conversation(&state, "c1", AiMode::Design);

    // 19 characters after trim: rejected.
    let nineteen = "a".repeat(MIN_SUMMARY_LENGTH - 1);
    let err = state.lifecycle.archive("c1", &nineteen, None).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(!state.lifecycle.get("c1").unwrap().is_archived);

    // Exactly 20: accepted.
    let twenty = "b".repeat(MIN_SUMMARY_LENGTH);
    let archived = state.lifecycle.archive("c1", &twenty, None).unwrap();
    assert!(archived.is_archived);
    assert_eq!(archived.summary.as_deref(), Some(twenty.as_str()));
}

#[test]
fn test_unarchive_keeps_summary_for_context() {
    let state = state_with_gateway(ScriptedGateway::chat(&[]));
    seed_conversation(&state, "c1", AiMode::Design);
    state
        .lifecycle
        .archive("c1", "we chose cursor pagination for messages", None)
        .unwrap();
    let restored = state.lifecycle.unarchive("c1").unwrap();
    assert!(!restored.is_archived);
    assert_eq!(
        restored.summary.as_deref(),
        Some("we chose cursor pagination for messages")
    );

    // With a summary present, the recent-message default flips off.
    assert!(!loomline::default_include_recent_messages(Some(&restored)));
}

#[test]
fn test_health_thresholds_via_lifecycle() {
    let state = state_with_gateway(ScriptedGateway::chat(&[]));
    seed_conversation(&state, "c1", AiMode::Design);
    assert_eq!(state.lifecycle.health("c1").unwrap(), HealthStatus::Healthy);

    seed_messages(&state, "c1", 25);
    assert_eq!(state.lifecycle.health("c1").unwrap(), HealthStatus::GettingLong);

    let conversation = state.lifecycle.get("c1").unwrap();
    assert_eq!(conversation.message_count, 25);
}

#[test]
fn test_archived_view_is_summary_first() {
    let state = state_with_gateway(ScriptedGateway::chat(&[]));
    seed_conversation(&state, "c1", AiMode::Design);
    seed_messages(&state, "c1", 8);
    state
        .lifecycle
        .archive("c1", "settled the storage schema design", Some("schema work"))
        .unwrap();

    let mut view = state.lifecycle.view_archived("c1").unwrap();
    assert!(!view.history_loaded());
    assert_eq!(view.summary(), Some("settled the storage schema design"));
    assert_eq!(view.purpose(), Some("schema work"));

    let history = view.load_history().unwrap();
    assert_eq!(history.len(), 8);
    assert_eq!(history[0].content, "msg 0");
}

#[test]
fn test_activity_recorded_for_lifecycle_events() {
    let state = state_with_gateway(ScriptedGateway::chat(&[]));
    let conversation = state
        .lifecycle
        .create("p1", "Kickoff", None, AiMode::Design)
        .unwrap();
    state
        .lifecycle
        .archive(&conversation.id, "everything worth keeping is extracted", None)
        .unwrap();

    let activity = state.activity.recent("p1", 10).unwrap();
    let kinds: Vec<&str> = activity.iter().map(|a| a.kind.as_str()).collect();
    assert!(kinds.contains(&"created"));
    assert!(kinds.contains(&"archived"));
}
