//! Activity Log
//!
//! Append-only record of lifecycle transitions and extraction results.
//! Logging is best-effort: a failed insert is a warning, never an error
//! surfaced to the caller.

use tracing::warn;

use crate::storage::database::ActivityRow;
use crate::storage::Database;
use crate::utils::error::AppResult;

/// What happened to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Created,
    Updated,
    Archived,
    Extracted,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Created => "created",
            ActivityKind::Updated => "updated",
            ActivityKind::Archived => "archived",
            ActivityKind::Extracted => "extracted",
        }
    }
}

#[derive(Clone)]
pub struct ActivityLog {
    db: Database,
}

impl ActivityLog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Record an event. Never fails the calling operation.
    pub fn record(
        &self,
        project_id: &str,
        kind: ActivityKind,
        entity_type: &str,
        entity_id: &str,
        description: &str,
    ) {
        if let Err(e) =
            self.db
                .insert_activity(project_id, kind.as_str(), entity_type, entity_id, description)
        {
            warn!(error = %e, entity_type, entity_id, "failed to record activity");
        }
    }

    /// Most recent events for a project.
    pub fn recent(&self, project_id: &str, limit: usize) -> AppResult<Vec<ActivityRow>> {
        self.db.list_recent_activity(project_id, limit)
    }
}
