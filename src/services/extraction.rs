//! Extraction Engine
//!
//! Runs a forced-tool-call extraction through the gateway and
//! materializes the results as project knowledge. Single kinds create
//! one entity; `auto` materializes every returned item independently,
//! so one bad item never sinks the batch.

use std::sync::Arc;

use loomline_core::{Decision, DecisionStatus, Document, Task, TaskStatus};
use loomline_llm::{
    ExtractedDecision, ExtractedDocument, ExtractedPayload, ExtractedTask, ExtractionKind,
    ModelGateway,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::services::activity::{ActivityKind, ActivityLog};
use crate::storage::Database;
use crate::utils::error::AppResult;
use crate::utils::time::new_id;

/// Per-kind counts of materialized entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub tasks: usize,
    pub decisions: usize,
    pub documents: usize,
}

impl ExtractionReport {
    pub fn total(&self) -> usize {
        self.tasks + self.decisions + self.documents
    }

    /// Human-readable summary naming only the non-zero kinds.
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.tasks > 0 {
            parts.push(plural(self.tasks, "task"));
        }
        if self.decisions > 0 {
            parts.push(plural(self.decisions, "decision"));
        }
        if self.documents > 0 {
            parts.push(plural(self.documents, "document"));
        }
        if parts.is_empty() {
            "No actionable items found".to_string()
        } else {
            format!("Created {}", parts.join(", "))
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[derive(Clone)]
pub struct ExtractionEngine {
    db: Database,
    gateway: Arc<dyn ModelGateway>,
    activity: ActivityLog,
}

impl ExtractionEngine {
    pub fn new(db: Database, gateway: Arc<dyn ModelGateway>, activity: ActivityLog) -> Self {
        Self {
            db,
            gateway,
            activity,
        }
    }

    /// Extract `kind` from `content` and persist the results.
    ///
    /// A missing or malformed tool call surfaces as a hard error with
    /// nothing materialized. `auto` counts each item independently.
    pub async fn extract(
        &self,
        project_id: &str,
        conversation_id: Option<&str>,
        content: &str,
        kind: ExtractionKind,
    ) -> AppResult<ExtractionReport> {
        let payload = self.gateway.extract(content, kind).await?;

        let mut report = ExtractionReport::default();
        match payload {
            ExtractedPayload::Task(task) => {
                self.materialize_task(project_id, conversation_id, &task)?;
                report.tasks = 1;
            }
            ExtractedPayload::Decision(decision) => {
                self.materialize_decision(project_id, conversation_id, &decision)?;
                report.decisions = 1;
            }
            ExtractedPayload::Document(document) => {
                self.materialize_document(project_id, &document)?;
                report.documents = 1;
            }
            ExtractedPayload::Auto(items) => {
                for task in &items.tasks {
                    match self.materialize_task(project_id, conversation_id, task) {
                        Ok(()) => report.tasks += 1,
                        Err(e) => warn!(error = %e, title = %task.title, "task not materialized"),
                    }
                }
                for decision in &items.decisions {
                    match self.materialize_decision(project_id, conversation_id, decision) {
                        Ok(()) => report.decisions += 1,
                        Err(e) => {
                            warn!(error = %e, title = %decision.title, "decision not materialized")
                        }
                    }
                }
                for document in &items.documents {
                    match self.materialize_document(project_id, document) {
                        Ok(()) => report.documents += 1,
                        Err(e) => {
                            warn!(error = %e, title = %document.title, "document not materialized")
                        }
                    }
                }
            }
        }

        info!(
            kind = kind.as_str(),
            tasks = report.tasks,
            decisions = report.decisions,
            documents = report.documents,
            "extraction complete"
        );
        Ok(report)
    }

    fn materialize_task(
        &self,
        project_id: &str,
        conversation_id: Option<&str>,
        extracted: &ExtractedTask,
    ) -> AppResult<()> {
        let task = Task {
            id: new_id(),
            project_id: project_id.to_string(),
            conversation_id: conversation_id.map(|c| c.to_string()),
            title: extracted.title.clone(),
            description: extracted.description.clone(),
            status: TaskStatus::Todo,
            priority: extracted.priority,
            blocked_reason: None,
            next_action: extracted.next_action.clone(),
        };
        self.db.insert_task(&task)?;
        self.activity.record(
            project_id,
            ActivityKind::Extracted,
            "task",
            &task.id,
            &format!("Created task {}", task.title),
        );
        Ok(())
    }

    fn materialize_decision(
        &self,
        project_id: &str,
        conversation_id: Option<&str>,
        extracted: &ExtractedDecision,
    ) -> AppResult<()> {
        let decision = Decision {
            id: new_id(),
            project_id: project_id.to_string(),
            conversation_id: conversation_id.map(|c| c.to_string()),
            title: extracted.title.clone(),
            decision: extracted.decision.clone(),
            rationale: extracted.rationale.clone(),
            status: DecisionStatus::Proposed,
            impact: extracted.impact,
        };
        self.db.insert_decision(&decision)?;
        self.activity.record(
            project_id,
            ActivityKind::Extracted,
            "decision",
            &decision.id,
            &format!("Created decision {}", decision.title),
        );
        Ok(())
    }

    fn materialize_document(&self, project_id: &str, extracted: &ExtractedDocument) -> AppResult<()> {
        let document = Document {
            id: new_id(),
            project_id: project_id.to_string(),
            title: extracted.title.clone(),
            content: extracted.content.clone(),
            is_pinned: extracted.is_pinned,
        };
        self.db.insert_document(&document)?;
        self.activity.record(
            project_id,
            ActivityKind::Extracted,
            "document",
            &document.id,
            &format!("Created document {}", document.title),
        );
        Ok(())
    }
}
