//! Conversation Health
//!
//! Length-based health classification. Thresholds follow message count
//! only; archived conversations are always reported from their stored
//! state without reclassification.

use serde::{Deserialize, Serialize};

/// Message-count thresholds for the health bands.
pub const HEALTHY_BELOW: usize = 20;
pub const GETTING_LONG_BELOW: usize = 40;
pub const CONSIDER_ARCHIVING_BELOW: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    GettingLong,
    ConsiderArchiving,
    ArchiveRecommended,
}

impl HealthStatus {
    /// Classify by total message count.
    pub fn classify(message_count: usize) -> Self {
        if message_count < HEALTHY_BELOW {
            HealthStatus::Healthy
        } else if message_count < GETTING_LONG_BELOW {
            HealthStatus::GettingLong
        } else if message_count < CONSIDER_ARCHIVING_BELOW {
            HealthStatus::ConsiderArchiving
        } else {
            HealthStatus::ArchiveRecommended
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::GettingLong => "Getting Long",
            HealthStatus::ConsiderArchiving => "Consider Archiving",
            HealthStatus::ArchiveRecommended => "Archive Recommended",
        }
    }

    /// Suggested action shown alongside the label, if any.
    pub fn recommendation(&self) -> Option<&'static str> {
        match self {
            HealthStatus::Healthy => None,
            HealthStatus::GettingLong => {
                Some("Consider extracting key decisions and tasks soon")
            }
            HealthStatus::ConsiderArchiving => {
                Some("Extract knowledge and summarize to keep context sharp")
            }
            HealthStatus::ArchiveRecommended => {
                Some("Summarize and archive, then continue in a fresh conversation")
            }
        }
    }

    /// Whether the UI should surface an archive prompt.
    pub fn should_prompt_archive(&self) -> bool {
        matches!(
            self,
            HealthStatus::ConsiderArchiving | HealthStatus::ArchiveRecommended
        )
    }
}
