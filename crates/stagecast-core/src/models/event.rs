use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::stage::PipelineStage;

/// Events emitted to the notification sink.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotificationEvent {
    ContentStaged {
        record_id: Uuid,
        topic: String,
    },
    ContentPosted {
        record_id: Uuid,
        succeeded: usize,
        attempted: usize,
        targets: Vec<String>,
    },
    StageFailed {
        stage: PipelineStage,
        error: String,
    },
}

impl NotificationEvent {
    /// Dotted event name, e.g. `content.staged`
    pub fn event_type(&self) -> &'static str {
        match self {
            NotificationEvent::ContentStaged { .. } => "content.staged",
            NotificationEvent::ContentPosted { .. } => "content.posted",
            NotificationEvent::StageFailed { .. } => "pipeline.stage_failed",
        }
    }

    /// Plain one-line summary for chat-style sinks.
    pub fn message(&self) -> String {
        match self {
            NotificationEvent::ContentStaged { record_id, topic } => {
                format!("Content for '{}' is staged for review ({})", topic, record_id)
            }
            NotificationEvent::ContentPosted {
                record_id,
                succeeded,
                attempted,
                targets,
            } => format!(
                "Content {} posted to {}/{} targets: {}",
                record_id,
                succeeded,
                attempted,
                targets.join(", ")
            ),
            NotificationEvent::StageFailed { stage, error } => {
                format!("Pipeline failed at {}: {}", stage, error)
            }
        }
    }
}
