use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Detail recorded for a target that did not answer within its timeout.
pub const TIMEOUT_DETAIL: &str = "timeout";

/// Outcome of one publish attempt against one target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishResult {
    pub target: String,
    pub success: bool,
    /// Provider-specific message or error description
    pub detail: String,
    pub attempted_at: DateTime<Utc>,
}

impl PublishResult {
    pub fn succeeded(target: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            success: true,
            detail: detail.into(),
            attempted_at: Utc::now(),
        }
    }

    pub fn failed(target: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            success: false,
            detail: detail.into(),
            attempted_at: Utc::now(),
        }
    }

    pub fn timed_out(target: impl Into<String>) -> Self {
        Self::failed(target, TIMEOUT_DETAIL)
    }
}

/// Content snapshot handed to target adapters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishContent {
    pub record_id: Uuid,
    pub topic: String,
    pub script: String,
    pub media_ref: Option<String>,
    pub hashtags: Vec<String>,
}

impl PublishContent {
    /// Base caption shared by all targets before per-platform shaping.
    pub fn caption(&self) -> &str {
        self.script.trim()
    }

    /// Hashtags rendered as `#tag`, skipping blanks and leading `#` duplicates.
    pub fn rendered_hashtags(&self) -> Vec<String> {
        self.hashtags
            .iter()
            .map(|tag| tag.trim().trim_start_matches('#'))
            .filter(|tag| !tag.is_empty())
            .map(|tag| format!("#{}", tag))
            .collect()
    }
}

/// Aggregate of one fan-out publish call: exactly one result per requested target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateOutcome {
    pub record_id: Uuid,
    pub attempted: usize,
    pub succeeded: usize,
    pub results: Vec<PublishResult>,
}

impl AggregateOutcome {
    pub fn from_results(record_id: Uuid, results: Vec<PublishResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            record_id,
            attempted: results.len(),
            succeeded,
            results,
        }
    }

    pub fn failed(&self) -> usize {
        self.attempted.saturating_sub(self.succeeded)
    }

    /// Some but not all targets succeeded.
    pub fn is_partial(&self) -> bool {
        self.succeeded > 0 && self.succeeded < self.attempted
    }

    pub fn successful_targets(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| r.success)
            .map(|r| r.target.clone())
            .collect()
    }

    pub fn result_for(&self, target: &str) -> Option<&PublishResult> {
        self.results.iter().find(|r| r.target == target)
    }
}
