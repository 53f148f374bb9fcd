use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

use super::generation::MediaResult;
use super::publish::{PublishContent, PublishResult};

/// Review status of a content record.
///
/// `Staged` is the only entry state. `Rejected` is terminal; `Approved` and
/// `Posted` stay queryable and `Posted` accepts further publish outcomes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Staged,
    Approved,
    Rejected,
    Posted,
}

impl ContentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ContentStatus::Rejected)
    }

    /// Whether the fan-out publisher may dispatch this record.
    pub fn is_publishable(&self) -> bool {
        matches!(self, ContentStatus::Approved | ContentStatus::Posted)
    }
}

impl Display for ContentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ContentStatus::Staged => write!(f, "staged"),
            ContentStatus::Approved => write!(f, "approved"),
            ContentStatus::Rejected => write!(f, "rejected"),
            ContentStatus::Posted => write!(f, "posted"),
        }
    }
}

impl FromStr for ContentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staged" => Ok(ContentStatus::Staged),
            "approved" => Ok(ContentStatus::Approved),
            "rejected" => Ok(ContentStatus::Rejected),
            "posted" => Ok(ContentStatus::Posted),
            _ => Err(anyhow::anyhow!("Invalid content status: {}", s)),
        }
    }
}

/// Caller-driven action submitted to the content store.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentAction {
    Approve,
    Reject,
    RecordPublishOutcome(Vec<PublishResult>),
}

impl ContentAction {
    pub fn name(&self) -> &'static str {
        match self {
            ContentAction::Approve => "approve",
            ContentAction::Reject => "reject",
            ContentAction::RecordPublishOutcome(_) => "record_publish_outcome",
        }
    }
}

/// The unit of work flowing through the pipeline.
///
/// Serializes as a flat record keyed by `id` for listing and inspection tools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentRecord {
    pub id: Uuid,
    pub topic: String,
    pub script: String,
    pub media_ref: Option<String>,
    /// Provider that produced `media_ref`, or the fallback's name
    pub media_provider: Option<String>,
    pub media_synthetic: bool,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub posted_at: Option<DateTime<Utc>>,
    /// Latest result per target name; a re-publish overwrites same-target entries
    pub publish_results: BTreeMap<String, PublishResult>,
}

impl ContentRecord {
    /// Build a fresh record in the `staged` state with a new id.
    pub fn staged(
        topic: impl Into<String>,
        script: impl Into<String>,
        media: Option<MediaResult>,
    ) -> Self {
        let (media_ref, media_provider, media_synthetic) = match media {
            Some(media) => (
                Some(media.reference),
                Some(media.provider_used),
                media.is_synthetic,
            ),
            None => (None, None, false),
        };

        Self {
            id: Uuid::new_v4(),
            topic: topic.into(),
            script: script.into(),
            media_ref,
            media_provider,
            media_synthetic,
            status: ContentStatus::Staged,
            created_at: Utc::now(),
            approved_at: None,
            posted_at: None,
            publish_results: BTreeMap::new(),
        }
    }

    /// Read-only snapshot handed to target adapters.
    pub fn publish_content(&self, hashtags: &[String]) -> PublishContent {
        PublishContent {
            record_id: self.id,
            topic: self.topic.clone(),
            script: self.script.clone(),
            media_ref: self.media_ref.clone(),
            hashtags: hashtags.to_vec(),
        }
    }

    pub fn has_successful_publish(&self) -> bool {
        self.publish_results.values().any(|r| r.success)
    }
}
