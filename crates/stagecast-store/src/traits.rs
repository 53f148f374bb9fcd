//! Content store abstraction trait

use async_trait::async_trait;
use uuid::Uuid;

use stagecast_core::models::{ContentAction, ContentRecord, ContentStatus};
use stagecast_core::ContentResult;

/// Content store abstraction trait
///
/// Implementations own the authoritative copy of every record. Transitions on
/// the same id must serialize, and the legality check must observe the
/// current status, so no update to `status` is ever lost.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Insert a new record. Fails with `DuplicateId` if the id is taken.
    async fn create(&self, record: ContentRecord) -> ContentResult<Uuid>;

    /// Fetch a snapshot of a record. Fails with `NotFound` for unknown ids.
    async fn get(&self, id: Uuid) -> ContentResult<ContentRecord>;

    /// List records, newest first, optionally restricted to one status.
    async fn list(&self, status: Option<ContentStatus>) -> ContentResult<Vec<ContentRecord>>;

    /// Apply an action and return the updated record.
    async fn transition(&self, id: Uuid, action: ContentAction) -> ContentResult<ContentRecord>;
}
