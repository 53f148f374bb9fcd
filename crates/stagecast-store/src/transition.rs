//! Pure transition table shared by store implementations.

use chrono::{DateTime, Utc};

use stagecast_core::models::{ContentAction, ContentRecord, ContentStatus, PublishResult};
use stagecast_core::{ContentError, ContentResult};

/// Compute the record that results from applying `action` at `now`.
///
/// The input is never modified, so a rejected action leaves the stored record
/// untouched.
pub(crate) fn apply_transition(
    record: &ContentRecord,
    action: ContentAction,
    now: DateTime<Utc>,
) -> ContentResult<ContentRecord> {
    // Timestamps never precede creation even if the clock steps backwards.
    let now = now.max(record.created_at);
    let mut next = record.clone();

    match (record.status, action) {
        (ContentStatus::Staged, ContentAction::Approve) => {
            next.status = ContentStatus::Approved;
            next.approved_at = Some(now);
        }
        (ContentStatus::Staged, ContentAction::Reject) => {
            next.status = ContentStatus::Rejected;
        }
        (ContentStatus::Approved, ContentAction::RecordPublishOutcome(results)) => {
            merge_results(&mut next, results);
            if next.has_successful_publish() {
                next.status = ContentStatus::Posted;
                next.posted_at = Some(now.max(record.approved_at.unwrap_or(now)));
            }
        }
        (ContentStatus::Posted, ContentAction::RecordPublishOutcome(results)) => {
            merge_results(&mut next, results);
        }
        (from, action) => {
            return Err(ContentError::InvalidTransition {
                id: record.id,
                from,
                action: action.name(),
            });
        }
    }

    Ok(next)
}

/// Overwrite per-target entries, except that a failure never replaces an
/// earlier success for the same target.
fn merge_results(record: &mut ContentRecord, results: Vec<PublishResult>) {
    for result in results {
        let keep_existing = !result.success
            && record
                .publish_results
                .get(&result.target)
                .is_some_and(|existing| existing.success);
        if !keep_existing {
            record.publish_results.insert(result.target.clone(), result);
        }
    }
}
