//! Concurrent multi-target publishing with partial-failure aggregation.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use uuid::Uuid;

use stagecast_core::models::{
    AggregateOutcome, ContentAction, NotificationEvent, PublishContent, PublishResult,
};
use stagecast_core::{ContentError, ContentResult, TargetAdapter};
use stagecast_store::ContentStore;

use crate::notify::NotificationDispatcher;

/// Publishes an approved record to every target at once.
///
/// Each target runs on its own task with its own timeout. The call returns only
/// after every target has produced a result, and the full result set is
/// submitted to the store in a single transition.
pub struct FanOutPublisher {
    store: Arc<dyn ContentStore>,
    notifier: NotificationDispatcher,
    target_timeout: Duration,
    default_hashtags: Vec<String>,
}

impl FanOutPublisher {
    pub fn new(store: Arc<dyn ContentStore>, target_timeout: Duration) -> Self {
        Self {
            store,
            notifier: NotificationDispatcher::default(),
            target_timeout,
            default_hashtags: Vec::new(),
        }
    }

    pub fn with_notifier(mut self, notifier: NotificationDispatcher) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_default_hashtags(mut self, hashtags: Vec<String>) -> Self {
        self.default_hashtags = hashtags;
        self
    }

    /// Publish using the configured default hashtags.
    pub async fn publish(
        &self,
        id: Uuid,
        targets: &[Arc<dyn TargetAdapter>],
    ) -> ContentResult<AggregateOutcome> {
        let hashtags = self.default_hashtags.clone();
        self.publish_with_hashtags(id, targets, &hashtags).await
    }

    #[tracing::instrument(skip_all, fields(record_id = %id, targets = targets.len()))]
    pub async fn publish_with_hashtags(
        &self,
        id: Uuid,
        targets: &[Arc<dyn TargetAdapter>],
        hashtags: &[String],
    ) -> ContentResult<AggregateOutcome> {
        validate_targets(targets)?;

        let record = self.store.get(id).await?;
        if !record.status.is_publishable() {
            tracing::debug!(status = %record.status, "Refusing to publish record");
            return Err(ContentError::InvalidState {
                id,
                status: record.status,
            });
        }

        let content = Arc::new(record.publish_content(hashtags));
        let handles = targets.iter().map(|target| {
            let name = target.name().to_string();
            let task = tokio::spawn(dispatch(
                Arc::clone(target),
                Arc::clone(&content),
                self.target_timeout,
            ));
            async move {
                match task.await {
                    Ok(result) => result,
                    Err(e) => {
                        tracing::error!(publish_target = %name, error = %e, "Publish task aborted");
                        PublishResult::failed(name, format!("publish task aborted: {}", e))
                    }
                }
            }
        });
        let results = join_all(handles).await;

        let outcome = AggregateOutcome::from_results(id, results.clone());
        self.store
            .transition(id, ContentAction::RecordPublishOutcome(results))
            .await?;

        tracing::info!(
            attempted = outcome.attempted,
            succeeded = outcome.succeeded,
            "Publish fan-out complete"
        );

        if outcome.succeeded > 0 {
            self.notifier.notify(NotificationEvent::ContentPosted {
                record_id: id,
                succeeded: outcome.succeeded,
                attempted: outcome.attempted,
                targets: outcome.successful_targets(),
            });
        }

        Ok(outcome)
    }
}

fn validate_targets(targets: &[Arc<dyn TargetAdapter>]) -> ContentResult<()> {
    if targets.is_empty() {
        return Err(ContentError::Config(
            "publish requires at least one target".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(targets.len());
    for target in targets {
        if !seen.insert(target.name()) {
            return Err(ContentError::Config(format!(
                "duplicate publish target: {}",
                target.name()
            )));
        }
    }
    Ok(())
}

/// Run one target and convert every outcome into a result for that target.
async fn dispatch(
    target: Arc<dyn TargetAdapter>,
    content: Arc<PublishContent>,
    timeout: Duration,
) -> PublishResult {
    let name = target.name().to_string();

    match tokio::time::timeout(timeout, target.publish(&content)).await {
        Ok(Ok(mut result)) => {
            // One entry per requested target, keyed by the adapter's name.
            result.target = name;
            if !result.success {
                tracing::warn!(publish_target = %result.target, detail = %result.detail, "Target reported failure");
            }
            result
        }
        Ok(Err(e)) => {
            tracing::warn!(publish_target = %name, error = %e, "Publish to target failed");
            PublishResult::failed(name, e.to_string())
        }
        Err(_) => {
            tracing::warn!(
                publish_target = %name,
                timeout_secs = timeout.as_secs(),
                "Publish to target timed out"
            );
            PublishResult::timed_out(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use stagecast_core::models::{ContentRecord, ContentStatus, TIMEOUT_DETAIL};
    use stagecast_core::PublishError;
    use stagecast_store::InMemoryContentStore;

    #[derive(Debug)]
    enum Behavior {
        Succeed,
        Fail,
        Hang,
        Panic,
    }

    #[derive(Debug)]
    struct Target {
        name: &'static str,
        behavior: Behavior,
    }

    fn target(name: &'static str, behavior: Behavior) -> Arc<dyn TargetAdapter> {
        Arc::new(Target { name, behavior })
    }

    #[async_trait]
    impl TargetAdapter for Target {
        fn name(&self) -> &str {
            self.name
        }

        async fn publish(&self, _content: &PublishContent) -> Result<PublishResult, PublishError> {
            match self.behavior {
                Behavior::Succeed => Ok(PublishResult::succeeded(self.name, "posted")),
                Behavior::Fail => Err(PublishError::Rejected {
                    status: 500,
                    body: "server error".to_string(),
                }),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(PublishResult::succeeded(self.name, "late"))
                }
                Behavior::Panic => panic!("adapter bug"),
            }
        }
    }

    async fn approved_record(store: &InMemoryContentStore) -> Uuid {
        let record = ContentRecord::staged("wellness", "script", None);
        let id = store.create(record).await.unwrap();
        store.transition(id, ContentAction::Approve).await.unwrap();
        id
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_target_yields_exactly_one_result() {
        let store = Arc::new(InMemoryContentStore::new());
        let id = approved_record(&store).await;
        let publisher = FanOutPublisher::new(store.clone(), Duration::from_secs(5));

        let outcome = publisher
            .publish(
                id,
                &[
                    target("ok", Behavior::Succeed),
                    target("bad", Behavior::Fail),
                    target("slow", Behavior::Hang),
                    target("boom", Behavior::Panic),
                ],
            )
            .await
            .unwrap();

        assert_eq!(outcome.attempted, 4);
        assert_eq!(outcome.succeeded, 1);
        assert_eq!(outcome.result_for("slow").unwrap().detail, TIMEOUT_DETAIL);
        assert!(!outcome.result_for("boom").unwrap().success);
        assert!(outcome.result_for("bad").unwrap().detail.contains("500"));

        let record = store.get(id).await.unwrap();
        assert_eq!(record.status, ContentStatus::Posted);
        assert_eq!(record.publish_results.len(), 4);
    }

    #[tokio::test]
    async fn test_staged_record_is_not_dispatched() {
        let store = Arc::new(InMemoryContentStore::new());
        let id = store
            .create(ContentRecord::staged("wellness", "script", None))
            .await
            .unwrap();
        let publisher = FanOutPublisher::new(store.clone(), Duration::from_secs(5));

        let err = publisher
            .publish(id, &[target("ok", Behavior::Succeed)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ContentError::InvalidState {
                status: ContentStatus::Staged,
                ..
            }
        ));
        assert!(store.get(id).await.unwrap().publish_results.is_empty());
    }

    #[tokio::test]
    async fn test_target_set_validation() {
        let store = Arc::new(InMemoryContentStore::new());
        let id = approved_record(&store).await;
        let publisher = FanOutPublisher::new(store.clone(), Duration::from_secs(5));

        assert!(matches!(
            publisher.publish(id, &[]).await,
            Err(ContentError::Config(_))
        ));
        assert!(matches!(
            publisher
                .publish(
                    id,
                    &[target("dup", Behavior::Succeed), target("dup", Behavior::Fail)]
                )
                .await,
            Err(ContentError::Config(msg)) if msg.contains("dup")
        ));
        assert_eq!(store.get(id).await.unwrap().status, ContentStatus::Approved);
    }

    #[tokio::test]
    async fn test_unknown_record() {
        let store = Arc::new(InMemoryContentStore::new());
        let publisher = FanOutPublisher::new(store, Duration::from_secs(5));
        assert!(matches!(
            publisher
                .publish(Uuid::new_v4(), &[target("ok", Behavior::Succeed)])
                .await,
            Err(ContentError::NotFound(_))
        ));
    }
}
