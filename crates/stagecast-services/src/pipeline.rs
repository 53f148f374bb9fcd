//! Stage pipeline: research, script, media, post-process, stage for review.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::seq::IndexedRandom;

use stagecast_core::models::{
    ContentRecord, MediaResult, NotificationEvent, PipelineStage, SynthesisRequest,
};
use stagecast_core::{
    ContentError, ContentResult, LogLevel, ScriptWriter, TopicResearcher, UpstreamError,
};
use stagecast_store::ContentStore;

use crate::notify::NotificationDispatcher;
use crate::provider_chain::ProviderChain;

/// Runs the five generation stages strictly in sequence.
///
/// A run either inserts exactly one `staged` record or returns an error and
/// inserts nothing.
pub struct StagePipeline {
    researcher: Arc<dyn TopicResearcher>,
    writer: Arc<dyn ScriptWriter>,
    chain: ProviderChain,
    store: Arc<dyn ContentStore>,
    notifier: NotificationDispatcher,
    candidate_topics: Vec<String>,
    stage_timeout: Duration,
}

impl StagePipeline {
    pub fn new(
        researcher: Arc<dyn TopicResearcher>,
        writer: Arc<dyn ScriptWriter>,
        chain: ProviderChain,
        store: Arc<dyn ContentStore>,
        candidate_topics: Vec<String>,
        stage_timeout: Duration,
    ) -> Self {
        Self {
            researcher,
            writer,
            chain,
            store,
            notifier: NotificationDispatcher::default(),
            candidate_topics,
            stage_timeout,
        }
    }

    pub fn with_notifier(mut self, notifier: NotificationDispatcher) -> Self {
        self.notifier = notifier;
        self
    }

    /// Draw a topic uniformly from the configured candidates.
    fn choose_topic(&self) -> ContentResult<String> {
        self.candidate_topics
            .choose(&mut rand::rng())
            .cloned()
            .ok_or_else(|| ContentError::Config("no candidate topics configured".to_string()))
    }

    /// Run a fatal stage under the stage timeout.
    async fn fatal_stage<T, F>(&self, stage: PipelineStage, fut: F) -> ContentResult<T>
    where
        F: Future<Output = Result<T, UpstreamError>>,
    {
        let result = match tokio::time::timeout(self.stage_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout(self.stage_timeout)),
        };
        result.map_err(|source| self.fail(ContentError::upstream(stage, source), stage))
    }

    fn fail(&self, error: ContentError, stage: PipelineStage) -> ContentError {
        let code = error.error_code();
        match error.log_level() {
            LogLevel::Debug => {
                tracing::debug!(stage = %stage, error_code = code, error = %error, "Pipeline run failed");
            }
            LogLevel::Warn => {
                tracing::warn!(stage = %stage, error_code = code, error = %error, "Pipeline run failed");
            }
            LogLevel::Error => {
                tracing::error!(stage = %stage, error_code = code, error = %error, "Pipeline run failed");
            }
        }
        self.notifier.notify(NotificationEvent::StageFailed {
            stage,
            error: error.to_string(),
        });
        error
    }

    async fn media(&self, request: &SynthesisRequest) -> MediaResult {
        match tokio::time::timeout(self.stage_timeout, self.chain.resolve(request)).await {
            Ok(media) => media,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.stage_timeout.as_secs(),
                    "Media stage timed out, using synthetic media"
                );
                self.chain.synthetic(request).await
            }
        }
    }

    /// Normalize the media reference. An unusable reference degrades to
    /// synthetic media, same as a provider failure.
    async fn post_process(&self, media: MediaResult, request: &SynthesisRequest) -> MediaResult {
        let reference = media.reference.trim().to_string();
        if reference.is_empty() {
            tracing::warn!(
                provider = %media.provider_used,
                "Provider returned an empty media reference, using synthetic media"
            );
            return self.chain.synthetic(request).await;
        }
        MediaResult { reference, ..media }
    }

    #[tracing::instrument(skip_all, fields(topic = tracing::field::Empty))]
    pub async fn run(&self, topic: Option<&str>) -> ContentResult<ContentRecord> {
        let topic = match topic.map(str::trim).filter(|t| !t.is_empty()) {
            Some(topic) => topic.to_string(),
            None => self.choose_topic()?,
        };
        tracing::Span::current().record("topic", topic.as_str());

        tracing::info!(stage = %PipelineStage::Research, "Starting stage");
        let notes = self
            .fatal_stage(PipelineStage::Research, self.researcher.research(&topic))
            .await?;

        tracing::info!(stage = %PipelineStage::Script, "Starting stage");
        let script = self
            .fatal_stage(PipelineStage::Script, async {
                let script = self.writer.write(&notes).await?;
                let script = script.trim().to_string();
                if script.is_empty() {
                    return Err(UpstreamError::InvalidResponse("script is empty".to_string()));
                }
                Ok::<_, UpstreamError>(script)
            })
            .await?;

        tracing::info!(stage = %PipelineStage::Media, "Starting stage");
        let request = SynthesisRequest::new(script.clone());
        let media = self.media(&request).await;

        tracing::info!(stage = %PipelineStage::PostProcess, "Starting stage");
        let media = self.post_process(media, &request).await;

        tracing::info!(stage = %PipelineStage::StageForReview, "Starting stage");
        let record = ContentRecord::staged(topic, script, Some(media));
        self.store
            .create(record.clone())
            .await
            .map_err(|e| self.fail(e, PipelineStage::StageForReview))?;

        tracing::info!(
            record_id = %record.id,
            media_provider = record.media_provider.as_deref().unwrap_or_default(),
            media_synthetic = record.media_synthetic,
            "Content staged for review"
        );
        self.notifier.notify(NotificationEvent::ContentStaged {
            record_id: record.id,
            topic: record.topic.clone(),
        });

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use stagecast_core::models::{ContentStatus, ResearchNotes};
    use stagecast_core::{NotificationSink, ProviderError, SynthesisProvider, SyntheticFallback};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use stagecast_store::InMemoryContentStore;

    struct EchoResearcher;

    #[async_trait]
    impl TopicResearcher for EchoResearcher {
        async fn research(&self, topic: &str) -> Result<ResearchNotes, UpstreamError> {
            Ok(ResearchNotes {
                topic: topic.to_string(),
                notes: format!("notes on {}", topic),
            })
        }
    }

    struct SlowResearcher;

    #[async_trait]
    impl TopicResearcher for SlowResearcher {
        async fn research(&self, _topic: &str) -> Result<ResearchNotes, UpstreamError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(UpstreamError::Request("unreachable".to_string()))
        }
    }

    struct BlankWriter;

    #[async_trait]
    impl ScriptWriter for BlankWriter {
        async fn write(&self, _notes: &ResearchNotes) -> Result<String, UpstreamError> {
            Ok("   ".to_string())
        }
    }

    struct NotesWriter;

    #[async_trait]
    impl ScriptWriter for NotesWriter {
        async fn write(&self, notes: &ResearchNotes) -> Result<String, UpstreamError> {
            Ok(format!("  Script: {}  ", notes.notes))
        }
    }

    #[derive(Debug)]
    struct SlowProvider;

    #[async_trait]
    impl SynthesisProvider for SlowProvider {
        fn name(&self) -> &str {
            "slow"
        }

        async fn synthesize(&self, _request: &SynthesisRequest) -> Result<String, ProviderError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("never".to_string())
        }
    }

    #[derive(Debug)]
    struct BlankProvider;

    #[async_trait]
    impl SynthesisProvider for BlankProvider {
        fn name(&self) -> &str {
            "blank"
        }

        async fn synthesize(&self, _request: &SynthesisRequest) -> Result<String, ProviderError> {
            Ok(" ".to_string())
        }
    }

    #[derive(Debug)]
    struct Fixed;

    #[async_trait]
    impl SyntheticFallback for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, _request: &SynthesisRequest) -> String {
            "synthetic://fixed".to_string()
        }
    }

    #[derive(Default)]
    struct DelayedSink {
        delivered: AtomicUsize,
    }

    #[async_trait]
    impl NotificationSink for DelayedSink {
        async fn notify(&self, _event: &NotificationEvent) -> Result<(), String> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.delivered.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn pipeline(
        researcher: Arc<dyn TopicResearcher>,
        writer: Arc<dyn ScriptWriter>,
        provider: Arc<dyn SynthesisProvider>,
        store: Arc<InMemoryContentStore>,
    ) -> StagePipeline {
        let chain = ProviderChain::new(vec![provider], Arc::new(Fixed)).unwrap();
        StagePipeline::new(
            researcher,
            writer,
            chain,
            store,
            vec!["wellness".to_string(), "harvest".to_string()],
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_random_topic_comes_from_candidates() {
        let store = Arc::new(InMemoryContentStore::new());
        let record = pipeline(
            Arc::new(EchoResearcher),
            Arc::new(NotesWriter),
            Arc::new(BlankProvider),
            store.clone(),
        )
        .run(None)
        .await
        .unwrap();

        assert!(["wellness", "harvest"].contains(&record.topic.as_str()));
        assert_eq!(record.status, ContentStatus::Staged);
        assert_eq!(record.script, format!("Script: notes on {}", record.topic));
    }

    #[tokio::test]
    async fn test_blank_media_reference_degrades_to_synthetic() {
        let store = Arc::new(InMemoryContentStore::new());
        let record = pipeline(
            Arc::new(EchoResearcher),
            Arc::new(NotesWriter),
            Arc::new(BlankProvider),
            store.clone(),
        )
        .run(Some("wellness"))
        .await
        .unwrap();

        assert_eq!(record.media_ref.as_deref(), Some("synthetic://fixed"));
        assert!(record.media_synthetic);
        assert_eq!(store.get(record.id).await.unwrap(), record);
    }

    #[tokio::test]
    async fn test_empty_script_is_fatal() {
        let store = Arc::new(InMemoryContentStore::new());
        let err = pipeline(
            Arc::new(EchoResearcher),
            Arc::new(BlankWriter),
            Arc::new(BlankProvider),
            store.clone(),
        )
        .run(Some("wellness"))
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ContentError::Upstream {
                stage: PipelineStage::Script,
                source: UpstreamError::InvalidResponse(_),
            }
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_research_timeout_is_fatal() {
        let store = Arc::new(InMemoryContentStore::new());
        let err = pipeline(
            Arc::new(SlowResearcher),
            Arc::new(NotesWriter),
            Arc::new(BlankProvider),
            store.clone(),
        )
        .run(Some("wellness"))
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ContentError::Upstream {
                stage: PipelineStage::Research,
                source: UpstreamError::Timeout(_),
            }
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_media_timeout_falls_back() {
        let store = Arc::new(InMemoryContentStore::new());
        let record = pipeline(
            Arc::new(EchoResearcher),
            Arc::new(NotesWriter),
            Arc::new(SlowProvider),
            store.clone(),
        )
        .run(Some("wellness"))
        .await
        .unwrap();

        assert!(record.media_synthetic);
        assert_eq!(record.media_provider.as_deref(), Some("fixed"));
        assert_eq!(store.len().await, 1);
    }

    #[test]
    fn test_drained_notification_survives_runtime_shutdown() {
        let sink = Arc::new(DelayedSink::default());
        let notifier = NotificationDispatcher::new(sink.clone());
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let store = Arc::new(InMemoryContentStore::new());
            pipeline(
                Arc::new(EchoResearcher),
                Arc::new(NotesWriter),
                Arc::new(BlankProvider),
                store,
            )
            .with_notifier(notifier.clone())
            .run(Some("wellness"))
            .await
            .unwrap();

            assert_eq!(notifier.pending(), 1);
            assert!(notifier.drain(Duration::from_secs(5)).await);
        });
        drop(runtime);

        assert_eq!(sink.delivered.load(Ordering::SeqCst), 1);
    }
}
