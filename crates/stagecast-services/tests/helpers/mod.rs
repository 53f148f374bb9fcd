pub mod mocks;

use std::sync::Arc;
use std::time::Duration;

use stagecast_core::models::NotificationEvent;
use stagecast_core::{ScriptWriter, SynthesisProvider, TopicResearcher};
use stagecast_plugins::{AmbientAudioFallback, TemplateResearcher, TemplateScriptWriter};
use stagecast_services::{FanOutPublisher, NotificationDispatcher, ProviderChain, StagePipeline};
use stagecast_store::InMemoryContentStore;

use mocks::RecordingSink;

pub const STAGE_TIMEOUT: Duration = Duration::from_secs(5);
pub const TARGET_TIMEOUT: Duration = Duration::from_secs(5);

/// Pipeline, publisher and store sharing one recording notification sink.
pub struct TestHarness {
    pub store: Arc<InMemoryContentStore>,
    pub pipeline: StagePipeline,
    pub publisher: FanOutPublisher,
    pub sink: Arc<RecordingSink>,
    pub notifications: NotificationDispatcher,
}

/// Harness with offline text generation and the given synthesis providers.
pub fn setup_harness(providers: Vec<Arc<dyn SynthesisProvider>>) -> TestHarness {
    setup_harness_with(
        Arc::new(TemplateResearcher::new("studio")),
        Arc::new(TemplateScriptWriter::new("studio")),
        providers,
    )
}

pub fn setup_harness_with(
    researcher: Arc<dyn TopicResearcher>,
    writer: Arc<dyn ScriptWriter>,
    providers: Vec<Arc<dyn SynthesisProvider>>,
) -> TestHarness {
    let store = Arc::new(InMemoryContentStore::new());
    let sink = Arc::new(RecordingSink::default());
    let notifications = NotificationDispatcher::new(sink.clone());
    let chain = ProviderChain::new(providers, Arc::new(AmbientAudioFallback::new()))
        .expect("test chain has providers");

    let pipeline = StagePipeline::new(
        researcher,
        writer,
        chain,
        store.clone(),
        vec!["wellness".to_string()],
        STAGE_TIMEOUT,
    )
    .with_notifier(notifications.clone());

    let publisher = FanOutPublisher::new(store.clone(), TARGET_TIMEOUT)
        .with_notifier(notifications.clone())
        .with_default_hashtags(vec!["wellness".to_string()]);

    TestHarness {
        store,
        pipeline,
        publisher,
        sink,
        notifications,
    }
}

/// Drain in-flight notifications and return everything delivered so far.
pub async fn delivered_events(harness: &TestHarness) -> Vec<NotificationEvent> {
    assert!(harness.notifications.drain(Duration::from_secs(5)).await);
    harness.sink.events()
}
