use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

use stagecast_core::models::{
    NotificationEvent, PublishContent, PublishResult, ResearchNotes, SynthesisRequest,
};
use stagecast_core::{
    NotificationSink, ProviderError, PublishError, SynthesisProvider, TargetAdapter,
    TopicResearcher, UpstreamError,
};

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, event: &NotificationEvent) -> Result<(), String> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

pub struct FailingResearcher;

#[async_trait]
impl TopicResearcher for FailingResearcher {
    async fn research(&self, _topic: &str) -> Result<ResearchNotes, UpstreamError> {
        Err(UpstreamError::Request("503 service unavailable".to_string()))
    }
}

#[derive(Debug)]
pub struct MockProvider {
    name: &'static str,
    reference: Option<&'static str>,
    pub calls: AtomicUsize,
}

impl MockProvider {
    pub fn failing(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            reference: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn returning(name: &'static str, reference: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            reference: Some(reference),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SynthesisProvider for MockProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn synthesize(&self, _request: &SynthesisRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reference {
            Some(reference) => Ok(reference.to_string()),
            None => Err(ProviderError::Status {
                status: 429,
                body: "quota exceeded".to_string(),
            }),
        }
    }
}

#[derive(Debug)]
pub struct MockTarget {
    name: &'static str,
    succeed: bool,
    barrier: Option<Arc<Barrier>>,
    seen: Mutex<Vec<PublishContent>>,
}

impl MockTarget {
    pub fn succeeding(name: &'static str) -> Arc<Self> {
        Self::build(name, true, None)
    }

    pub fn failing(name: &'static str) -> Arc<Self> {
        Self::build(name, false, None)
    }

    /// Succeeds only once every target sharing `barrier` is in flight.
    pub fn rendezvous(name: &'static str, barrier: Arc<Barrier>) -> Arc<Self> {
        Self::build(name, true, Some(barrier))
    }

    fn build(name: &'static str, succeed: bool, barrier: Option<Arc<Barrier>>) -> Arc<Self> {
        Arc::new(Self {
            name,
            succeed,
            barrier,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn seen(&self) -> Vec<PublishContent> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TargetAdapter for MockTarget {
    fn name(&self) -> &str {
        self.name
    }

    async fn publish(&self, content: &PublishContent) -> Result<PublishResult, PublishError> {
        self.seen.lock().unwrap().push(content.clone());
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if self.succeed {
            Ok(PublishResult::succeeded(self.name, format!("posted {}", content.record_id)))
        } else {
            Err(PublishError::Rejected {
                status: 400,
                body: "media rejected".to_string(),
            })
        }
    }
}
