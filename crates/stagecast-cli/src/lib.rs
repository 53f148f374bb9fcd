//! Wiring shared by the `stagecast` binary.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use stagecast_core::models::{AggregateOutcome, ContentAction, ContentRecord};
use stagecast_core::{check_compliance, ComplianceReport, Config, TargetAdapter};
use stagecast_plugins::build_collaborators;
use stagecast_services::{FanOutPublisher, NotificationDispatcher, ProviderChain, StagePipeline};
use stagecast_store::{ContentStore, InMemoryContentStore};

/// Initialize tracing for CLI binaries. Logs go to stderr so stdout stays JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn print_json(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Review decision applied right after generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Review {
    Leave,
    Approve,
    Reject,
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub topic: Option<String>,
    pub review: Review,
    pub publish: bool,
    /// Overrides `DEFAULT_HASHTAGS` when non-empty
    pub hashtags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateReport {
    pub record: ContentRecord,
    pub compliance: ComplianceReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<AggregateOutcome>,
}

/// Pipeline, publisher and an in-process store built from configuration.
pub struct App {
    pub store: Arc<InMemoryContentStore>,
    pub pipeline: StagePipeline,
    pub publisher: FanOutPublisher,
    pub targets: Vec<Arc<dyn TargetAdapter>>,
    /// Shared by the pipeline and the publisher
    pub notifications: NotificationDispatcher,
    drain_timeout: Duration,
}

impl App {
    pub fn from_config(config: &Config) -> Result<Self> {
        let collaborators =
            build_collaborators(config).context("Failed to build integrations")?;
        let store = Arc::new(InMemoryContentStore::new());
        let notifications = NotificationDispatcher::new(collaborators.notifier);

        let chain = ProviderChain::new(collaborators.providers, collaborators.fallback)?;
        let pipeline = StagePipeline::new(
            collaborators.researcher,
            collaborators.writer,
            chain,
            store.clone(),
            config.pipeline.candidate_topics.clone(),
            config.stage_timeout(),
        )
        .with_notifier(notifications.clone());

        let publisher = FanOutPublisher::new(store.clone(), config.target_timeout())
            .with_notifier(notifications.clone())
            .with_default_hashtags(config.publisher.default_hashtags.clone());

        Ok(Self {
            store,
            pipeline,
            publisher,
            targets: collaborators.targets,
            notifications,
            drain_timeout: config.target_timeout(),
        })
    }

    /// Generate, review and optionally publish one record.
    ///
    /// Pending notifications are drained before returning, on success and on
    /// failure, so they are delivered before the runtime shuts down.
    pub async fn generate(&self, options: GenerateOptions) -> Result<GenerateReport> {
        let result = self.generate_inner(options).await;
        self.notifications.drain(self.drain_timeout).await;
        result
    }

    async fn generate_inner(&self, options: GenerateOptions) -> Result<GenerateReport> {
        let record = self.pipeline.run(options.topic.as_deref()).await?;
        let compliance = check_compliance(&record.script);
        if !compliance.compliant {
            tracing::warn!(record_id = %record.id, issues = ?compliance.issues, "Script has compliance issues");
        }

        let record = match options.review {
            Review::Leave => record,
            Review::Approve => self.store.transition(record.id, ContentAction::Approve).await?,
            Review::Reject => self.store.transition(record.id, ContentAction::Reject).await?,
        };

        let outcome = if options.publish {
            let outcome = if options.hashtags.is_empty() {
                self.publisher.publish(record.id, &self.targets).await?
            } else {
                self.publisher
                    .publish_with_hashtags(record.id, &self.targets, &options.hashtags)
                    .await?
            };
            Some(outcome)
        } else {
            None
        };

        let record = self.store.get(record.id).await?;
        Ok(GenerateReport {
            record,
            compliance,
            outcome,
        })
    }
}
