//! Collaborator traits consumed by the pipeline and the publisher.
//!
//! Concrete implementations live in `stagecast-plugins`; tests supply mocks.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::{ProviderError, PublishError, UpstreamError};
use crate::models::{PublishContent, PublishResult, ResearchNotes, SynthesisRequest};

/// Produces contextual notes for a topic.
#[async_trait]
pub trait TopicResearcher: Send + Sync {
    async fn research(&self, topic: &str) -> Result<ResearchNotes, UpstreamError>;
}

/// Turns research notes into a script.
#[async_trait]
pub trait ScriptWriter: Send + Sync {
    async fn write(&self, notes: &ResearchNotes) -> Result<String, UpstreamError>;
}

/// One entry of the media-synthesis provider chain.
#[async_trait]
pub trait SynthesisProvider: Send + Sync + Debug {
    fn name(&self) -> &str;

    /// Synthesize media for the request and return a reference (URL or path).
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<String, ProviderError>;
}

/// Last resort of the provider chain. Must not fail.
#[async_trait]
pub trait SyntheticFallback: Send + Sync + Debug {
    fn name(&self) -> &str;

    async fn generate(&self, request: &SynthesisRequest) -> String;
}

/// An external platform that accepts content for publishing.
#[async_trait]
pub trait TargetAdapter: Send + Sync + Debug {
    /// Target name; unique within one publish call
    fn name(&self) -> &str;

    async fn publish(&self, content: &PublishContent) -> Result<PublishResult, PublishError>;
}
