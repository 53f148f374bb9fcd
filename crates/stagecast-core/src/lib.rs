//! Stagecast Core Library
//!
//! This crate provides the domain models, error types, configuration and
//! collaborator traits shared across all stagecast components.

pub mod compliance;
pub mod config;
pub mod error;
pub mod hooks;
pub mod models;
pub mod traits;

// Re-export commonly used types
pub use compliance::{check_compliance, ComplianceReport};
pub use config::{Config, IntegrationConfig, PipelineConfig, PublisherConfig};
pub use error::{ContentError, ContentResult, LogLevel, ProviderError, PublishError, UpstreamError};
pub use hooks::{NoOpNotificationSink, NotificationSink};
pub use traits::{ScriptWriter, SynthesisProvider, SyntheticFallback, TargetAdapter, TopicResearcher};
