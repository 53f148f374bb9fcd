//! Error types module
//!
//! Caller-facing failures are unified under [`ContentError`]. Failures that are
//! local to one unit of work (one upstream call, one synthesis provider, one
//! publish target) have their own types and are converted to data at that
//! unit's boundary; they only reach the caller wrapped in `ContentError::Upstream`.

use std::time::Duration;

use uuid::Uuid;

use crate::models::{ContentStatus, PipelineStage};

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like rejected requests
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Failure of a text-generation collaborator (research or script stage).
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream not configured: {0}")]
    NotConfigured(String),

    #[error("upstream request failed: {0}")]
    Request(String),

    #[error("upstream returned an unusable response: {0}")]
    InvalidResponse(String),

    #[error("upstream timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure of a single media-synthesis provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    #[error("provider request failed: {0}")]
    Request(String),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider output error: {0}")]
    Output(String),
}

/// Failure of a single publish target.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    #[error("rejected by platform ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("request failed: {0}")]
    Request(String),

    #[error("media unavailable: {0}")]
    Media(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("{stage} stage failed: {source}")]
    Upstream {
        stage: PipelineStage,
        #[source]
        source: UpstreamError,
    },

    #[error("Invalid transition for {id}: cannot {action} a {from} record")]
    InvalidTransition {
        id: Uuid,
        from: ContentStatus,
        action: &'static str,
    },

    #[error("Invalid state for {id}: a {status} record cannot be published")]
    InvalidState { id: Uuid, status: ContentStatus },

    #[error("Content record not found: {0}")]
    NotFound(Uuid),

    #[error("Content record already exists: {0}")]
    DuplicateId(Uuid),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type ContentResult<T> = Result<T, ContentError>;

impl ContentError {
    pub fn upstream(stage: PipelineStage, source: UpstreamError) -> Self {
        ContentError::Upstream { stage, source }
    }

    /// Machine-readable error code (e.g., "INVALID_TRANSITION")
    pub fn error_code(&self) -> &'static str {
        match self {
            ContentError::Upstream { .. } => "UPSTREAM_ERROR",
            ContentError::InvalidTransition { .. } => "INVALID_TRANSITION",
            ContentError::InvalidState { .. } => "INVALID_STATE",
            ContentError::NotFound(_) => "NOT_FOUND",
            ContentError::DuplicateId(_) => "DUPLICATE_ID",
            ContentError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether retrying the same request could succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ContentError::Upstream { .. })
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            ContentError::InvalidTransition { .. }
            | ContentError::InvalidState { .. }
            | ContentError::NotFound(_) => LogLevel::Debug,
            ContentError::Upstream { .. } => LogLevel::Warn,
            ContentError::DuplicateId(_) | ContentError::Config(_) => LogLevel::Error,
        }
    }
}
