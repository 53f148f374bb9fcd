pub mod content;
pub mod event;
pub mod generation;
pub mod publish;
pub mod stage;
pub mod status;

pub use content::{ContentAction, ContentRecord, ContentStatus};
pub use event::NotificationEvent;
pub use generation::{MediaResult, ResearchNotes, SynthesisRequest};
pub use publish::{AggregateOutcome, PublishContent, PublishResult, TIMEOUT_DETAIL};
pub use stage::PipelineStage;
pub use status::{IntegrationState, ServiceStatus};
