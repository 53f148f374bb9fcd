//! Stagecast services
//!
//! Orchestration on top of the collaborator traits: the media
//! [`ProviderChain`], the sequential [`StagePipeline`] and the concurrent
//! [`FanOutPublisher`]. None of these mutate a record directly; every status
//! change goes through the [`stagecast_store::ContentStore`].

pub mod notify;
pub mod pipeline;
pub mod provider_chain;
pub mod publisher;

pub use notify::NotificationDispatcher;
pub use pipeline::StagePipeline;
pub use provider_chain::ProviderChain;
pub use publisher::FanOutPublisher;
