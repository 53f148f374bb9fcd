//! Integration plugins
//!
//! Concrete implementations of the collaborator traits defined in
//! `stagecast-core`: text generation, media synthesis providers and their
//! synthetic fallback, publish targets, and the notification sink. The
//! [`factory`] module wires them from [`stagecast_core::Config`].

pub mod ambient;
pub mod anthropic;
pub(crate) mod caption;
pub mod edge_tts;
pub mod elevenlabs;
pub mod factory;
pub mod instagram;
pub(crate) mod media;
pub mod slack;
pub mod template;
pub mod tiktok;
pub mod youtube;

pub use ambient::AmbientAudioFallback;
pub use anthropic::{AnthropicClient, AnthropicResearcher, AnthropicScriptWriter};
pub use edge_tts::EdgeTtsProvider;
pub use elevenlabs::ElevenLabsProvider;
pub use factory::{build_collaborators, Collaborators};
pub use instagram::InstagramTarget;
pub use slack::SlackNotificationSink;
pub use template::{TemplateResearcher, TemplateScriptWriter};
pub use tiktok::TikTokTarget;
pub use youtube::YouTubeTarget;
