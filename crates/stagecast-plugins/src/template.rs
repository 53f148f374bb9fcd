//! Offline text generation used when no language-model key is configured.

use async_trait::async_trait;

use stagecast_core::models::ResearchNotes;
use stagecast_core::{ScriptWriter, TopicResearcher, UpstreamError};

/// Produces fixed research notes for a topic.
#[derive(Debug, Clone)]
pub struct TemplateResearcher {
    brand: String,
}

impl TemplateResearcher {
    pub fn new(brand: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
        }
    }
}

#[async_trait]
impl TopicResearcher for TemplateResearcher {
    async fn research(&self, topic: &str) -> Result<ResearchNotes, UpstreamError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(UpstreamError::InvalidResponse("topic is empty".to_string()));
        }

        let notes = format!(
            "Key points: what {topic} means to {brand} and its community.\n\
             Compliance notes: avoid health claims; credit traditional knowledge holders.\n\
             Social hook: one surprising fact about {topic} in the first three seconds.",
            topic = topic,
            brand = self.brand,
        );

        Ok(ResearchNotes {
            topic: topic.to_string(),
            notes,
        })
    }
}

/// Turns research notes into a short script without calling out.
#[derive(Debug, Clone)]
pub struct TemplateScriptWriter {
    brand: String,
}

impl TemplateScriptWriter {
    pub fn new(brand: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
        }
    }
}

#[async_trait]
impl ScriptWriter for TemplateScriptWriter {
    async fn write(&self, notes: &ResearchNotes) -> Result<String, UpstreamError> {
        Ok(format!(
            "Did you know where {topic} really starts? At {brand}, it starts with people. \
             Here is what we learned this week about {topic}. \
             Follow along for more stories from our community.",
            topic = notes.topic,
            brand = self.brand,
        ))
    }
}
