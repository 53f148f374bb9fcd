use serde::{Deserialize, Serialize};

/// Output of the research stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResearchNotes {
    pub topic: String,
    pub notes: String,
}

/// Text handed to the media-synthesis provider chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Result of resolving the provider chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaResult {
    pub provider_used: String,
    pub reference: String,
    pub is_synthetic: bool,
}
