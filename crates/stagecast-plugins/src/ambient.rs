//! Synthetic fallback media for when every provider fails.

use async_trait::async_trait;

use stagecast_core::models::SynthesisRequest;
use stagecast_core::SyntheticFallback;

const MIN_DURATION_SECS: u64 = 15;
const WORDS_PER_SECOND: f64 = 2.5;

/// Describes an ambient pink-noise bed sized to the narration length.
///
/// Nothing is rendered here; the reference encodes the parameters so a later
/// editing step can produce the audio.
#[derive(Debug, Clone, Default)]
pub struct AmbientAudioFallback;

impl AmbientAudioFallback {
    pub fn new() -> Self {
        Self
    }

    /// Duration in whole seconds for a request, never below fifteen.
    pub fn duration_secs(request: &SynthesisRequest) -> u64 {
        let spoken = (request.word_count() as f64 / WORDS_PER_SECOND).floor() as u64;
        spoken.max(MIN_DURATION_SECS)
    }
}

#[async_trait]
impl SyntheticFallback for AmbientAudioFallback {
    fn name(&self) -> &str {
        "ambient"
    }

    async fn generate(&self, request: &SynthesisRequest) -> String {
        format!(
            "synthetic://ambient/pink-noise?duration={}s",
            Self::duration_secs(request)
        )
    }
}
