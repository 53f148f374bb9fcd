//! ElevenLabs text-to-speech provider

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

use stagecast_core::models::SynthesisRequest;
use stagecast_core::{ProviderError, SynthesisProvider};

const API_BASE: &str = "https://api.elevenlabs.io";
const MODEL_ID: &str = "eleven_monolingual_v1";

#[derive(Debug, Serialize)]
struct TextToSpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

/// Synthesizes narration and writes it as an mp3 under the media directory.
pub struct ElevenLabsProvider {
    http_client: reqwest::Client,
    api_key: String,
    voice_id: String,
    output_dir: PathBuf,
    base_url: String,
}

impl Debug for ElevenLabsProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ElevenLabsProvider")
            .field("voice_id", &self.voice_id)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

impl ElevenLabsProvider {
    pub fn new(
        api_key: impl Into<String>,
        voice_id: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client for ElevenLabs")?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            voice_id: voice_id.into(),
            output_dir: output_dir.into(),
            base_url: API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SynthesisProvider for ElevenLabsProvider {
    fn name(&self) -> &str {
        "elevenlabs"
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<String, ProviderError> {
        let url = format!("{}/v1/text-to-speech/{}", self.base_url, self.voice_id);
        let body = TextToSpeechRequest {
            text: &request.text,
            model_id: MODEL_ID,
            voice_settings: VoiceSettings {
                stability: 0.5,
                similarity_boost: 0.75,
            },
        };

        let response = self
            .http_client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;
        if audio.is_empty() {
            return Err(ProviderError::Output("empty audio response".to_string()));
        }

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| ProviderError::Output(e.to_string()))?;
        let path = self.output_dir.join(format!("{}.mp3", Uuid::new_v4()));
        tokio::fs::write(&path, &audio)
            .await
            .map_err(|e| ProviderError::Output(e.to_string()))?;

        tracing::debug!(path = %path.display(), bytes = audio.len(), "ElevenLabs audio written");
        Ok(path.to_string_lossy().into_owned())
    }
}
