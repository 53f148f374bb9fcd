//! Research and script generation using Anthropic's Messages API

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Duration;

use stagecast_core::models::ResearchNotes;
use stagecast_core::{ScriptWriter, TopicResearcher, UpstreamError};

const API_BASE: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

// Messages API request/response structures
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<MessageParam<'a>>,
}

#[derive(Debug, Serialize)]
struct MessageParam<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlockResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlockResponse {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Thin client for single-turn text completions.
pub struct AnthropicClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
}

impl Debug for AnthropicClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AnthropicClient")
            .field("model", &self.model)
            .finish()
    }
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client for Anthropic")?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            base_url: API_BASE.to_string(),
        })
    }

    /// Point the client at a different API root (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Send a single user prompt and return the concatenated text blocks.
    pub async fn complete(&self, prompt: &str) -> Result<String, UpstreamError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![MessageParam {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http_client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(UpstreamError::Request(format!(
                "Anthropic API error: {} - {}",
                status, error_text
            )));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))?;

        let text: String = body
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlockResponse::Text { text } => Some(text),
                ContentBlockResponse::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            return Err(UpstreamError::InvalidResponse(
                "response contained no text".to_string(),
            ));
        }

        Ok(text)
    }
}

/// Researches a topic for the configured brand.
#[derive(Debug)]
pub struct AnthropicResearcher {
    client: Arc<AnthropicClient>,
    brand: String,
}

impl AnthropicResearcher {
    pub fn new(client: Arc<AnthropicClient>, brand: impl Into<String>) -> Self {
        Self {
            client,
            brand: brand.into(),
        }
    }
}

#[async_trait]
impl TopicResearcher for AnthropicResearcher {
    async fn research(&self, topic: &str) -> Result<ResearchNotes, UpstreamError> {
        let prompt = format!(
            "Research for {}: {}. Provide key points, compliance notes, social hook.",
            self.brand, topic
        );
        let notes = self.client.complete(&prompt).await?;
        Ok(ResearchNotes {
            topic: topic.to_string(),
            notes,
        })
    }
}

/// Writes a short-form video script from research notes.
#[derive(Debug)]
pub struct AnthropicScriptWriter {
    client: Arc<AnthropicClient>,
    brand: String,
}

impl AnthropicScriptWriter {
    pub fn new(client: Arc<AnthropicClient>, brand: impl Into<String>) -> Self {
        Self {
            client,
            brand: brand.into(),
        }
    }
}

#[async_trait]
impl ScriptWriter for AnthropicScriptWriter {
    async fn write(&self, notes: &ResearchNotes) -> Result<String, UpstreamError> {
        let research = serde_json::to_string(notes)
            .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))?;
        let prompt = format!(
            "Create 15-30s video script for {}. Research: {}",
            self.brand, research
        );
        self.client.complete(&prompt).await
    }
}
