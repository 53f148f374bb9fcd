//! Instagram Reels publishing via the Graph API

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use stagecast_core::models::{PublishContent, PublishResult};
use stagecast_core::{PublishError, TargetAdapter};

use crate::caption::{truncate_chars, with_hashtags};
use crate::media::public_media_url;

const API_BASE: &str = "https://graph.facebook.com/v19.0";
const MAX_CAPTION_CHARS: usize = 2200;

#[derive(Debug, Deserialize)]
struct GraphIdResponse {
    id: String,
}

pub struct InstagramTarget {
    http_client: reqwest::Client,
    access_token: Option<String>,
    user_id: Option<String>,
    base_url: String,
}

impl Debug for InstagramTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("InstagramTarget")
            .field("user_id", &self.user_id)
            .field("has_token", &self.access_token.is_some())
            .finish()
    }
}

impl InstagramTarget {
    pub fn new(access_token: Option<String>, user_id: Option<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client for Instagram")?;

        Ok(Self {
            http_client,
            access_token,
            user_id,
            base_url: API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Reel caption: script, blank line, hashtags; at most 2200 characters.
    pub fn format_caption(content: &PublishContent) -> String {
        let full = with_hashtags(content.caption(), &content.rendered_hashtags(), "\n\n");
        truncate_chars(&full, MAX_CAPTION_CHARS)
    }

    async fn graph_post(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<GraphIdResponse, PublishError> {
        let response = self
            .http_client
            .post(format!("{}/{}", self.base_url, path))
            .form(params)
            .send()
            .await
            .map_err(|e| PublishError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| PublishError::Request(e.to_string()))
    }
}

#[async_trait]
impl TargetAdapter for InstagramTarget {
    fn name(&self) -> &str {
        "instagram"
    }

    async fn publish(&self, content: &PublishContent) -> Result<PublishResult, PublishError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or_else(|| PublishError::MissingCredentials("INSTAGRAM_ACCESS_TOKEN".to_string()))?;
        let user_id = self
            .user_id
            .as_deref()
            .ok_or_else(|| PublishError::MissingCredentials("INSTAGRAM_USER_ID".to_string()))?;
        let video_url = public_media_url(content)?;
        let caption = Self::format_caption(content);

        let container = self
            .graph_post(
                &format!("{}/media", user_id),
                &[
                    ("media_type", "REELS"),
                    ("video_url", video_url),
                    ("caption", caption.as_str()),
                    ("access_token", token),
                ],
            )
            .await?;

        tracing::debug!(record_id = %content.record_id, container_id = %container.id, "Instagram container created");

        let media = self
            .graph_post(
                &format!("{}/media_publish", user_id),
                &[("creation_id", container.id.as_str()), ("access_token", token)],
            )
            .await?;

        Ok(PublishResult::succeeded(
            self.name(),
            format!("reel published: {}", media.id),
        ))
    }
}
