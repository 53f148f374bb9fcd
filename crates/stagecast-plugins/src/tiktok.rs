//! TikTok publishing via the Content Posting API

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use stagecast_core::models::{PublishContent, PublishResult};
use stagecast_core::{PublishError, TargetAdapter};

use crate::caption::{truncate_chars, with_hashtags};
use crate::media::public_media_url;

const API_BASE: &str = "https://open.tiktokapis.com";
const MAX_CAPTION_CHARS: usize = 150;

#[derive(Debug, Serialize)]
struct InitRequest<'a> {
    post_info: PostInfo<'a>,
    source_info: SourceInfo<'a>,
}

#[derive(Debug, Serialize)]
struct PostInfo<'a> {
    title: &'a str,
    privacy_level: &'a str,
}

#[derive(Debug, Serialize)]
struct SourceInfo<'a> {
    source: &'a str,
    video_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct InitResponse {
    #[serde(default)]
    data: Option<InitData>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct InitData {
    publish_id: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    message: String,
}

pub struct TikTokTarget {
    http_client: reqwest::Client,
    access_token: Option<String>,
    base_url: String,
}

impl Debug for TikTokTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TikTokTarget")
            .field("has_token", &self.access_token.is_some())
            .finish()
    }
}

impl TikTokTarget {
    pub fn new(access_token: Option<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client for TikTok")?;

        Ok(Self {
            http_client,
            access_token,
            base_url: API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn format_caption(content: &PublishContent) -> String {
        let full = with_hashtags(content.caption(), &content.rendered_hashtags(), " ");
        truncate_chars(&full, MAX_CAPTION_CHARS)
    }
}

#[async_trait]
impl TargetAdapter for TikTokTarget {
    fn name(&self) -> &str {
        "tiktok"
    }

    async fn publish(&self, content: &PublishContent) -> Result<PublishResult, PublishError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or_else(|| PublishError::MissingCredentials("TIKTOK_ACCESS_TOKEN".to_string()))?;
        let video_url = public_media_url(content)?;
        let caption = Self::format_caption(content);

        let request = InitRequest {
            post_info: PostInfo {
                title: &caption,
                privacy_level: "PUBLIC_TO_EVERYONE",
            },
            source_info: SourceInfo {
                source: "PULL_FROM_URL",
                video_url,
            },
        };

        let response = self
            .http_client
            .post(format!("{}/v2/post/publish/video/init/", self.base_url))
            .bearer_auth(token)
            .json(&request)
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

        let body: InitResponse = response
            .json()
            .await
            .map_err(|e| PublishError::Request(e.to_string()))?;

        if let Some(error) = body.error.filter(|e| e.code != "ok") {
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body: format!("{}: {}", error.code, error.message),
            });
        }

        let publish_id = body
            .data
            .map(|d| d.publish_id)
            .ok_or_else(|| PublishError::Request("response missing publish_id".to_string()))?;

        Ok(PublishResult::succeeded(
            self.name(),
            format!("publish started: {}", publish_id),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn content(script: &str) -> PublishContent {
        PublishContent {
            record_id: Uuid::new_v4(),
            topic: "wellness".to_string(),
            script: script.to_string(),
            media_ref: Some("https://cdn.example.com/v.mp4".to_string()),
            hashtags: vec!["wellness".to_string()],
        }
    }

    #[test]
    fn test_caption_is_capped_at_150_chars() {
        assert_eq!(TikTokTarget::format_caption(&content("Short")), "Short #wellness");
        let caption = TikTokTarget::format_caption(&content(&"word ".repeat(60)));
        assert_eq!(caption.chars().count(), MAX_CAPTION_CHARS);
    }

    #[tokio::test]
    async fn test_missing_token() {
        let target = TikTokTarget::new(None).unwrap();
        let err = target.publish(&content("x")).await.unwrap_err();
        assert_eq!(err.to_string(), "missing credentials: TIKTOK_ACCESS_TOKEN");
    }

    #[tokio::test]
    async fn test_init_publish() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/post/publish/video/init/")
            .match_header("authorization", "Bearer tt-token")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"source_info":{"source":"PULL_FROM_URL"}}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"publish_id":"v_pub_1"},"error":{"code":"ok","message":""}}"#)
            .create_async()
            .await;

        let target = TikTokTarget::new(Some("tt-token".to_string()))
            .unwrap()
            .with_base_url(server.url());
        let result = target.publish(&content("Morning rituals")).await.unwrap();

        mock.assert_async().await;
        assert!(result.success);
        assert!(result.detail.contains("v_pub_1"));
    }

    #[tokio::test]
    async fn test_api_error_code_is_rejection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v2/post/publish/video/init/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"code":"spam_risk_too_many_posts","message":"slow down"}}"#)
            .create_async()
            .await;

        let target = TikTokTarget::new(Some("tt-token".to_string()))
            .unwrap()
            .with_base_url(server.url());
        let err = target.publish(&content("x")).await.unwrap_err();
        assert!(matches!(err, PublishError::Rejected { body, .. } if body.contains("spam_risk")));
    }
}
