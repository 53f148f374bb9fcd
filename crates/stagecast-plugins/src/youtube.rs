//! YouTube Shorts publishing via the Data API v3 resumable upload

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use stagecast_core::models::{PublishContent, PublishResult};
use stagecast_core::{PublishError, TargetAdapter};

use crate::caption::{truncate_with_ellipsis, with_hashtags};
use crate::media::load_media_bytes;

const API_BASE: &str = "https://www.googleapis.com";
const MAX_TITLE_CHARS: usize = 100;

#[derive(Debug, Serialize)]
struct VideoResource<'a> {
    snippet: Snippet<'a>,
    status: VideoStatus<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Snippet<'a> {
    title: &'a str,
    description: &'a str,
    category_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatus<'a> {
    privacy_status: &'a str,
    self_declared_made_for_kids: bool,
}

#[derive(Debug, Deserialize)]
struct UploadedVideo {
    id: String,
}

pub struct YouTubeTarget {
    http_client: reqwest::Client,
    access_token: Option<String>,
    base_url: String,
}

impl Debug for YouTubeTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("YouTubeTarget")
            .field("has_token", &self.access_token.is_some())
            .finish()
    }
}

impl YouTubeTarget {
    pub fn new(access_token: Option<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .context("Failed to create HTTP client for YouTube")?;

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

    pub fn format_title(content: &PublishContent) -> String {
        truncate_with_ellipsis(content.caption(), MAX_TITLE_CHARS)
    }

    pub fn format_description(content: &PublishContent) -> String {
        with_hashtags(content.caption(), &content.rendered_hashtags(), "\n\n")
    }

    async fn start_session(&self, token: &str, content: &PublishContent) -> Result<String, PublishError> {
        let title = Self::format_title(content);
        let description = Self::format_description(content);
        let resource = VideoResource {
            snippet: Snippet {
                title: &title,
                description: &description,
                category_id: "22",
            },
            status: VideoStatus {
                privacy_status: "public",
                self_declared_made_for_kids: false,
            },
        };

        let response = self
            .http_client
            .post(format!(
                "{}/upload/youtube/v3/videos?uploadType=resumable&part=snippet,status",
                self.base_url
            ))
            .bearer_auth(token)
            .header("X-Upload-Content-Type", "video/*")
            .json(&resource)
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
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| PublishError::Request("upload session has no Location header".to_string()))
    }
}

#[async_trait]
impl TargetAdapter for YouTubeTarget {
    fn name(&self) -> &str {
        "youtube"
    }

    async fn publish(&self, content: &PublishContent) -> Result<PublishResult, PublishError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or_else(|| PublishError::MissingCredentials("YOUTUBE_ACCESS_TOKEN".to_string()))?;

        // Resolve the media first so a bad reference never opens a session.
        let media = load_media_bytes(&self.http_client, content).await?;
        let upload_url = self.start_session(token, content).await?;

        let response = self
            .http_client
            .put(&upload_url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "video/*")
            .body(media)
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

        let video: UploadedVideo = response
            .json()
            .await
            .map_err(|e| PublishError::Request(e.to_string()))?;

        Ok(PublishResult::succeeded(
            self.name(),
            format!("https://youtube.com/shorts/{}", video.id),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn content(script: &str, media_ref: Option<String>) -> PublishContent {
        PublishContent {
            record_id: Uuid::new_v4(),
            topic: "wellness".to_string(),
            script: script.to_string(),
            media_ref,
            hashtags: vec!["wellness".to_string()],
        }
    }

    #[test]
    fn test_title_and_description() {
        let short = content("Morning rituals", None);
        assert_eq!(YouTubeTarget::format_title(&short), "Morning rituals");
        assert_eq!(
            YouTubeTarget::format_description(&short),
            "Morning rituals\n\n#wellness"
        );

        let long = content(&"a".repeat(150), None);
        let title = YouTubeTarget::format_title(&long);
        assert_eq!(title.chars().count(), 100);
        assert!(title.ends_with("..."));
        assert_eq!(&title[..97], "a".repeat(97));
    }

    #[tokio::test]
    async fn test_synthetic_media_is_not_uploaded() {
        let target = YouTubeTarget::new(Some("yt".to_string())).unwrap();
        let err = target
            .publish(&content(
                "x",
                Some("synthetic://ambient/pink-noise?duration=15s".to_string()),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::Media(_)));
    }

    #[tokio::test]
    async fn test_resumable_upload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.mp4");
        std::fs::write(&path, b"video-bytes").unwrap();

        let mut server = mockito::Server::new_async().await;
        let location = format!("{}/upload/session-1", server.url());
        let init = server
            .mock("POST", "/upload/youtube/v3/videos")
            .match_query(mockito::Matcher::Any)
            .match_header("authorization", "Bearer yt")
            .with_status(200)
            .with_header("location", &location)
            .create_async()
            .await;
        let upload = server
            .mock("PUT", "/upload/session-1")
            .match_body("video-bytes")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"abc123"}"#)
            .create_async()
            .await;

        let target = YouTubeTarget::new(Some("yt".to_string()))
            .unwrap()
            .with_base_url(server.url());
        let result = target
            .publish(&content(
                "Morning rituals",
                Some(path.to_string_lossy().into_owned()),
            ))
            .await
            .unwrap();

        init.assert_async().await;
        upload.assert_async().await;
        assert!(result.success);
        assert_eq!(result.detail, "https://youtube.com/shorts/abc123");
    }
}
