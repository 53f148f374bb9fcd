//! Slack incoming-webhook notification sink

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use stagecast_core::models::NotificationEvent;
use stagecast_core::NotificationSink;

const USERNAME: &str = "stagecast";

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    text: &'a str,
    username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<&'a str>,
}

pub struct SlackNotificationSink {
    http_client: reqwest::Client,
    webhook_url: String,
    channel: Option<String>,
}

impl Debug for SlackNotificationSink {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SlackNotificationSink")
            .field("channel", &self.channel)
            .finish()
    }
}

impl SlackNotificationSink {
    pub fn new(webhook_url: impl Into<String>, channel: Option<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client for Slack")?;

        Ok(Self {
            http_client,
            webhook_url: webhook_url.into(),
            channel,
        })
    }
}

#[async_trait]
impl NotificationSink for SlackNotificationSink {
    async fn notify(&self, event: &NotificationEvent) -> Result<(), String> {
        let text = event.message();
        let message = WebhookMessage {
            text: &text,
            username: USERNAME,
            channel: self.channel.as_deref(),
        };

        let response = self
            .http_client
            .post(&self.webhook_url)
            .json(&message)
            .send()
            .await
            .map_err(|e| format!("Slack request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("Slack webhook returned {}", response.status()));
        }

        Ok(())
    }
}
