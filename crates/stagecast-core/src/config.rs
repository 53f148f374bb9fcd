//! Configuration module
//!
//! Configuration is read from the environment (after loading `.env`), with
//! defaults for everything except third-party credentials. Missing credentials
//! disable the matching integration rather than failing startup.

use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::{IntegrationState, ServiceStatus};

const STAGE_TIMEOUT_SECS: u64 = 120;
const PUBLISH_TARGET_TIMEOUT_SECS: u64 = 60;
const MEDIA_OUTPUT_DIR: &str = "./media";
const DEFAULT_BRAND: &str = "studio";
const DEFAULT_CANDIDATE_TOPICS: &str = "Indigenous wellness,Cannabis education,Behind the scenes";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_ELEVENLABS_VOICE_ID: &str = "pNInz6obpgDQGcFmaJgB";
const DEFAULT_EDGE_TTS_PATH: &str = "edge-tts";
const DEFAULT_EDGE_TTS_VOICE: &str = "en-US-GuyNeural";

/// Stage pipeline configuration
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub brand: String,
    /// Topics drawn uniformly when a run is started without one
    pub candidate_topics: Vec<String>,
    pub stage_timeout_secs: u64,
    pub media_output_dir: PathBuf,
}

/// Fan-out publisher configuration
#[derive(Clone, Debug)]
pub struct PublisherConfig {
    pub target_timeout_secs: u64,
    pub default_hashtags: Vec<String>,
}

/// Third-party integration settings. `None` credentials disable the integration.
#[derive(Clone, Debug)]
pub struct IntegrationConfig {
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_voice_id: String,
    pub edge_tts_enabled: bool,
    pub edge_tts_path: String,
    pub edge_tts_voice: String,
    pub instagram_access_token: Option<String>,
    pub instagram_user_id: Option<String>,
    pub tiktok_access_token: Option<String>,
    pub youtube_access_token: Option<String>,
    pub slack_webhook_url: Option<String>,
    pub slack_channel: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub pipeline: PipelineConfig,
    pub publisher: PublisherConfig,
    pub integrations: IntegrationConfig,
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let stage_timeout_secs = match get("STAGE_TIMEOUT_SECS") {
            Some(v) => v
                .parse()
                .map_err(|_| anyhow::anyhow!("STAGE_TIMEOUT_SECS must be a valid number"))?,
            None => STAGE_TIMEOUT_SECS,
        };

        let target_timeout_secs = match get("PUBLISH_TARGET_TIMEOUT_SECS") {
            Some(v) => v.parse().map_err(|_| {
                anyhow::anyhow!("PUBLISH_TARGET_TIMEOUT_SECS must be a valid number")
            })?,
            None => PUBLISH_TARGET_TIMEOUT_SECS,
        };

        let pipeline = PipelineConfig {
            brand: get_or("BRAND", DEFAULT_BRAND),
            candidate_topics: split_list(&get_or("CANDIDATE_TOPICS", DEFAULT_CANDIDATE_TOPICS)),
            stage_timeout_secs,
            media_output_dir: PathBuf::from(get_or("MEDIA_OUTPUT_DIR", MEDIA_OUTPUT_DIR)),
        };

        let publisher = PublisherConfig {
            target_timeout_secs,
            default_hashtags: get("DEFAULT_HASHTAGS")
                .map(|s| split_list(&s))
                .unwrap_or_default(),
        };

        let integrations = IntegrationConfig {
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            anthropic_model: get_or("ANTHROPIC_MODEL", DEFAULT_ANTHROPIC_MODEL),
            elevenlabs_api_key: get("ELEVENLABS_API_KEY"),
            elevenlabs_voice_id: get_or("ELEVENLABS_VOICE_ID", DEFAULT_ELEVENLABS_VOICE_ID),
            edge_tts_enabled: get("EDGE_TTS_ENABLED")
                .map(|s| s.to_lowercase().parse().unwrap_or(true))
                .unwrap_or(true),
            edge_tts_path: get_or("EDGE_TTS_PATH", DEFAULT_EDGE_TTS_PATH),
            edge_tts_voice: get_or("EDGE_TTS_VOICE", DEFAULT_EDGE_TTS_VOICE),
            instagram_access_token: get("INSTAGRAM_ACCESS_TOKEN"),
            instagram_user_id: get("INSTAGRAM_USER_ID"),
            tiktok_access_token: get("TIKTOK_ACCESS_TOKEN"),
            youtube_access_token: get("YOUTUBE_ACCESS_TOKEN"),
            slack_webhook_url: get("SLACK_WEBHOOK_URL"),
            slack_channel: get("SLACK_CHANNEL"),
        };

        let config = Config {
            environment,
            pipeline,
            publisher,
            integrations,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.pipeline.candidate_topics.is_empty() {
            return Err(anyhow::anyhow!(
                "CANDIDATE_TOPICS must contain at least one topic"
            ));
        }

        if self.pipeline.stage_timeout_secs == 0 {
            return Err(anyhow::anyhow!("STAGE_TIMEOUT_SECS must be greater than 0"));
        }

        if self.publisher.target_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "PUBLISH_TARGET_TIMEOUT_SECS must be greater than 0"
            ));
        }

        if self.pipeline.media_output_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("MEDIA_OUTPUT_DIR must not be empty"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.pipeline.stage_timeout_secs)
    }

    pub fn target_timeout(&self) -> Duration {
        Duration::from_secs(self.publisher.target_timeout_secs)
    }

    pub fn service_status(&self) -> ServiceStatus {
        let i = &self.integrations;
        let mut services = BTreeMap::new();
        services.insert(
            "anthropic".to_string(),
            IntegrationState::from_configured(i.anthropic_api_key.is_some()),
        );
        services.insert(
            "elevenlabs".to_string(),
            IntegrationState::from_configured(i.elevenlabs_api_key.is_some()),
        );
        services.insert(
            "edge_tts".to_string(),
            IntegrationState::from_configured(i.edge_tts_enabled),
        );
        services.insert(
            "instagram".to_string(),
            IntegrationState::from_configured(
                i.instagram_access_token.is_some() && i.instagram_user_id.is_some(),
            ),
        );
        services.insert(
            "tiktok".to_string(),
            IntegrationState::from_configured(i.tiktok_access_token.is_some()),
        );
        services.insert(
            "youtube".to_string(),
            IntegrationState::from_configured(i.youtube_access_token.is_some()),
        );
        services.insert(
            "slack".to_string(),
            IntegrationState::from_configured(i.slack_webhook_url.is_some()),
        );

        ServiceStatus {
            status: "operational".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: self.environment.clone(),
            services,
        }
    }
}
