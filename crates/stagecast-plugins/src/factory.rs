use std::sync::Arc;

use stagecast_core::{
    Config, ContentError, ContentResult, NoOpNotificationSink, NotificationSink, ScriptWriter,
    SynthesisProvider, SyntheticFallback, TargetAdapter, TopicResearcher,
};

use crate::{
    AmbientAudioFallback, AnthropicClient, AnthropicResearcher, AnthropicScriptWriter,
    EdgeTtsProvider, ElevenLabsProvider, InstagramTarget, SlackNotificationSink,
    TemplateResearcher, TemplateScriptWriter, TikTokTarget, YouTubeTarget,
};

/// Everything the pipeline and publisher need, built from configuration.
#[derive(Clone)]
pub struct Collaborators {
    pub researcher: Arc<dyn TopicResearcher>,
    pub writer: Arc<dyn ScriptWriter>,
    /// Synthesis providers in preference order
    pub providers: Vec<Arc<dyn SynthesisProvider>>,
    pub fallback: Arc<dyn SyntheticFallback>,
    pub targets: Vec<Arc<dyn TargetAdapter>>,
    pub notifier: Arc<dyn NotificationSink>,
}

fn config_error(e: anyhow::Error) -> ContentError {
    ContentError::Config(e.to_string())
}

/// Create collaborators based on configuration
///
/// Text generation uses Anthropic when a key is present and the offline
/// templates otherwise. Every publish target is always registered; one
/// without credentials reports a failed result when it is used.
pub fn build_collaborators(config: &Config) -> ContentResult<Collaborators> {
    let brand = config.pipeline.brand.clone();
    let integrations = &config.integrations;

    let (researcher, writer): (Arc<dyn TopicResearcher>, Arc<dyn ScriptWriter>) =
        match integrations.anthropic_api_key.as_deref() {
            Some(key) => {
                let client = Arc::new(
                    AnthropicClient::new(key, integrations.anthropic_model.clone())
                        .map_err(config_error)?,
                );
                (
                    Arc::new(AnthropicResearcher::new(client.clone(), brand.clone())),
                    Arc::new(AnthropicScriptWriter::new(client, brand)),
                )
            }
            None => {
                tracing::info!("ANTHROPIC_API_KEY not set, using template text generation");
                (
                    Arc::new(TemplateResearcher::new(brand.clone())),
                    Arc::new(TemplateScriptWriter::new(brand)),
                )
            }
        };

    let output_dir = config.pipeline.media_output_dir.clone();
    let mut providers: Vec<Arc<dyn SynthesisProvider>> = Vec::new();
    if let Some(key) = integrations.elevenlabs_api_key.as_deref() {
        providers.push(Arc::new(
            ElevenLabsProvider::new(key, integrations.elevenlabs_voice_id.clone(), output_dir.clone())
                .map_err(config_error)?,
        ));
    }
    if integrations.edge_tts_enabled {
        providers.push(Arc::new(EdgeTtsProvider::new(
            integrations.edge_tts_path.clone(),
            integrations.edge_tts_voice.clone(),
            output_dir,
        )));
    }
    if providers.is_empty() {
        return Err(ContentError::Config(
            "no media synthesis provider configured: set ELEVENLABS_API_KEY or EDGE_TTS_ENABLED"
                .to_string(),
        ));
    }

    let targets: Vec<Arc<dyn TargetAdapter>> = vec![
        Arc::new(
            InstagramTarget::new(
                integrations.instagram_access_token.clone(),
                integrations.instagram_user_id.clone(),
            )
            .map_err(config_error)?,
        ),
        Arc::new(TikTokTarget::new(integrations.tiktok_access_token.clone()).map_err(config_error)?),
        Arc::new(YouTubeTarget::new(integrations.youtube_access_token.clone()).map_err(config_error)?),
    ];

    let notifier: Arc<dyn NotificationSink> = match integrations.slack_webhook_url.as_deref() {
        Some(url) => Arc::new(
            SlackNotificationSink::new(url, integrations.slack_channel.clone())
                .map_err(config_error)?,
        ),
        None => Arc::new(NoOpNotificationSink),
    };

    Ok(Collaborators {
        researcher,
        writer,
        providers,
        fallback: Arc::new(AmbientAudioFallback::new()),
        targets,
        notifier,
    })
}
