//! Ordered media-synthesis providers with a synthetic fallback.

use std::sync::Arc;

use stagecast_core::models::{MediaResult, SynthesisRequest};
use stagecast_core::{ContentError, ContentResult, SynthesisProvider, SyntheticFallback};

/// Tries each provider once, in order, and falls back to synthetic media.
///
/// Resolution never fails: provider errors are logged and skipped.
#[derive(Debug, Clone)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn SynthesisProvider>>,
    fallback: Arc<dyn SyntheticFallback>,
}

impl ProviderChain {
    pub fn new(
        providers: Vec<Arc<dyn SynthesisProvider>>,
        fallback: Arc<dyn SyntheticFallback>,
    ) -> ContentResult<Self> {
        if providers.is_empty() {
            return Err(ContentError::Config(
                "provider chain needs at least one synthesis provider".to_string(),
            ));
        }
        Ok(Self {
            providers,
            fallback,
        })
    }

    pub async fn resolve(&self, request: &SynthesisRequest) -> MediaResult {
        for provider in &self.providers {
            match provider.synthesize(request).await {
                Ok(reference) => {
                    tracing::info!(provider = provider.name(), "Media synthesized");
                    return MediaResult {
                        provider_used: provider.name().to_string(),
                        reference,
                        is_synthetic: false,
                    };
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        error = %e,
                        "Synthesis provider failed, trying next"
                    );
                }
            }
        }

        tracing::warn!(
            providers = self.providers.len(),
            fallback = self.fallback.name(),
            "All synthesis providers failed, using synthetic media"
        );
        self.synthetic(request).await
    }

    /// Skip the providers and produce synthetic media directly.
    pub async fn synthetic(&self, request: &SynthesisRequest) -> MediaResult {
        MediaResult {
            provider_used: self.fallback.name().to_string(),
            reference: self.fallback.generate(request).await,
            is_synthetic: true,
        }
    }
}
