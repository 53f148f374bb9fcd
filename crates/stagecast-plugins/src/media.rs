//! Media reference resolution for publish targets.

use bytes::Bytes;

use stagecast_core::models::PublishContent;
use stagecast_core::PublishError;

const SYNTHETIC_SCHEME: &str = "synthetic://";

fn media_ref(content: &PublishContent) -> Result<&str, PublishError> {
    match content.media_ref.as_deref() {
        None => Err(PublishError::Media("record has no media".to_string())),
        Some(r) if r.starts_with(SYNTHETIC_SCHEME) => Err(PublishError::Media(format!(
            "synthetic media must be rendered before publishing: {}",
            r
        ))),
        Some(r) => Ok(r),
    }
}

fn is_http(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Media reference usable by platforms that pull from a public URL.
pub(crate) fn public_media_url(content: &PublishContent) -> Result<&str, PublishError> {
    let reference = media_ref(content)?;
    if is_http(reference) {
        Ok(reference)
    } else {
        Err(PublishError::Media(format!(
            "target requires a public URL, got {}",
            reference
        )))
    }
}

/// Media bytes for platforms that take an upload, from a URL or a local path.
pub(crate) async fn load_media_bytes(
    http_client: &reqwest::Client,
    content: &PublishContent,
) -> Result<Bytes, PublishError> {
    let reference = media_ref(content)?;

    if is_http(reference) {
        let response = http_client
            .get(reference)
            .send()
            .await
            .map_err(|e| PublishError::Media(e.to_string()))?;
        if !response.status().is_success() {
            return Err(PublishError::Media(format!(
                "fetching {} returned {}",
                reference,
                response.status()
            )));
        }
        response
            .bytes()
            .await
            .map_err(|e| PublishError::Media(e.to_string()))
    } else {
        tokio::fs::read(reference)
            .await
            .map(Bytes::from)
            .map_err(|e| PublishError::Media(format!("{}: {}", reference, e)))
    }
}
