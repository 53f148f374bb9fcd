//! Local `edge-tts` command-line provider

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use uuid::Uuid;

use stagecast_core::models::SynthesisRequest;
use stagecast_core::{ProviderError, SynthesisProvider};

/// Runs `edge-tts --voice V --text T --write-media PATH`.
#[derive(Debug, Clone)]
pub struct EdgeTtsProvider {
    program: String,
    voice: String,
    output_dir: PathBuf,
}

impl EdgeTtsProvider {
    pub fn new(
        program: impl Into<String>,
        voice: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            voice: voice.into(),
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl SynthesisProvider for EdgeTtsProvider {
    fn name(&self) -> &str {
        "edge_tts"
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<String, ProviderError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| ProviderError::Output(e.to_string()))?;
        let path = self.output_dir.join(format!("{}.mp3", Uuid::new_v4()));

        let output = Command::new(&self.program)
            .arg("--voice")
            .arg(&self.voice)
            .arg("--text")
            .arg(&request.text)
            .arg("--write-media")
            .arg(&path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ProviderError::NotConfigured(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ProviderError::Output(format!(
                "{} exited with {}: {}",
                self.program, output.status, stderr
            )));
        }

        if tokio::fs::metadata(&path).await.is_err() {
            return Err(ProviderError::Output(format!(
                "{} did not write {}",
                self.program,
                path.display()
            )));
        }

        Ok(path.to_string_lossy().into_owned())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_not_configured() {
        let dir = tempfile::tempdir().unwrap();
        let provider = EdgeTtsProvider::new("definitely-not-edge-tts", "voice", dir.path());
        let err = provider
            .synthesize(&SynthesisRequest::new("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn test_nonzero_exit_fails() {
        let dir = tempfile::tempdir().unwrap();
        let provider = EdgeTtsProvider::new("false", "voice", dir.path());
        let err = provider
            .synthesize(&SynthesisRequest::new("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Output(_)));
    }

    #[tokio::test]
    async fn test_success_without_output_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let provider = EdgeTtsProvider::new("true", "voice", dir.path());
        let err = provider
            .synthesize(&SynthesisRequest::new("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Output(msg) if msg.contains("did not write")));
    }
}
