//! HTTP client for an external speech-to-text sidecar.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::types::{Transcriber, TranscriptionError, TranscriptionResult};

/// Configuration for [`SidecarTranscriber`].
#[derive(Clone, Debug)]
pub struct SidecarConfig {
    /// Sidecar base URL (no trailing slash).
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: std::time::Duration,
    /// Maximum accepted audio payload size in bytes.
    pub max_audio_bytes: usize,
}

/// Sidecar `/transcribe` response body.
#[derive(Debug, Deserialize)]
struct SidecarResponse {
    text: String,
    #[serde(default = "default_language")]
    language: String,
    #[serde(default)]
    duration_seconds: f64,
}

fn default_language() -> String {
    "en".into()
}

/// Map a MIME type to a filename with the correct extension.
///
/// The sidecar uses the file extension to pick the container format —
/// sending m4a audio with a `.wav` name causes decode failures.
fn filename_for_mime(mime_type: &str) -> String {
    let ext = match mime_type {
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" | "audio/aac" => "m4a",
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/ogg" | "audio/vorbis" => "ogg",
        "audio/webm" => "webm",
        "audio/flac" | "audio/x-flac" => "flac",
        _ => "wav",
    };
    format!("audio.{ext}")
}

/// Transcriber that POSTs audio as multipart to a sidecar service.
pub struct SidecarTranscriber {
    config: SidecarConfig,
    client: reqwest::Client,
}

impl SidecarTranscriber {
    /// Build a transcriber with its own HTTP client.
    pub fn new(config: SidecarConfig) -> Result<Self, TranscriptionError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl Transcriber for SidecarTranscriber {
    async fn transcribe(
        &self,
        audio: &[u8],
        mime_type: &str,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        if audio.len() > self.config.max_audio_bytes {
            return Err(TranscriptionError::PayloadTooLarge {
                size: audio.len(),
                max: self.config.max_audio_bytes,
            });
        }

        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(filename_for_mime(mime_type))
            .mime_str(mime_type)
            .map_err(|e| TranscriptionError::Rejected(format!("invalid mime type: {e}")))?;
        let form = reqwest::multipart::Form::new().part("audio", part);

        let response = self
            .client
            .post(format!("{}/transcribe", self.config.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "sidecar rejected audio");
            return Err(TranscriptionError::Rejected(format!(
                "sidecar returned {status}: {body}"
            )));
        }

        let parsed: SidecarResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::InvalidResponse(e.to_string()))?;
        let text = parsed.text.trim().to_string();
        if text.is_empty() {
            return Err(TranscriptionError::EmptyTranscript);
        }

        debug!(chars = text.len(), language = %parsed.language, "transcription complete");
        Ok(TranscriptionResult {
            text,
            language: parsed.language,
            duration_seconds: parsed.duration_seconds,
        })
    }
}
