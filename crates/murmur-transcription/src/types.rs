//! Core types for the transcription collaborator.

use async_trait::async_trait;

/// Result of transcribing an audio payload.
#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    /// The transcribed text.
    pub text: String,
    /// Detected language code (e.g. "en").
    pub language: String,
    /// Duration of the audio in seconds.
    pub duration_seconds: f64,
}

/// Errors that can occur during transcription.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    /// Audio payload exceeds the configured limit.
    #[error("audio payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Submitted payload size.
        size: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Transport-level failure reaching the sidecar.
    #[error("transcription http error: {0}")]
    Http(String),

    /// Request exceeded the configured timeout.
    #[error("transcription timed out")]
    Timeout,

    /// Sidecar rejected the audio (unsupported format, decode failure).
    #[error("transcription failed: {0}")]
    Rejected(String),

    /// Sidecar response was not in the expected shape.
    #[error("invalid transcription response: {0}")]
    InvalidResponse(String),

    /// Audio decoded but produced no speech.
    #[error("no speech detected in audio")]
    EmptyTranscript,
}

impl From<reqwest::Error> for TranscriptionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(e.to_string())
        }
    }
}

/// A collaborator converting raw audio bytes to text. May fail.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe `audio` (container format indicated by `mime_type`).
    async fn transcribe(
        &self,
        audio: &[u8],
        mime_type: &str,
    ) -> Result<TranscriptionResult, TranscriptionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_too_large_names_both_sizes() {
        let e = TranscriptionError::PayloadTooLarge {
            size: 100,
            max: 50,
        };
        let s = e.to_string();
        assert!(s.contains("100"));
        assert!(s.contains("50"));
    }

    #[test]
    fn rejected_carries_reason() {
        let e = TranscriptionError::Rejected("corrupt header".into());
        assert!(e.to_string().contains("corrupt header"));
    }
}
