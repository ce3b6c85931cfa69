//! Conversation orchestration shared by the HTTP routes and the socket loop.
//!
//! One turn = persist the user message, build the context window, call the
//! response generator, persist the reply. Both entry points (`process_text`,
//! `process_audio`) funnel into the same turn pipeline, so windowing and
//! persistence ordering cannot drift between surfaces.

use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use murmur_core::ids::SessionId;
use murmur_core::messages::{MessageKind, MessageRecord, SessionRecord};
use murmur_llm::types::{GeneratorError, ResponseGenerator};
use murmur_settings::MurmurSettings;
use murmur_store::errors::StoreError;
use murmur_store::store::ConversationStore;
use murmur_transcription::types::{Transcriber, TranscriptionError};
use tracing::{debug, warn};

use crate::history;
use crate::metrics::{TURN_DURATION_SECONDS, TURN_ERRORS_TOTAL, TURNS_TOTAL};

/// Tunables for the turn pipeline, snapshotted from settings at startup.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Most-recent messages fetched from the store per generator call.
    pub window_messages: usize,
    /// Timeout boundary around a single generator call.
    pub generation_timeout: Duration,
    /// Timeout boundary around a single transcription call.
    pub transcription_timeout: Duration,
    /// Whether audio submission is accepted at all.
    pub transcription_enabled: bool,
}

impl ServiceConfig {
    /// Snapshot the relevant settings values.
    pub fn from_settings(settings: &MurmurSettings) -> Self {
        Self {
            window_messages: settings.context.window_messages,
            generation_timeout: Duration::from_millis(settings.llm.request_timeout_ms),
            transcription_timeout: Duration::from_millis(settings.transcription.timeout_ms),
            transcription_enabled: settings.transcription.enabled,
        }
    }
}

/// Failure of a conversation turn, tagged by the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Audio could not be transcribed. Nothing was persisted.
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),

    /// The generator failed. The user message is already persisted; no
    /// assistant message is written.
    #[error(transparent)]
    Generation(#[from] GeneratorError),

    /// Audio submission is disabled by configuration.
    #[error("audio submission is disabled")]
    AudioDisabled,
}

/// Result of a completed conversation turn.
#[derive(Clone, Debug)]
pub struct TurnOutcome {
    /// What the user said: the typed text, or the audio transcript.
    pub transcript: String,
    /// The generated reply.
    pub reply: String,
    /// Persisted user message row.
    pub user_message: MessageRecord,
    /// Persisted assistant message row.
    pub ai_message: MessageRecord,
}

/// Turn pipeline over the store and the two collaborators.
pub struct ConversationService {
    store: ConversationStore,
    generator: Arc<dyn ResponseGenerator>,
    transcriber: Arc<dyn Transcriber>,
    config: ServiceConfig,
}

impl ConversationService {
    /// Assemble the service from its collaborators.
    pub fn new(
        store: ConversationStore,
        generator: Arc<dyn ResponseGenerator>,
        transcriber: Arc<dyn Transcriber>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            generator,
            transcriber,
            config,
        }
    }

    /// The underlying store, for read-only route handlers.
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Get the session, creating it with an implicit title if absent.
    pub async fn resolve_session(
        &self,
        session_id: &SessionId,
    ) -> Result<SessionRecord, ServiceError> {
        Ok(self.store.resolve_or_create(session_id.clone()).await?)
    }

    /// Run one turn from typed text.
    pub async fn process_text(
        &self,
        session_id: &SessionId,
        text: &str,
    ) -> Result<TurnOutcome, ServiceError> {
        self.run_turn(session_id, text.to_string(), MessageKind::UserText, None)
            .await
    }

    /// Run one turn from raw audio: transcribe first, then the shared
    /// pipeline. A transcription failure aborts the turn before anything is
    /// persisted.
    pub async fn process_audio(
        &self,
        session_id: &SessionId,
        audio: &[u8],
        mime_type: &str,
    ) -> Result<TurnOutcome, ServiceError> {
        if !self.config.transcription_enabled {
            return Err(ServiceError::AudioDisabled);
        }
        let transcript = match tokio::time::timeout(
            self.config.transcription_timeout,
            self.transcriber.transcribe(audio, mime_type),
        )
        .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err(TranscriptionError::Timeout.into()),
        };
        debug!(
            session_id = %session_id,
            duration_seconds = transcript.duration_seconds,
            "audio transcribed"
        );
        self.run_turn(
            session_id,
            transcript.text,
            MessageKind::UserAudio,
            Some(transcript.duration_seconds),
        )
        .await
    }

    /// Shared turn pipeline.
    ///
    /// The window is built before the new user message is appended, so the
    /// current input appears in the generator call exactly once (as `input`,
    /// never duplicated into the history).
    async fn run_turn(
        &self,
        session_id: &SessionId,
        content: String,
        kind: MessageKind,
        audio_duration: Option<f64>,
    ) -> Result<TurnOutcome, ServiceError> {
        let source = kind.as_str();
        let start = Instant::now();

        let _ = self.store.resolve_or_create(session_id.clone()).await?;
        let window =
            history::context_window(&self.store, session_id, self.config.window_messages).await?;
        let user_message = self
            .store
            .append_message(session_id.clone(), content.clone(), kind, audio_duration)
            .await?;

        let reply = match tokio::time::timeout(
            self.config.generation_timeout,
            self.generator.generate(&content, &window),
        )
        .await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                warn!(session_id = %session_id, error = %e, "generation failed");
                counter!(TURN_ERRORS_TOTAL, "source" => source, "stage" => "generation")
                    .increment(1);
                return Err(e.into());
            }
            Err(_) => {
                warn!(session_id = %session_id, "generation timed out");
                counter!(TURN_ERRORS_TOTAL, "source" => source, "stage" => "generation")
                    .increment(1);
                return Err(GeneratorError::Timeout.into());
            }
        };

        let ai_message = self
            .store
            .append_message(
                session_id.clone(),
                reply.clone(),
                MessageKind::AiResponse,
                None,
            )
            .await?;

        counter!(TURNS_TOTAL, "source" => source).increment(1);
        histogram!(TURN_DURATION_SECONDS, "source" => source).record(start.elapsed().as_secs_f64());
        debug!(
            session_id = %session_id,
            window_len = window.len(),
            reply_chars = reply.len(),
            "turn complete"
        );

        Ok(TurnOutcome {
            transcript: content,
            reply,
            user_message,
            ai_message,
        })
    }
}
