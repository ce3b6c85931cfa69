//! HTTP error surface.
//!
//! `ApiError` is the single error type returned by route handlers. It maps
//! internal failures to status codes without leaking store or provider
//! internals into response bodies beyond the error `Display` text.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use murmur_llm::types::GeneratorError;
use murmur_store::errors::StoreError;
use murmur_transcription::types::TranscriptionError;
use serde_json::json;
use tracing::warn;

use crate::service::ServiceError;

/// Route-handler error with an HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The referenced session does not exist.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Request was syntactically or semantically invalid.
    #[error("{0}")]
    BadRequest(String),

    /// The transcription collaborator failed.
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),

    /// The response generator failed.
    #[error(transparent)]
    Generation(#[from] GeneratorError),

    /// Unexpected server-side failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Transcription(TranscriptionError::PayloadTooLarge { .. }) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            Self::Transcription(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Generation(GeneratorError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            Self::Generation(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::SessionNotFound(id) => Self::SessionNotFound(id),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Store(e) => e.into(),
            ServiceError::Transcription(e) => Self::Transcription(e),
            ServiceError::Generation(e) => Self::Generation(e),
            ServiceError::AudioDisabled => {
                Self::BadRequest("audio submission is disabled".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let e = ApiError::SessionNotFound("sess_x".into());
        assert_eq!(e.status(), StatusCode::NOT_FOUND);
        assert!(e.to_string().contains("sess_x"));
    }

    #[test]
    fn bad_request_maps_to_400() {
        assert_eq!(
            ApiError::BadRequest("message must not be empty".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn generation_failures_are_gateway_errors() {
        let api = ApiError::Generation(GeneratorError::Api {
            status: 529,
            message: "overloaded".into(),
        });
        assert_eq!(api.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ApiError::Generation(GeneratorError::Timeout).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn transcription_failures_are_server_errors() {
        let e = ApiError::Transcription(TranscriptionError::Rejected("bad codec".into()));
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let big = ApiError::Transcription(TranscriptionError::PayloadTooLarge {
            size: 100,
            max: 10,
        });
        assert_eq!(big.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn store_session_not_found_converts_to_404() {
        let api: ApiError = StoreError::SessionNotFound("ghost".into()).into();
        assert_eq!(api.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn audio_disabled_is_a_client_error() {
        let api: ApiError = ServiceError::AudioDisabled.into();
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
    }
}
