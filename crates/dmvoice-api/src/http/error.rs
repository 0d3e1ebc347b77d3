//! Application error type mapping to HTTP status codes.
//!
//! Every failure surfaces as `{"error": "<message>"}`: missing or invalid
//! request fields map to 400, an unreachable synthesis sidecar to 503, and
//! everything else to 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use dmvoice_types::error::{AudioError, EngineError, KnowledgeError, SpeakerError};

#[derive(Debug)]
pub enum AppError {
    /// Bad request payload (missing/empty fields).
    Validation(String),
    /// Audio payload could not be decoded.
    Audio(AudioError),
    /// Speaker registry errors.
    Speaker(SpeakerError),
    /// Knowledge store errors.
    Knowledge(KnowledgeError),
    /// Model engine errors.
    Engine(EngineError),
}

impl From<AudioError> for AppError {
    fn from(e: AudioError) -> Self {
        AppError::Audio(e)
    }
}

impl From<SpeakerError> for AppError {
    fn from(e: SpeakerError) -> Self {
        AppError::Speaker(e)
    }
}

impl From<KnowledgeError> for AppError {
    fn from(e: KnowledgeError) -> Self {
        AppError::Knowledge(e)
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        AppError::Engine(e)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Audio(_) => StatusCode::BAD_REQUEST,
            AppError::Speaker(_) => StatusCode::BAD_REQUEST,
            AppError::Knowledge(KnowledgeError::InvalidEntry(_)) => StatusCode::BAD_REQUEST,
            AppError::Knowledge(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Engine(EngineError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Audio(e) => e.to_string(),
            AppError::Speaker(e) => e.to_string(),
            AppError::Knowledge(e) => e.to_string(),
            AppError::Engine(e) => e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        }

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(
            AppError::Validation("audio_data is required".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Audio(AudioError::Empty).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Speaker(SpeakerError::NoneEnrolled).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Knowledge(KnowledgeError::InvalidEntry("x".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn engine_failures_map_to_500() {
        assert_eq!(
            AppError::Engine(EngineError::Inference("boom".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Knowledge(KnowledgeError::Store("io".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unavailable_engine_maps_to_503() {
        assert_eq!(
            AppError::Engine(EngineError::Unavailable("sidecar down".to_string())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
