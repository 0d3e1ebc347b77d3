//! Speaker enrollment and diarization endpoints.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;

use dmvoice_core::speaker::SpeakerEncoder;
use dmvoice_infra::audio::decode_clip;
use dmvoice_types::speaker::DiarizationResult;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct EnrollRequest {
    #[serde(default)]
    pub speaker_id: String,
    #[serde(default)]
    pub audio_data: String,
}

#[derive(Serialize)]
pub struct EnrollResponse {
    pub success: bool,
    pub speaker_id: String,
    pub embedding_size: usize,
}

/// POST /enroll
pub async fn enroll(
    State(state): State<AppState>,
    Json(request): Json<EnrollRequest>,
) -> Result<Json<EnrollResponse>, AppError> {
    if request.speaker_id.trim().is_empty() {
        return Err(AppError::Validation("speaker_id is required".to_string()));
    }
    if request.audio_data.trim().is_empty() {
        return Err(AppError::Validation("audio_data is required".to_string()));
    }

    let clip = decode_clip(&request.audio_data, state.config.sample_rate)?;
    let encoder = state.speaker_encoder().await?;
    let embedding = encoder.encode(&clip).await?;

    let embedding_size = state.registry.enroll(&request.speaker_id, embedding)?;
    info!(speaker_id = %request.speaker_id, embedding_size, "speaker enrolled");

    Ok(Json(EnrollResponse {
        success: true,
        speaker_id: request.speaker_id,
        embedding_size,
    }))
}

#[derive(Deserialize)]
pub struct DiarizeRequest {
    #[serde(default)]
    pub audio_data: String,
}

/// POST /diarize
pub async fn diarize(
    State(state): State<AppState>,
    Json(request): Json<DiarizeRequest>,
) -> Result<Json<DiarizationResult>, AppError> {
    if request.audio_data.trim().is_empty() {
        return Err(AppError::Validation("audio_data is required".to_string()));
    }
    // Guaranteed 400; bail before decoding audio or loading the model
    if state.registry.is_empty() {
        return Err(dmvoice_types::error::SpeakerError::NoneEnrolled.into());
    }

    let clip = decode_clip(&request.audio_data, state.config.sample_rate)?;
    let encoder = state.speaker_encoder().await?;
    let embedding = encoder.encode(&clip).await?;

    let result = state.registry.identify(&embedding)?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use dmvoice_types::config::ServiceConfig;
    use dmvoice_types::error::SpeakerError;
    use std::path::PathBuf;

    fn state() -> AppState {
        AppState::with_config(PathBuf::from("/tmp/dmvoice-test"), ServiceConfig::default())
    }

    #[tokio::test]
    async fn diarize_with_no_speakers_fails_before_decode() {
        let state = state();
        // Undecodable payload: reaching the decoder (or the speaker model,
        // which isn't installed here) would produce a different error
        let request = DiarizeRequest {
            audio_data: "not!!valid@@base64".to_string(),
        };

        let err = diarize(State(state), Json(request)).await.unwrap_err();
        assert!(matches!(err, AppError::Speaker(SpeakerError::NoneEnrolled)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn diarize_requires_audio_data() {
        let request = DiarizeRequest {
            audio_data: "   ".to_string(),
        };
        let err = diarize(State(state()), Json(request)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
