//! Speech-to-text endpoint.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use tracing::debug;

use dmvoice_core::asr::SpeechToText;
use dmvoice_infra::audio::decode_clip;
use dmvoice_types::audio::{TranscribeOptions, Transcript};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TranscribeRequest {
    #[serde(default)]
    pub audio_data: String,
    #[serde(default)]
    pub initial_prompt: Option<String>,
}

/// POST /transcribe
pub async fn transcribe(
    State(state): State<AppState>,
    Json(request): Json<TranscribeRequest>,
) -> Result<Json<Transcript>, AppError> {
    if request.audio_data.trim().is_empty() {
        return Err(AppError::Validation("audio_data is required".to_string()));
    }

    let clip = decode_clip(&request.audio_data, state.config.sample_rate)?;
    debug!(duration_secs = clip.duration_secs(), "transcribing clip");

    let options = TranscribeOptions {
        initial_prompt: request.initial_prompt,
        language: None,
    };

    let whisper = state.whisper().await?;
    let transcript = whisper.transcribe(&clip, &options).await?;

    Ok(Json(transcript))
}
