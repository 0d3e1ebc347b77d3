//! Speech synthesis endpoint.

use axum::Json;
use axum::extract::State;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};

use dmvoice_core::tts::{SpeechSynthesizer, SynthesisRequest};

use crate::http::error::AppError;
use crate::state::AppState;

fn default_voice() -> String {
    "default".to_string()
}

fn default_speed() -> f32 {
    1.0
}

#[derive(Deserialize)]
pub struct SynthesizeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_speed")]
    pub speed: f32,
}

#[derive(Serialize)]
pub struct SynthesizeResponse {
    pub audio_data: String,
    pub format: &'static str,
}

/// POST /synthesize
///
/// 503 when the synthesis sidecar is unreachable or unconfigured.
pub async fn synthesize(
    State(state): State<AppState>,
    Json(request): Json<SynthesizeRequest>,
) -> Result<Json<SynthesizeResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text is required".to_string()));
    }

    let synthesizer = state.synthesizer().await?;
    let wav = synthesizer
        .synthesize(&SynthesisRequest {
            text: request.text,
            voice: request.voice,
            speed: request.speed,
        })
        .await?;

    Ok(Json(SynthesizeResponse {
        audio_data: BASE64_STANDARD.encode(wav),
        format: "wav",
    }))
}
