//! Intent detection endpoint.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use dmvoice_types::intent::IntentDecision;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DetectIntentRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub threshold: Option<f32>,
}

/// POST /detect_intent
///
/// Empty text is not an error: it yields a silent decision with 200.
pub async fn detect_intent(
    State(state): State<AppState>,
    Json(request): Json<DetectIntentRequest>,
) -> Result<Json<IntentDecision>, AppError> {
    if request.text.trim().is_empty() {
        return Ok(Json(IntentDecision::silent()));
    }

    let threshold = request.threshold.unwrap_or(state.config.intent.threshold);
    let detector = state.intent().await?;
    let decision = detector.detect(&request.text, threshold).await?;

    Ok(Json(decision))
}
