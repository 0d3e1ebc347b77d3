//! Liveness and model-status endpoints.
//!
//! Both endpoints only observe engine cells; they never trigger model
//! loading.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

#[derive(Serialize)]
pub struct ServiceHealth {
    whisper: bool,
    embeddings: bool,
    knowledge: bool,
    speaker: bool,
    tts: bool,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let readiness = state.readiness();
    Json(HealthResponse {
        status: "healthy",
        services: ServiceHealth {
            whisper: readiness.whisper,
            embeddings: readiness.embeddings,
            knowledge: readiness.knowledge,
            speaker: readiness.speaker,
            tts: readiness.tts,
        },
    })
}

#[derive(Serialize)]
pub struct StatusResponse {
    whisper_model: String,
    embedding_model: String,
    speakers_enrolled: usize,
    knowledge_entries: u64,
}

/// GET /status
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        whisper_model: state.whisper_model_name(),
        embedding_model: state.config.models.embedding_model.clone(),
        speakers_enrolled: state.registry.len(),
        knowledge_entries: state.knowledge_entries().await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmvoice_types::config::ServiceConfig;
    use std::path::PathBuf;

    fn state() -> AppState {
        AppState::with_config(PathBuf::from("/tmp/dmvoice-test"), ServiceConfig::default())
    }

    #[tokio::test]
    async fn health_reports_uninitialized_engines() {
        let Json(response) = health(State(state())).await;
        assert_eq!(response.status, "healthy");
        assert!(!response.services.whisper);
        assert!(!response.services.embeddings);
        assert!(!response.services.tts);
    }

    #[tokio::test]
    async fn status_reports_config_and_counts() {
        let state = state();
        state.registry.enroll("alice", vec![0.1, 0.2]).unwrap();

        let Json(response) = status(State(state)).await;
        assert_eq!(response.whisper_model, "ggml-base.en.bin");
        assert_eq!(response.embedding_model, "bge-small-en-v1.5");
        assert_eq!(response.speakers_enrolled, 1);
        assert_eq!(response.knowledge_entries, 0);
    }
}
