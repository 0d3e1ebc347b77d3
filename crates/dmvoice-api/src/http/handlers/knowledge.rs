//! Campaign knowledge endpoints.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;

use dmvoice_types::knowledge::{KnowledgeEntry, KnowledgeHit};

use crate::http::error::AppError;
use crate::state::AppState;

fn default_category() -> String {
    "general".to_string()
}

#[derive(Deserialize)]
pub struct AddKnowledgeRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Serialize)]
pub struct AddKnowledgeResponse {
    pub success: bool,
    pub id: String,
}

/// POST /add_knowledge
pub async fn add_knowledge(
    State(state): State<AppState>,
    Json(request): Json<AddKnowledgeRequest>,
) -> Result<Json<AddKnowledgeResponse>, AppError> {
    let entry = KnowledgeEntry {
        id: request.id,
        category: request.category,
        title: request.title,
        content: request.content,
        tags: request.tags,
    };

    let knowledge = state.knowledge().await?;
    knowledge.add(&entry).await?;
    info!(id = %entry.id, category = %entry.category, "knowledge entry stored");

    Ok(Json(AddKnowledgeResponse {
        success: true,
        id: entry.id,
    }))
}

#[derive(Deserialize)]
pub struct SearchKnowledgeRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub n_results: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchKnowledgeResponse {
    pub results: Vec<KnowledgeHit>,
}

/// POST /search_knowledge
///
/// An empty query returns an empty result set with 200.
pub async fn search_knowledge(
    State(state): State<AppState>,
    Json(request): Json<SearchKnowledgeRequest>,
) -> Result<Json<SearchKnowledgeResponse>, AppError> {
    if request.query.trim().is_empty() {
        return Ok(Json(SearchKnowledgeResponse { results: vec![] }));
    }

    let limit = request
        .n_results
        .unwrap_or(state.config.knowledge.default_results);
    let knowledge = state.knowledge().await?;
    let results = knowledge.search(&request.query, limit).await?;

    Ok(Json(SearchKnowledgeResponse { results }))
}
