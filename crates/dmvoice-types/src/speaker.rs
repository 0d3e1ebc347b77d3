//! Speaker enrollment and diarization types.

use serde::{Deserialize, Serialize};

/// A scored candidate from nearest-neighbor speaker lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerMatch {
    pub speaker_id: String,
    /// Cosine similarity against the enrolled embedding.
    pub confidence: f32,
}

/// Diarization result: the best match plus runner-up candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiarizationResult {
    pub speaker_id: String,
    pub confidence: f32,
    /// Up to three runner-up matches, sorted by confidence descending.
    pub alternatives: Vec<SpeakerMatch>,
}
