//! Speaker-embedding engine trait and the in-memory speaker registry.
//!
//! Diarization here is a single nearest-neighbor cosine lookup over the
//! enrolled embeddings. The registry has no persistence and no eviction;
//! re-enrolling an id replaces its embedding.

use dashmap::DashMap;

use dmvoice_types::audio::AudioClip;
use dmvoice_types::error::{EngineError, SpeakerError};
use dmvoice_types::speaker::{DiarizationResult, SpeakerMatch};

use crate::embed::cosine_similarity;

/// Number of runner-up matches returned alongside the best match.
const MAX_ALTERNATIVES: usize = 3;

/// Trait for extracting a fixed-length voice embedding from audio.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations (ONNX via ort) live in dmvoice-infra.
pub trait SpeakerEncoder: Send + Sync {
    fn encode(
        &self,
        clip: &AudioClip,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EngineError>> + Send;

    /// The dimensionality of the produced embeddings.
    fn dimension(&self) -> usize;
}

/// In-memory mapping from speaker id to a single voice embedding.
#[derive(Default)]
pub struct SpeakerRegistry {
    speakers: DashMap<String, Vec<f32>>,
}

impl SpeakerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enroll (or replace) a speaker embedding. Returns the embedding size.
    pub fn enroll(&self, speaker_id: &str, embedding: Vec<f32>) -> Result<usize, SpeakerError> {
        if embedding.is_empty() {
            return Err(SpeakerError::EmptyEmbedding);
        }
        let size = embedding.len();
        self.speakers.insert(speaker_id.to_string(), embedding);
        Ok(size)
    }

    /// Identify the closest enrolled speaker to the given embedding.
    ///
    /// Returns the best match plus up to three runner-ups, all sorted by
    /// cosine similarity descending.
    pub fn identify(&self, embedding: &[f32]) -> Result<DiarizationResult, SpeakerError> {
        if self.speakers.is_empty() {
            return Err(SpeakerError::NoneEnrolled);
        }

        let mut matches: Vec<SpeakerMatch> = self
            .speakers
            .iter()
            .map(|entry| SpeakerMatch {
                speaker_id: entry.key().clone(),
                confidence: cosine_similarity(embedding, entry.value()),
            })
            .collect();

        matches.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let best = matches.remove(0);
        matches.truncate(MAX_ALTERNATIVES);

        Ok(DiarizationResult {
            speaker_id: best.speaker_id,
            confidence: best.confidence,
            alternatives: matches,
        })
    }

    /// Number of enrolled speakers, reported by `/status`.
    pub fn len(&self) -> usize {
        self.speakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }
}
