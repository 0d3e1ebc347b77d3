//! Service configuration, deserialized from `config.toml` in the data
//! directory. Every field has a default so a missing or partial file
//! still yields a usable config.

use serde::{Deserialize, Serialize};

use crate::audio::TARGET_SAMPLE_RATE;
use crate::intent::DEFAULT_INTENT_THRESHOLD;

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub models: ModelConfig,
    pub intent: IntentConfig,
    pub knowledge: KnowledgeConfig,
    /// Sample rate every engine consumes; payloads are resampled to this.
    pub sample_rate: u32,
}

/// Paths and identifiers for the wrapped pretrained models.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// GGML whisper model file (e.g. `models/ggml-base.en.bin`).
    pub whisper_model_path: String,
    /// fastembed model identifier, fixed to the 384-dim BGE small model.
    pub embedding_model: String,
    /// Speaker-embedding ONNX model file.
    pub speaker_model_path: String,
    /// Base URL of the TTS sidecar (empty disables synthesis).
    pub tts_endpoint: String,
    /// Default transcription language (ISO 639-1).
    pub language: String,
}

/// Intent detection tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    /// Similarity threshold above which the DM should respond.
    pub threshold: f32,
}

/// Knowledge search tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Default number of search results when the request omits `n_results`.
    pub default_results: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            models: ModelConfig::default(),
            intent: IntentConfig::default(),
            knowledge: KnowledgeConfig::default(),
            sample_rate: TARGET_SAMPLE_RATE,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            whisper_model_path: "models/ggml-base.en.bin".to_string(),
            embedding_model: "bge-small-en-v1.5".to_string(),
            speaker_model_path: "models/speaker-embedding.onnx".to_string(),
            tts_endpoint: String::new(),
            language: "en".to_string(),
        }
    }
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_INTENT_THRESHOLD,
        }
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self { default_results: 5 }
    }
}
