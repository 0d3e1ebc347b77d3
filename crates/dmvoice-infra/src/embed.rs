//! FastEmbed-based local embedding engine.
//!
//! Implements the `Embedder` trait from `dmvoice-core` using fastembed's
//! BGESmallENV15 model (384 dimensions) with ONNX runtime inference.
//! Inference runs on the blocking thread pool; the model handle sits
//! behind a mutex since fastembed sessions are not concurrent.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

use dmvoice_core::embed::Embedder;
use dmvoice_types::error::EngineError;

/// BGESmallENV15 output dimension.
pub const EMBEDDING_DIMENSION: usize = 384;

/// Model identifier reported by `/status` and stored alongside vectors.
pub const EMBEDDING_MODEL_NAME: &str = "bge-small-en-v1.5";

pub struct FastEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl FastEmbedder {
    /// Initialize the embedding model, downloading it to `cache_dir` on
    /// first use when not already present.
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self, EngineError> {
        let mut options =
            InitOptions::new(EmbeddingModel::BGESmallENV15).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        info!(model = EMBEDDING_MODEL_NAME, "loading embedding model");
        let model = TextEmbedding::try_new(options)
            .map_err(|e| EngineError::ModelLoad(format!("{EMBEDDING_MODEL_NAME}: {e}")))?;

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

impl Embedder for FastEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EngineError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = Arc::clone(&self.model);
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|_| EngineError::Inference("embedding model lock poisoned".to_string()))?;
            model
                .embed(texts, None)
                .map_err(|e| EngineError::Inference(format!("embedding: {e}")))
        })
        .await
        .map_err(|e| EngineError::Inference(format!("embedding task join: {e}")))?
    }

    fn model_name(&self) -> &str {
        EMBEDDING_MODEL_NAME
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }
}
