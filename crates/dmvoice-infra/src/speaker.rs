//! ONNX speaker-embedding engine.
//!
//! Runs a pretrained speaker-verification model via ONNX Runtime to turn a
//! voice clip into a fixed-length embedding. Models that emit per-frame
//! embeddings are mean-pooled down to a single vector.

use std::path::Path;
use std::sync::{Arc, Mutex};

use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;
use tracing::info;

use dmvoice_core::speaker::SpeakerEncoder;
use dmvoice_types::audio::AudioClip;
use dmvoice_types::error::EngineError;

pub struct OnnxSpeakerEncoder {
    session: Arc<Mutex<Session>>,
    input_name: String,
    dimension: usize,
}

impl OnnxSpeakerEncoder {
    /// Load a speaker-embedding ONNX model from disk.
    ///
    /// `dimension` is the embedding size the model emits (192 for the
    /// common ECAPA-TDNN exports).
    pub fn new(model_path: &Path, dimension: usize) -> Result<Self, EngineError> {
        let path_str = model_path
            .to_str()
            .ok_or_else(|| EngineError::ModelLoad(format!("invalid path: {}", model_path.display())))?;

        let session = Session::builder()
            .map_err(|e| EngineError::ModelLoad(format!("ort session builder: {e}")))?
            .with_intra_threads(1)
            .map_err(|e| EngineError::ModelLoad(format!("ort intra threads: {e}")))?
            .commit_from_file(path_str)
            .map_err(|e| EngineError::ModelLoad(format!("{}: {e}", model_path.display())))?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .ok_or_else(|| EngineError::ModelLoad("model declares no inputs".to_string()))?;

        info!(model = %model_path.display(), input = %input_name, "speaker model loaded");

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            dimension,
        })
    }
}

impl SpeakerEncoder for OnnxSpeakerEncoder {
    async fn encode(&self, clip: &AudioClip) -> Result<Vec<f32>, EngineError> {
        if clip.is_empty() {
            return Err(EngineError::Inference("empty audio clip".to_string()));
        }

        let session = Arc::clone(&self.session);
        let input_name = self.input_name.clone();
        let samples = clip.samples.clone();
        let dimension = self.dimension;

        tokio::task::spawn_blocking(move || -> Result<Vec<f32>, EngineError> {
            let input = Array2::from_shape_vec((1, samples.len()), samples)
                .map_err(|e| EngineError::Inference(format!("input shape: {e}")))?;
            let input_val = Tensor::from_array(input)
                .map_err(|e| EngineError::Inference(format!("input tensor: {e}")))?;

            let mut session = session
                .lock()
                .map_err(|_| EngineError::Inference("speaker session lock poisoned".to_string()))?;
            let outputs = session
                .run(ort::inputs![input_name.as_str() => input_val])
                .map_err(|e| EngineError::Inference(format!("speaker inference: {e}")))?;

            let (_shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| EngineError::Inference(format!("output extraction: {e}")))?;

            Ok(pool_embedding(data, dimension))
        })
        .await
        .map_err(|e| EngineError::Inference(format!("speaker task join: {e}")))?
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Reduce model output to a single `dimension`-length embedding.
///
/// A `[1, dim]` output passes through; a `[1, frames, dim]` output is
/// mean-pooled across frames. Anything else is returned as-is so callers
/// can still compare like against like.
fn pool_embedding(data: &[f32], dimension: usize) -> Vec<f32> {
    if data.len() <= dimension || dimension == 0 || data.len() % dimension != 0 {
        return data.to_vec();
    }

    let frames = data.len() / dimension;
    let mut pooled = vec![0.0f32; dimension];
    for frame in data.chunks_exact(dimension) {
        for (acc, v) in pooled.iter_mut().zip(frame) {
            *acc += v;
        }
    }
    for v in pooled.iter_mut() {
        *v /= frames as f32;
    }
    pooled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_passes_through_exact_dimension() {
        let data = vec![1.0, 2.0, 3.0];
        assert_eq!(pool_embedding(&data, 3), data);
    }

    #[test]
    fn pool_averages_frames() {
        // Two frames of dimension 2
        let data = vec![1.0, 0.0, 3.0, 2.0];
        assert_eq!(pool_embedding(&data, 2), vec![2.0, 1.0]);
    }

    #[test]
    fn pool_leaves_indivisible_output_alone() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(pool_embedding(&data, 2), data);
    }
}
