//! whisper.cpp speech-to-text engine.
//!
//! Wraps a GGML whisper model via whisper-rs. The context is loaded once
//! and shared; each transcription creates its own state on the blocking
//! thread pool since inference is CPU-bound.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use dmvoice_core::asr::SpeechToText;
use dmvoice_types::audio::{AudioClip, TranscribeOptions, Transcript, TranscriptSegment};
use dmvoice_types::error::EngineError;

/// Whisper timestamps are reported in centiseconds.
const TIMESTAMP_UNITS_PER_SEC: f64 = 100.0;

pub struct WhisperTranscriber {
    ctx: Arc<WhisperContext>,
    model_name: String,
    default_language: String,
}

impl WhisperTranscriber {
    /// Load a GGML whisper model from disk.
    pub fn new(model_path: &Path, default_language: &str) -> Result<Self, EngineError> {
        let path_str = model_path
            .to_str()
            .ok_or_else(|| EngineError::ModelLoad(format!("invalid path: {}", model_path.display())))?;

        info!(model = %model_path.display(), "loading whisper model");
        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| EngineError::ModelLoad(format!("{}: {e}", model_path.display())))?;

        let model_name = model_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path_str.to_string());

        Ok(Self {
            ctx: Arc::new(ctx),
            model_name,
            default_language: default_language.to_string(),
        })
    }
}

impl SpeechToText for WhisperTranscriber {
    async fn transcribe(
        &self,
        clip: &AudioClip,
        options: &TranscribeOptions,
    ) -> Result<Transcript, EngineError> {
        let ctx = Arc::clone(&self.ctx);
        let samples = clip.samples.clone();
        let language = options
            .language
            .clone()
            .unwrap_or_else(|| self.default_language.clone());
        let initial_prompt = options.initial_prompt.clone();

        let transcript = tokio::task::spawn_blocking(move || -> Result<Transcript, EngineError> {
            let mut state = ctx
                .create_state()
                .map_err(|e| EngineError::Inference(format!("whisper state: {e}")))?;

            let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
            params.set_language(Some(&language));
            if let Some(ref prompt) = initial_prompt {
                params.set_initial_prompt(prompt);
            }

            // Suppress non-speech output on stderr
            params.set_print_progress(false);
            params.set_print_special(false);
            params.set_print_realtime(false);
            params.set_print_timestamps(false);

            state
                .full(params, &samples)
                .map_err(|e| EngineError::Inference(format!("whisper transcription: {e}")))?;

            let n_segments = state.full_n_segments();
            let mut text = String::new();
            let mut segments = Vec::with_capacity(n_segments as usize);

            for i in 0..n_segments {
                let Some(segment) = state.get_segment(i) else {
                    continue;
                };
                let seg_text = segment
                    .to_str()
                    .map_err(|e| EngineError::Inference(format!("segment text: {e}")))?
                    .trim()
                    .to_string();

                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(&seg_text);

                segments.push(TranscriptSegment {
                    id: i as usize,
                    start: segment.start_timestamp() as f64 / TIMESTAMP_UNITS_PER_SEC,
                    end: segment.end_timestamp() as f64 / TIMESTAMP_UNITS_PER_SEC,
                    text: seg_text,
                });
            }

            debug!(
                segments = segments.len(),
                text_len = text.len(),
                "whisper transcription complete"
            );

            Ok(Transcript {
                text,
                segments,
                language,
            })
        })
        .await
        .map_err(|e| EngineError::Inference(format!("whisper task join: {e}")))??;

        Ok(transcript)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
