//! Speech-to-text engine trait.
//!
//! Implementations (whisper.cpp via whisper-rs) live in dmvoice-infra.

use dmvoice_types::audio::{AudioClip, TranscribeOptions, Transcript};
use dmvoice_types::error::EngineError;

/// Trait for transcribing a complete audio clip.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// The clip must already be mono PCM at the service sample rate.
pub trait SpeechToText: Send + Sync {
    fn transcribe(
        &self,
        clip: &AudioClip,
        options: &TranscribeOptions,
    ) -> impl std::future::Future<Output = Result<Transcript, EngineError>> + Send;

    /// Model identifier reported by `/status` (e.g. "ggml-base.en.bin").
    fn model_name(&self) -> &str;
}
