//! Speech synthesis engine trait.
//!
//! Implementations (HTTP sidecar client) live in dmvoice-infra.

use dmvoice_types::error::EngineError;

/// Parameters for one synthesis request.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: String,
    pub speed: f32,
}

/// Trait for turning text into WAV audio bytes.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize speech, returning complete WAV file bytes.
    fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, EngineError>> + Send;
}
