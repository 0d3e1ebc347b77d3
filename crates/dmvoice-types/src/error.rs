use thiserror::Error;

/// Errors decoding audio payloads before they reach a model.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("invalid base64 audio payload: {0}")]
    InvalidBase64(String),

    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("audio payload is empty")]
    Empty,
}

/// Errors from the wrapped model engines (whisper, embeddings, speaker
/// encoder, TTS).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("engine unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the speaker registry.
#[derive(Debug, Error)]
pub enum SpeakerError {
    #[error("no speakers enrolled")]
    NoneEnrolled,

    #[error("speaker embedding is empty")]
    EmptyEmbedding,
}

/// Errors from the campaign knowledge store.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("invalid knowledge entry: {0}")]
    InvalidEntry(String),

    #[error("store error: {0}")]
    Store(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_display() {
        let err = EngineError::ModelLoad("ggml-base.en.bin not found".to_string());
        assert_eq!(
            err.to_string(),
            "failed to load model: ggml-base.en.bin not found"
        );
    }

    #[test]
    fn speaker_error_display() {
        assert_eq!(SpeakerError::NoneEnrolled.to_string(), "no speakers enrolled");
    }

    #[test]
    fn knowledge_error_display() {
        let err = KnowledgeError::InvalidEntry("id and content required".to_string());
        assert!(err.to_string().contains("id and content required"));
    }
}
