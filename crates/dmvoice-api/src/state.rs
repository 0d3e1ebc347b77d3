//! Shared application state with lazily initialized model engines.
//!
//! Engines are expensive to load (model files, ONNX sessions), so each one
//! sits behind an async `OnceCell` and is initialized on first use. The
//! `--preload` flag forces them all up front. `/health` and `/status` only
//! observe the cells; they never trigger initialization.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use dmvoice_core::intent::IntentDetector;
use dmvoice_core::knowledge::KnowledgeService;
use dmvoice_core::speaker::SpeakerRegistry;
use dmvoice_infra::asr::WhisperTranscriber;
use dmvoice_infra::config::{load_config, resolve_data_dir};
use dmvoice_infra::embed::FastEmbedder;
use dmvoice_infra::speaker::OnnxSpeakerEncoder;
use dmvoice_infra::tts::HttpSynthesizer;
use dmvoice_infra::vector::{LanceKnowledgeStore, LanceStore};
use dmvoice_types::config::ServiceConfig;
use dmvoice_types::error::EngineError;

/// ECAPA-TDNN speaker embedding size.
const SPEAKER_EMBEDDING_DIMENSION: usize = 192;

type Knowledge = KnowledgeService<FastEmbedder, LanceKnowledgeStore>;

pub struct AppStateInner {
    pub data_dir: PathBuf,
    pub config: ServiceConfig,
    pub registry: SpeakerRegistry,

    whisper: OnceCell<Arc<WhisperTranscriber>>,
    embedder: OnceCell<Arc<FastEmbedder>>,
    speaker_encoder: OnceCell<Arc<OnnxSpeakerEncoder>>,
    intent: OnceCell<Arc<IntentDetector<FastEmbedder>>>,
    knowledge: OnceCell<Arc<Knowledge>>,
    synthesizer: OnceCell<Arc<HttpSynthesizer>>,
}

#[derive(Clone)]
pub struct AppState(Arc<AppStateInner>);

impl std::ops::Deref for AppState {
    type Target = AppStateInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Which engines have been initialized, reported by `/health`.
pub struct EngineReadiness {
    pub whisper: bool,
    pub embeddings: bool,
    pub knowledge: bool,
    pub speaker: bool,
    pub tts: bool,
}

impl AppState {
    /// Resolve the data directory, load config, and build empty engine cells.
    pub async fn init(data_dir: Option<PathBuf>) -> Self {
        let data_dir = data_dir.unwrap_or_else(resolve_data_dir);
        let config = load_config(&data_dir).await;
        Self::with_config(data_dir, config)
    }

    pub fn with_config(data_dir: PathBuf, config: ServiceConfig) -> Self {
        Self(Arc::new(AppStateInner {
            data_dir,
            config,
            registry: SpeakerRegistry::new(),
            whisper: OnceCell::new(),
            embedder: OnceCell::new(),
            speaker_encoder: OnceCell::new(),
            intent: OnceCell::new(),
            knowledge: OnceCell::new(),
            synthesizer: OnceCell::new(),
        }))
    }

    /// Resolve a configured model path against the data directory.
    fn model_path(&self, configured: &str) -> PathBuf {
        let path = Path::new(configured);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    pub async fn whisper(&self) -> Result<Arc<WhisperTranscriber>, EngineError> {
        self.0
            .whisper
            .get_or_try_init(|| async {
                let path = self.model_path(&self.config.models.whisper_model_path);
                let language = self.config.models.language.clone();
                let transcriber =
                    tokio::task::spawn_blocking(move || WhisperTranscriber::new(&path, &language))
                        .await
                        .map_err(|e| EngineError::ModelLoad(format!("whisper load join: {e}")))??;
                Ok(Arc::new(transcriber))
            })
            .await
            .cloned()
    }

    pub async fn embedder(&self) -> Result<Arc<FastEmbedder>, EngineError> {
        self.0
            .embedder
            .get_or_try_init(|| async {
                let cache_dir = self.data_dir.join("models");
                let embedder = tokio::task::spawn_blocking(move || {
                    FastEmbedder::new(Some(cache_dir))
                })
                .await
                .map_err(|e| EngineError::ModelLoad(format!("embedder load join: {e}")))??;
                Ok(Arc::new(embedder))
            })
            .await
            .cloned()
    }

    pub async fn speaker_encoder(&self) -> Result<Arc<OnnxSpeakerEncoder>, EngineError> {
        self.0
            .speaker_encoder
            .get_or_try_init(|| async {
                let path = self.model_path(&self.config.models.speaker_model_path);
                let encoder = tokio::task::spawn_blocking(move || {
                    OnnxSpeakerEncoder::new(&path, SPEAKER_EMBEDDING_DIMENSION)
                })
                .await
                .map_err(|e| EngineError::ModelLoad(format!("speaker load join: {e}")))??;
                Ok(Arc::new(encoder))
            })
            .await
            .cloned()
    }

    pub async fn intent(&self) -> Result<Arc<IntentDetector<FastEmbedder>>, EngineError> {
        self.0
            .intent
            .get_or_try_init(|| async {
                let embedder = self.embedder().await?;
                Ok(Arc::new(IntentDetector::new(embedder)))
            })
            .await
            .cloned()
    }

    pub async fn knowledge(&self) -> Result<Arc<Knowledge>, EngineError> {
        self.0
            .knowledge
            .get_or_try_init(|| async {
                let embedder = self.embedder().await?;
                let store = LanceStore::new(self.data_dir.join("vector_store"))
                    .await
                    .map_err(|e| EngineError::ModelLoad(format!("vector store: {e}")))?;
                let store = Arc::new(LanceKnowledgeStore::new(store));
                Ok(Arc::new(KnowledgeService::new(embedder, store)))
            })
            .await
            .cloned()
    }

    pub async fn synthesizer(&self) -> Result<Arc<HttpSynthesizer>, EngineError> {
        self.0
            .synthesizer
            .get_or_try_init(|| async {
                let synth = HttpSynthesizer::new(&self.config.models.tts_endpoint)?;
                Ok(Arc::new(synth))
            })
            .await
            .cloned()
    }

    /// Snapshot of which engines are initialized, without initializing any.
    pub fn readiness(&self) -> EngineReadiness {
        EngineReadiness {
            whisper: self.0.whisper.initialized(),
            embeddings: self.0.embedder.initialized(),
            knowledge: self.0.knowledge.initialized(),
            speaker: self.0.speaker_encoder.initialized(),
            tts: self.0.synthesizer.initialized(),
        }
    }

    /// Knowledge entry count if the store is already initialized, else 0.
    pub async fn knowledge_entries(&self) -> u64 {
        match self.0.knowledge.get() {
            Some(service) => service.count().await.unwrap_or(0),
            None => 0,
        }
    }

    /// Whisper model name: the loaded engine's if available, otherwise the
    /// configured file name.
    pub fn whisper_model_name(&self) -> String {
        use dmvoice_core::asr::SpeechToText;
        if let Some(whisper) = self.0.whisper.get() {
            return whisper.model_name().to_string();
        }
        Path::new(&self.config.models.whisper_model_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.config.models.whisper_model_path.clone())
    }

    /// Initialize every engine up front (`--preload`).
    pub async fn preload(&self) -> Result<(), EngineError> {
        info!("preloading engines");
        self.whisper().await?;
        self.embedder().await?;
        self.speaker_encoder().await?;
        self.knowledge().await?;
        self.synthesizer().await?;
        self.intent().await?;
        info!("all engines ready");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::with_config(PathBuf::from("/tmp/dmvoice-test"), ServiceConfig::default())
    }

    #[test]
    fn nothing_initialized_at_startup() {
        let state = state();
        let readiness = state.readiness();
        assert!(!readiness.whisper);
        assert!(!readiness.embeddings);
        assert!(!readiness.knowledge);
        assert!(!readiness.speaker);
        assert!(!readiness.tts);
    }

    #[tokio::test]
    async fn knowledge_entries_zero_without_initialization() {
        let state = state();
        assert_eq!(state.knowledge_entries().await, 0);
        assert!(!state.readiness().knowledge);
    }

    #[test]
    fn whisper_model_name_falls_back_to_config() {
        let state = state();
        assert_eq!(state.whisper_model_name(), "ggml-base.en.bin");
    }

    #[test]
    fn relative_model_paths_resolve_under_data_dir() {
        let state = state();
        assert_eq!(
            state.model_path("models/ggml-base.en.bin"),
            PathBuf::from("/tmp/dmvoice-test/models/ggml-base.en.bin")
        );
        assert_eq!(
            state.model_path("/opt/models/x.bin"),
            PathBuf::from("/opt/models/x.bin")
        );
    }
}
