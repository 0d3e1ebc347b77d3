//! Infrastructure implementations for dmvoice.
//!
//! Everything that touches a model file, the filesystem, or the network
//! lives here: audio decoding, whisper.cpp transcription, fastembed text
//! embeddings, the ONNX speaker encoder, the LanceDB knowledge store, and
//! the HTTP synthesis sidecar client. The traits these satisfy are defined
//! in `dmvoice-core`.

pub mod asr;
pub mod audio;
pub mod config;
pub mod embed;
pub mod speaker;
pub mod tts;
pub mod vector;
