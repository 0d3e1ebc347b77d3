//! Audio and transcription domain types.

use serde::{Deserialize, Serialize};

/// Sample rate every model engine expects. Payloads at other rates are
/// resampled on decode.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// A decoded audio payload: mono PCM, f32 normalized to [-1.0, 1.0].
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioClip {
    /// Duration of the clip in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// One timed segment of a transcript. Times are in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub id: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Result of a speech-to-text run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub segments: Vec<TranscriptSegment>,
    pub language: String,
}

/// Options forwarded to the speech-to-text engine.
#[derive(Debug, Clone, Default)]
pub struct TranscribeOptions {
    /// Domain context fed to the model as its initial prompt
    /// (e.g. campaign names and jargon that bias decoding).
    pub initial_prompt: Option<String>,
    /// ISO 639-1 language hint. None lets the engine default apply.
    pub language: Option<String>,
}
