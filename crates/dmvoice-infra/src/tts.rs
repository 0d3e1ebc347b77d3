//! HTTP client for the speech-synthesis sidecar.
//!
//! Synthesis runs in a separate process exposing a `/synthesize` endpoint
//! that takes text and returns raw f32 samples with their sample rate.
//! This client packs the samples into a 16-bit WAV for the response.
//! An unreachable or unconfigured sidecar maps to `EngineError::Unavailable`.

use std::io::Cursor;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use dmvoice_core::tts::{SpeechSynthesizer, SynthesisRequest};
use dmvoice_types::error::EngineError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct HttpSynthesizer {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
struct SidecarRequest<'a> {
    text: &'a str,
    voice: &'a str,
    speed: f32,
}

#[derive(Deserialize)]
struct SidecarResponse {
    #[serde(default)]
    audio: Vec<f32>,
    #[serde(default)]
    sample_rate: u32,
    #[serde(default)]
    error: Option<String>,
}

impl HttpSynthesizer {
    /// Create a client for the sidecar at `endpoint`. An empty endpoint
    /// produces a client that always reports unavailable.
    pub fn new(endpoint: &str) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EngineError::ModelLoad(format!("http client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

impl SpeechSynthesizer for HttpSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, EngineError> {
        if self.endpoint.is_empty() {
            return Err(EngineError::Unavailable(
                "no synthesis endpoint configured".to_string(),
            ));
        }

        let url = format!("{}/synthesize", self.endpoint);
        let body = SidecarRequest {
            text: &request.text,
            voice: &request.voice,
            speed: request.speed,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::Unavailable(format!("synthesis sidecar: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Inference(format!(
                "synthesis sidecar returned {status}"
            )));
        }

        let parsed: SidecarResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Inference(format!("synthesis response: {e}")))?;

        if let Some(error) = parsed.error {
            return Err(EngineError::Inference(format!("synthesis failed: {error}")));
        }
        if parsed.audio.is_empty() || parsed.sample_rate == 0 {
            return Err(EngineError::Inference(
                "synthesis returned no audio".to_string(),
            ));
        }

        debug!(
            samples = parsed.audio.len(),
            sample_rate = parsed.sample_rate,
            "synthesis complete"
        );
        encode_wav(&parsed.audio, parsed.sample_rate)
    }
}

/// Pack f32 samples into a mono 16-bit PCM WAV file.
pub(crate) fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, EngineError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| EngineError::Inference(format!("wav encode: {e}")))?;
        for &s in samples {
            let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(v)
                .map_err(|e| EngineError::Inference(format!("wav encode: {e}")))?;
        }
        writer
            .finalize()
            .map_err(|e| EngineError::Inference(format!("wav encode: {e}")))?;
    }

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_endpoint_is_unavailable() {
        let synth = HttpSynthesizer::new("").unwrap();
        let request = SynthesisRequest {
            text: "Welcome, travelers.".to_string(),
            voice: "narrator".to_string(),
            speed: 1.0,
        };
        let result = synth.synthesize(&request).await;
        assert!(matches!(result, Err(EngineError::Unavailable(_))));
    }

    #[tokio::test]
    async fn unreachable_sidecar_is_unavailable() {
        // Port 1 is never listening locally
        let synth = HttpSynthesizer::new("http://127.0.0.1:1").unwrap();
        let request = SynthesisRequest {
            text: "Welcome.".to_string(),
            voice: "narrator".to_string(),
            speed: 1.0,
        };
        let result = synth.synthesize(&request).await;
        assert!(matches!(result, Err(EngineError::Unavailable(_))));
    }

    #[test]
    fn encode_wav_roundtrips_through_hound() {
        let samples = vec![0.0f32, 0.5, -0.5, 1.0, -1.0];
        let bytes = encode_wav(&samples, 22_050).unwrap();

        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 22_050);
        assert_eq!(reader.len(), 5);
    }

    #[test]
    fn encode_wav_clamps_out_of_range() {
        let bytes = encode_wav(&[2.0, -2.0], 16_000).unwrap();
        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, vec![i16::MAX, -i16::MAX]);
    }
}
