//! Base64/WAV audio payload decoding.
//!
//! Requests carry audio as base64-encoded WAV. Decoding tolerates data-URL
//! prefixes (`data:audio/wav;base64,...`) and embedded whitespace, downmixes
//! multi-channel audio to mono, and resamples to the service rate so every
//! engine sees the same input shape.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use tracing::debug;

use dmvoice_types::audio::AudioClip;
use dmvoice_types::error::AudioError;

/// Decode a base64 payload into raw bytes.
///
/// Accepts a bare base64 string or a data URL; whitespace (newlines from
/// JSON pretty-printers) is stripped before decoding.
pub fn decode_base64_audio(payload: &str) -> Result<Vec<u8>, AudioError> {
    let trimmed = payload.trim();
    let encoded = trimmed
        .split_once("base64,")
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed);

    let cleaned: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return Err(AudioError::Empty);
    }

    BASE64_STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| AudioError::InvalidBase64(e.to_string()))
}

/// Decode WAV bytes into mono f32 samples normalized to [-1.0, 1.0].
pub fn decode_wav(bytes: &[u8]) -> Result<AudioClip, AudioError> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| AudioError::UnsupportedFormat(e.to_string()))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| AudioError::UnsupportedFormat(e.to_string()))?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| AudioError::UnsupportedFormat(e.to_string()))?
        }
    };

    let samples = downmix(&samples, spec.channels as usize);
    if samples.is_empty() {
        return Err(AudioError::Empty);
    }

    Ok(AudioClip {
        samples,
        sample_rate: spec.sample_rate,
    })
}

/// Average interleaved channels down to mono.
fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Linear-interpolation resample.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = ((samples.len() as f64) / ratio).floor() as usize;
    let mut out = Vec::with_capacity(out_len);

    for i in 0..out_len {
        let src = i as f64 * ratio;
        let idx = src.floor() as usize;
        let frac = (src - idx as f64) as f32;
        let a = samples[idx];
        let b = samples.get(idx + 1).copied().unwrap_or(a);
        out.push(a + (b - a) * frac);
    }

    out
}

/// Decode a base64 WAV payload into a clip at the target sample rate.
pub fn decode_clip(payload: &str, target_rate: u32) -> Result<AudioClip, AudioError> {
    let bytes = decode_base64_audio(payload)?;
    let clip = decode_wav(&bytes)?;

    if clip.sample_rate == target_rate {
        return Ok(clip);
    }

    debug!(
        from = clip.sample_rate,
        to = target_rate,
        "resampling audio payload"
    );
    let samples = resample(&clip.samples, clip.sample_rate, target_rate);
    Ok(AudioClip {
        samples,
        sample_rate: target_rate,
    })
}
