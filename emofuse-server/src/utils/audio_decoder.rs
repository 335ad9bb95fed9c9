//! Audio Decoding Utilities
//!
//! Decodes an uploaded clip to mono f32 PCM for the speech-affect model.
//! Uses symphonia for format-agnostic decoding (WAV, FLAC, MP3, OGG/Vorbis).
//! Containers symphonia can't read (WebM/Opus) are transcoded to WAV first,
//! see [`super::transcode`].

use std::path::Path;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

use crate::types::{AdapterError, AdapterResult};

/// Decoded audio result
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Mono audio samples (f32, range [-1.0, 1.0])
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Original channel count
    pub channels: usize,
    /// Duration in seconds
    pub duration_seconds: f64,
}

impl DecodedAudio {
    /// Build from mono samples, deriving the duration
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32, channels: usize) -> Self {
        let duration_seconds = if sample_rate == 0 {
            0.0
        } else {
            samples.len() as f64 / sample_rate as f64
        };
        Self {
            samples,
            sample_rate,
            channels,
            duration_seconds,
        }
    }
}

/// Decode audio file to mono f32 PCM samples
///
/// **Algorithm:**
/// 1. Probe format using the file extension as hint
/// 2. Decode every packet of the first audio track
/// 3. Average all channels to mono
///
/// Blocking; call from `spawn_blocking` inside async code.
///
/// # Errors
/// * `AdapterError::Io` if the file can't be opened
/// * `AdapterError::AudioDecode` for unknown formats or corrupt data
pub fn decode_audio_file(file_path: &Path) -> AdapterResult<DecodedAudio> {
    tracing::debug!(path = %file_path.display(), "Decoding audio file");

    let file = std::fs::File::open(file_path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = file_path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| AdapterError::AudioDecode(format!("Failed to probe audio: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AdapterError::AudioDecode("No audio track found".to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| AdapterError::AudioDecode("Sample rate unknown".to_string()))?;
    let channel_count = track
        .codec_params
        .channels
        .map(|c| c.count())
        .unwrap_or(1);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AdapterError::AudioDecode(format!("Failed to create decoder: {}", e)))?;

    let mut all_samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => {
                return Err(AdapterError::AudioDecode(format!("Error reading packet: {}", e)));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| AdapterError::AudioDecode(format!("Failed to decode packet: {}", e)))?;

        all_samples.extend(convert_to_mono_f32(&decoded));
    }

    let audio = DecodedAudio::from_mono(all_samples, sample_rate, channel_count);

    tracing::debug!(
        path = %file_path.display(),
        total_samples = audio.samples.len(),
        duration_seconds = format!("{:.2}", audio.duration_seconds),
        "Audio decoding complete"
    );

    Ok(audio)
}

/// Convert any decoded buffer to mono f32 by averaging channels
fn convert_to_mono_f32(decoded: &AudioBufferRef) -> Vec<f32> {
    match decoded {
        AudioBufferRef::F32(buf) => mix_to_mono(&**buf, |s| s),
        AudioBufferRef::F64(buf) => mix_to_mono(&**buf, f32::from_sample),
        AudioBufferRef::U8(buf) => mix_to_mono(&**buf, f32::from_sample),
        AudioBufferRef::U16(buf) => mix_to_mono(&**buf, f32::from_sample),
        AudioBufferRef::U24(buf) => mix_to_mono(&**buf, f32::from_sample),
        AudioBufferRef::U32(buf) => mix_to_mono(&**buf, f32::from_sample),
        AudioBufferRef::S8(buf) => mix_to_mono(&**buf, f32::from_sample),
        AudioBufferRef::S16(buf) => mix_to_mono(&**buf, f32::from_sample),
        AudioBufferRef::S24(buf) => mix_to_mono(&**buf, f32::from_sample),
        AudioBufferRef::S32(buf) => mix_to_mono(&**buf, f32::from_sample),
    }
}

fn mix_to_mono<S, F>(buf: &AudioBuffer<S>, to_f32: F) -> Vec<f32>
where
    S: Sample,
    F: Fn(S) -> f32,
{
    let num_channels = buf.spec().channels.count();
    if num_channels == 0 {
        return Vec::new();
    }

    (0..buf.frames())
        .map(|frame_idx| {
            let sum: f32 = (0..num_channels)
                .map(|ch| to_f32(buf.chan(ch)[frame_idx]))
                .sum();
            sum / num_channels as f32
        })
        .collect()
}
