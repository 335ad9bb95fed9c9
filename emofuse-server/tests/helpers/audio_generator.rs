//! Audio Test Fixture Generator
//!
//! In-memory WAV clips of a chosen length

use std::io::Cursor;

/// Configuration for generated audio
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 1.0,
            sample_rate: 16_000,
            channels: 1,
        }
    }
}

impl AudioConfig {
    pub fn seconds(duration_seconds: f64) -> Self {
        Self {
            duration_seconds,
            ..Default::default()
        }
    }
}

/// Encode a 440 Hz tone as 16-bit PCM WAV bytes
pub fn generate_wav_bytes(config: &AudioConfig) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        let total_frames = (config.duration_seconds * config.sample_rate as f64) as usize;

        for i in 0..total_frames {
            let t = i as f32 / config.sample_rate as f32;
            let sample =
                (0.3 * (2.0 * std::f32::consts::PI * 440.0 * t).sin() * i16::MAX as f32) as i16;
            for _ in 0..config.channels {
                writer.write_sample(sample).unwrap();
            }
        }

        writer.finalize().unwrap();
    }
    cursor.into_inner()
}
