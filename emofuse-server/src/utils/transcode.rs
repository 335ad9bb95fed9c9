//! ffmpeg transcoding for containers the decoder can't read
//!
//! Browser recordings arrive as WebM/Opus. They are converted to 16 kHz
//! mono 16-bit WAV, which [`super::audio_decoder`] handles natively.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::types::{AdapterError, AdapterResult};

/// Sample rate of the transcoded WAV
pub const TRANSCODE_SAMPLE_RATE: u32 = 16_000;

/// External ffmpeg invocation with a hard timeout
#[derive(Debug, Clone)]
pub struct Transcoder {
    ffmpeg_path: PathBuf,
    timeout: Duration,
}

impl Transcoder {
    pub fn new(ffmpeg_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout,
        }
    }

    /// Convert `input` to WAV at `output`
    ///
    /// The child is killed if the timeout elapses or the future is dropped.
    pub async fn to_wav(&self, input: &Path, output: &Path) -> AdapterResult<()> {
        debug!(
            input = %input.display(),
            output = %output.display(),
            "Transcoding audio to WAV"
        );

        let sample_rate = TRANSCODE_SAMPLE_RATE.to_string();
        let child = Command::new(&self.ffmpeg_path)
            .arg("-hide_banner")
            .args(["-loglevel", "error"])
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-ar", sample_rate.as_str()])
            .args(["-ac", "1"])
            .args(["-c:a", "pcm_s16le"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AdapterError::Transcode(format!(
                    "failed to start {}: {}",
                    self.ffmpeg_path.display(),
                    e
                ))
            })?;

        let result = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                AdapterError::Transcode(format!(
                    "ffmpeg timed out after {}s",
                    self.timeout.as_secs()
                ))
            })??;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(AdapterError::Transcode(format!(
                "ffmpeg exited with {}: {}",
                result.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}
