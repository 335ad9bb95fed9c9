//! Speech adapter: affect from an uploaded audio clip
//!
//! **Pipeline:** allowlist check -> per-call scratch directory -> write
//! upload -> transcode (WebM only) -> decode to mono PCM -> affect model.
//!
//! The scratch directory is a [`tempfile::TempDir`]. It is closed
//! explicitly on the normal path so removal failures can be logged; on any
//! early return, panic or cancellation its `Drop` removes it instead.

use async_trait::async_trait;
use emofuse_common::config::AudioConfig;
use emofuse_common::{normalize_label, Modality, SignalResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tracing::{debug, warn};

use super::SignalAdapter;
use crate::services::SpeechAffectModel;
use crate::types::{AdapterError, AdapterResult, AudioUpload};
use crate::utils::{decode_audio_file, DecodedAudio, Transcoder};

/// Prefix of per-call scratch directories
pub const SCRATCH_PREFIX: &str = "emofuse-speech-";

/// How an allowed extension reaches the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioRoute {
    /// Decoded directly
    Native,
    /// Transcoded to WAV first
    Transcode,
}

/// Extension allowlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFormatPolicy {
    native: Vec<String>,
    transcode: Vec<String>,
}

impl AudioFormatPolicy {
    pub fn new<I, J, S, T>(native: I, transcode: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let clean = |s: &str| s.trim().trim_start_matches('.').to_ascii_lowercase();
        Self {
            native: native.into_iter().map(|s| clean(s.as_ref())).collect(),
            transcode: transcode.into_iter().map(|s| clean(s.as_ref())).collect(),
        }
    }

    pub fn from_config(config: &AudioConfig) -> Self {
        Self::new(&config.native_extensions, &config.transcode_extensions)
    }

    /// Route for a lower-case extension, `None` if not allowed
    pub fn route(&self, extension: &str) -> Option<AudioRoute> {
        if self.native.iter().any(|e| e == extension) {
            Some(AudioRoute::Native)
        } else if self.transcode.iter().any(|e| e == extension) {
            Some(AudioRoute::Transcode)
        } else {
            None
        }
    }
}

impl Default for AudioFormatPolicy {
    fn default() -> Self {
        Self::from_config(&AudioConfig::default())
    }
}

pub struct SpeechAdapter {
    model: Arc<dyn SpeechAffectModel>,
    transcoder: Transcoder,
    policy: AudioFormatPolicy,
    /// Parent of scratch directories; system temp dir if `None`
    scratch_root: Option<PathBuf>,
}

impl SpeechAdapter {
    pub fn new(
        model: Arc<dyn SpeechAffectModel>,
        transcoder: Transcoder,
        policy: AudioFormatPolicy,
        scratch_root: Option<PathBuf>,
    ) -> Self {
        Self {
            model,
            transcoder,
            policy,
            scratch_root,
        }
    }

    pub fn from_config(model: Arc<dyn SpeechAffectModel>, config: &AudioConfig) -> Self {
        Self::new(
            model,
            Transcoder::new(
                &config.ffmpeg_path,
                Duration::from_secs(config.transcode_timeout_secs),
            ),
            AudioFormatPolicy::from_config(config),
            config.scratch_dir.clone(),
        )
    }

    fn create_scratch(&self) -> AdapterResult<TempDir> {
        let dir = match &self.scratch_root {
            Some(root) => tempfile::Builder::new()
                .prefix(SCRATCH_PREFIX)
                .tempdir_in(root)?,
            None => tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir()?,
        };
        Ok(dir)
    }

    async fn estimate(&self, upload: &AudioUpload) -> AdapterResult<(String, f64)> {
        let extension = upload.extension().ok_or_else(|| {
            AdapterError::UnsupportedFormat(format!("no file extension on '{}'", upload.file_name))
        })?;
        let route = self
            .policy
            .route(&extension)
            .ok_or_else(|| AdapterError::UnsupportedFormat(format!(".{}", extension)))?;

        let scratch = self.create_scratch()?;
        let decoded = self
            .decode_in(scratch.path(), &extension, route, upload)
            .await;

        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            warn!(
                path = %scratch_path.display(),
                error = %e,
                "Failed to remove speech scratch directory"
            );
        }

        let audio = decoded?;
        let raw = self.model.estimate(&audio).await?;
        Ok((raw, audio.duration_seconds))
    }

    async fn decode_in(
        &self,
        dir: &Path,
        extension: &str,
        route: AudioRoute,
        upload: &AudioUpload,
    ) -> AdapterResult<DecodedAudio> {
        let input_path = dir.join(format!("input.{}", extension));
        tokio::fs::write(&input_path, &upload.bytes).await?;

        let decode_path = match route {
            AudioRoute::Native => input_path,
            AudioRoute::Transcode => {
                let wav_path = dir.join("transcoded.wav");
                self.transcoder.to_wav(&input_path, &wav_path).await?;
                wav_path
            }
        };

        tokio::task::spawn_blocking(move || decode_audio_file(&decode_path))
            .await
            .map_err(|e| AdapterError::Internal(format!("decoder task failed: {}", e)))?
    }
}

#[async_trait]
impl SignalAdapter for SpeechAdapter {
    type Input = AudioUpload;

    fn modality(&self) -> Modality {
        Modality::Speech
    }

    async fn analyze_input(&self, upload: AudioUpload) -> SignalResult {
        if upload.bytes.is_empty() || upload.file_name.trim().is_empty() {
            return SignalResult::no_data(Modality::Speech);
        }

        match self.estimate(&upload).await {
            Ok((raw, duration_seconds)) => {
                let label = normalize_label(&raw);
                debug!(
                    modality = %Modality::Speech,
                    model = self.model.name(),
                    raw = %raw,
                    label = %label,
                    duration_seconds,
                    "Speech affect estimated"
                );
                SignalResult::new(
                    Modality::Speech,
                    label,
                    format!("{} ({:.2}s)", raw, duration_seconds),
                )
            }
            Err(e) => {
                warn!(
                    modality = %Modality::Speech,
                    file = %upload.file_name,
                    error = %e,
                    "Speech analysis failed"
                );
                SignalResult::failed(Modality::Speech, e.to_string())
            }
        }
    }
}
