//! Configuration loading and config file resolution
//!
//! Settings sources, highest priority first:
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file
//! 4. Built-in defaults (code constants)
//!
//! Tiers 1 and 2 are handled by the binary's argument parser. This module
//! owns the TOML schema and where the file is looked up. A missing TOML file
//! is never fatal: a warning is logged and built-in defaults apply.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Config file name looked up in the platform config directories
pub const CONFIG_FILE_NAME: &str = "emofuse.toml";

/// Bootstrap configuration loaded from TOML
///
/// Every section is optional; omitted keys take the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub audio: AudioConfig,

    #[serde(default)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub services: ServicesConfig,
}

/// HTTP listener
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request body limit for uploads (audio clip + image)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` overrides it
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Speech input handling
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AudioConfig {
    /// Parent directory for per-request scratch directories (system temp dir if unset)
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,

    /// ffmpeg executable used to transcode containers the decoder can't read
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    #[serde(default = "default_transcode_timeout_secs")]
    pub transcode_timeout_secs: u64,

    /// Extensions decoded directly
    #[serde(default = "default_native_extensions")]
    pub native_extensions: Vec<String>,

    /// Extensions transcoded to WAV before decoding
    #[serde(default = "default_transcode_extensions")]
    pub transcode_extensions: Vec<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            scratch_dir: None,
            ffmpeg_path: default_ffmpeg_path(),
            transcode_timeout_secs: default_transcode_timeout_secs(),
            native_extensions: default_native_extensions(),
            transcode_extensions: default_transcode_extensions(),
        }
    }
}

/// Streaming mode camera
///
/// Streaming mode is enabled iff `snapshot_url` is set.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CameraConfig {
    /// URL returning one encoded still image per GET
    #[serde(default)]
    pub snapshot_url: Option<String>,

    #[serde(default = "default_capture_interval_ms")]
    pub capture_interval_ms: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            snapshot_url: None,
            capture_interval_ms: default_capture_interval_ms(),
        }
    }
}

/// External inference services
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServicesConfig {
    /// Base URL of the face emotion detector (Visual adapter reports Error if unset)
    #[serde(default)]
    pub face_detector_url: Option<String>,

    /// Base URL of the translation service (text passes through untranslated if unset)
    #[serde(default)]
    pub translator_url: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            face_detector_url: None,
            translator_url: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_transcode_timeout_secs() -> u64 {
    30
}

fn default_native_extensions() -> Vec<String> {
    ["wav", "flac", "mp3", "ogg"].iter().map(|s| s.to_string()).collect()
}

fn default_transcode_extensions() -> Vec<String> {
    vec!["webm".to_string()]
}

fn default_capture_interval_ms() -> u64 {
    500
}

fn default_request_timeout_secs() -> u64 {
    20
}

impl TomlConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load from `path`, or from the platform default location when `None`
    ///
    /// A missing file yields defaults with a warning. An unreadable or
    /// malformed file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => {
                    info!("No {} found, using built-in defaults", CONFIG_FILE_NAME);
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            warn!(
                "Config file not found: {} (using built-in defaults)",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Locate the config file for the platform
///
/// Linux: `~/.config/emofuse/emofuse.toml`, then `/etc/emofuse/emofuse.toml`.
/// Elsewhere: the platform config dir only. `None` if nothing exists.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("emofuse").join(CONFIG_FILE_NAME));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/emofuse").join(CONFIG_FILE_NAME);
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}
