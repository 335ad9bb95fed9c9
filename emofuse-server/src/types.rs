//! Core Types for emofuse-server
//!
//! Inputs handed to the signal adapters and the error type every adapter
//! and external collaborator reports through.
//!
//! # Error policy
//! `AdapterError` never leaves an adapter. Each adapter converts it into an
//! `Error`-labelled [`SignalResult`](emofuse_common::SignalResult) with the
//! error text as diagnostic, so a failing modality is data, not an abort.

use thiserror::Error;

/// One encoded still image (JPEG/PNG) for the Visual modality
#[derive(Debug, Clone)]
pub struct Frame {
    /// Encoded image bytes as uploaded or fetched
    pub bytes: Vec<u8>,
    /// MIME type if known (e.g. "image/jpeg")
    pub content_type: Option<String>,
}

impl Frame {
    pub fn new(bytes: Vec<u8>, content_type: Option<String>) -> Self {
        Self { bytes, content_type }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// MIME type to report to the detector, JPEG if unknown
    pub fn mime(&self) -> &str {
        self.content_type.as_deref().unwrap_or("image/jpeg")
    }
}

/// One uploaded audio clip for the Speech modality
#[derive(Debug, Clone)]
pub struct AudioUpload {
    /// Client-side file name; its extension selects the decode route
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl AudioUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Lower-cased extension without the dot
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }
}

/// Result type for adapters and collaborators
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Adapter / collaborator error
#[derive(Debug, Error)]
pub enum AdapterError {
    /// I/O error (scratch file read/write)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Audio decoding failed
    #[error("Audio decoding error: {0}")]
    AudioDecode(String),

    /// External transcoder failed or timed out
    #[error("Transcode error: {0}")]
    Transcode(String),

    /// Input format not on the allowlist
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// External API returned an error status
    #[error("API error: {0}")]
    Api(String),

    /// Failed to parse response or data
    #[error("Parse error: {0}")]
    Parse(String),

    /// Collaborator not configured
    #[error("Not available: {0}")]
    NotAvailable(String),

    /// Internal processing error
    #[error("Internal error: {0}")]
    Internal(String),
}
