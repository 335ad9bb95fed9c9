//! Camera frames for streaming mode

use async_trait::async_trait;
use std::time::Duration;

use crate::types::{AdapterError, AdapterResult, Frame};

/// Source of successive still frames
#[async_trait]
pub trait FrameSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Capture the next frame. An error means "no frame this time"; the
    /// caller decides whether to retry.
    async fn next_frame(&self) -> AdapterResult<Frame>;
}

/// IP camera exposing a still-image URL (one JPEG per GET)
#[derive(Clone)]
pub struct SnapshotFrameSource {
    url: String,
    http: reqwest::Client,
}

impl SnapshotFrameSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> AdapterResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::Network(e.to_string()))?;

        Ok(Self {
            url: url.into(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FrameSource for SnapshotFrameSource {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    async fn next_frame(&self) -> AdapterResult<Frame> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AdapterError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::Api(format!("camera returned {}", status.as_u16())));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AdapterError::Network(e.to_string()))?;

        if bytes.is_empty() {
            return Err(AdapterError::Api("camera returned an empty frame".to_string()));
        }

        Ok(Frame::new(bytes.to_vec(), content_type))
    }
}
