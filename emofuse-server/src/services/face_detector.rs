//! Face emotion detection
//!
//! The Visual adapter talks to a detector through [`FaceEmotionDetector`].
//! The shipped implementation is an HTTP client for a DeepFace-style
//! analysis service; tests substitute their own.

use async_trait::async_trait;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::{AdapterError, AdapterResult, Frame};

/// Bounding box of a detected face, in image pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// One detected face
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FaceDetection {
    /// Raw emotion name as the detector spells it ("happy", "angry", ...)
    pub dominant_emotion: String,
    #[serde(default)]
    pub region: Option<FaceRegion>,
}

/// Face emotion detector
///
/// Returns every face found in the frame, in the detector's order. An empty
/// vector means the detector ran and saw no face.
#[async_trait]
pub trait FaceEmotionDetector: Send + Sync {
    /// Detector name for logs and diagnostics
    fn name(&self) -> &'static str;

    async fn detect(&self, frame: &Frame) -> AdapterResult<Vec<FaceDetection>>;
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    img_path: String,
    actions: [&'a str; 1],
    enforce_detection: bool,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    results: Vec<FaceDetection>,
}

/// HTTP face detector
///
/// `POST {base_url}/analyze` with the frame as a base64 data URI. The
/// service answers `{"results": [{"dominant_emotion": .., "region": ..}]}`.
#[derive(Clone)]
pub struct RemoteFaceDetector {
    base_url: String,
    http: reqwest::Client,
}

impl RemoteFaceDetector {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AdapterResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl FaceEmotionDetector for RemoteFaceDetector {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn detect(&self, frame: &Frame) -> AdapterResult<Vec<FaceDetection>> {
        let url = format!("{}/analyze", self.base_url);
        let encoded = base64::engine::general_purpose::STANDARD.encode(&frame.bytes);
        let body = AnalyzeRequest {
            img_path: format!("data:{};base64,{}", frame.mime(), encoded),
            actions: ["emotion"],
            enforce_detection: false,
        };

        tracing::debug!(url = %url, frame_bytes = frame.bytes.len(), "Querying face detector");

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AdapterError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AdapterError::Api(format!("{} {}", status.as_u16(), error_text)));
        }

        let parsed: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| AdapterError::Parse(format!("Failed to parse detector response: {}", e)))?;

        Ok(parsed.results)
    }
}

/// Stand-in used when no detector is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableDetector;

#[async_trait]
impl FaceEmotionDetector for UnavailableDetector {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn detect(&self, _frame: &Frame) -> AdapterResult<Vec<FaceDetection>> {
        Err(AdapterError::NotAvailable("detector not available".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parses_without_region() {
        let json = r#"{"results":[{"dominant_emotion":"happy"},{"dominant_emotion":"sad","region":{"x":1,"y":2,"w":30,"h":40}}]}"#;
        let parsed: AnalyzeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[0].dominant_emotion, "happy");
        assert!(parsed.results[0].region.is_none());
        assert_eq!(
            parsed.results[1].region,
            Some(FaceRegion { x: 1, y: 2, w: 30, h: 40 })
        );
    }

    #[test]
    fn test_empty_response_is_no_faces() {
        let parsed: AnalyzeResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
    }

    #[test]
    fn test_remote_strips_trailing_slash() {
        let detector = RemoteFaceDetector::new("http://localhost:5005/", Duration::from_secs(1)).unwrap();
        assert_eq!(detector.base_url, "http://localhost:5005");
    }

    #[tokio::test]
    async fn test_unavailable_detector_errors() {
        let err = UnavailableDetector
            .detect(&Frame::new(vec![1], None))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::NotAvailable(_)));
        assert!(err.to_string().contains("detector not available"));
    }
}
