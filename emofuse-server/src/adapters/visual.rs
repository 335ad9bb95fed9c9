//! Visual adapter: face emotion from one still frame

use async_trait::async_trait;
use emofuse_common::{normalize_label, EmotionLabel, Modality, SignalResult};
use std::sync::Arc;
use tracing::{debug, warn};

use super::SignalAdapter;
use crate::services::FaceEmotionDetector;
use crate::types::Frame;

/// Diagnostic recorded when the detector sees nobody
pub const NO_FACE_DIAGNOSTIC: &str = "no face detected";

#[derive(Clone)]
pub struct VisualAdapter {
    detector: Arc<dyn FaceEmotionDetector>,
}

impl VisualAdapter {
    pub fn new(detector: Arc<dyn FaceEmotionDetector>) -> Self {
        Self { detector }
    }
}

#[async_trait]
impl SignalAdapter for VisualAdapter {
    type Input = Frame;

    fn modality(&self) -> Modality {
        Modality::Visual
    }

    /// Only the first detection counts; zero faces is `Neutral`
    async fn analyze_input(&self, frame: Frame) -> SignalResult {
        if frame.is_empty() {
            return SignalResult::no_data(Modality::Visual);
        }

        match self.detector.detect(&frame).await {
            Ok(faces) => {
                let face_count = faces.len();
                match faces.into_iter().next() {
                    None => SignalResult::new(
                        Modality::Visual,
                        EmotionLabel::Neutral,
                        NO_FACE_DIAGNOSTIC,
                    ),
                    Some(face) => {
                        let label = normalize_label(&face.dominant_emotion);
                        debug!(
                            modality = %Modality::Visual,
                            faces = face_count,
                            raw = %face.dominant_emotion,
                            label = %label,
                            "Face emotion detected"
                        );
                        SignalResult::new(Modality::Visual, label, face.dominant_emotion)
                    }
                }
            }
            Err(e) => {
                warn!(
                    modality = %Modality::Visual,
                    detector = self.detector.name(),
                    error = %e,
                    "Face detection failed"
                );
                SignalResult::failed(Modality::Visual, e.to_string())
            }
        }
    }
}
