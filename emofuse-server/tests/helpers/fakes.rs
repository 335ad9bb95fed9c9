//! Scripted collaborators and app wiring for tests

use async_trait::async_trait;
use emofuse_common::events::EventBus;
use emofuse_server::adapters::{AudioFormatPolicy, SpeechAdapter, TextAdapter, VisualAdapter};
use emofuse_server::orchestrator::Orchestrator;
use emofuse_server::services::{
    DurationHeuristic, FaceDetection, FaceEmotionDetector, KeywordClassifier,
    PassthroughTranslator, SpeechAffectModel,
};
use emofuse_server::state::{visual_label_cell, VisualLabelReader, VisualLabelWriter};
use emofuse_server::types::{AdapterError, AdapterResult, Frame};
use emofuse_server::utils::{DecodedAudio, Transcoder};
use emofuse_server::AppState;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// ffmpeg path that never exists, so WebM input always fails to transcode
pub const MISSING_FFMPEG: &str = "/nonexistent/emofuse-test/ffmpeg";

/// Detector that reports the same emotion for every frame
pub struct FixedDetector(pub &'static str);

#[async_trait]
impl FaceEmotionDetector for FixedDetector {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn detect(&self, _frame: &Frame) -> AdapterResult<Vec<FaceDetection>> {
        Ok(vec![FaceDetection {
            dominant_emotion: self.0.to_string(),
            region: None,
        }])
    }
}

/// Speech model that always fails
pub struct FailingModel;

#[async_trait]
impl SpeechAffectModel for FailingModel {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn estimate(&self, _audio: &DecodedAudio) -> AdapterResult<String> {
        Err(AdapterError::Internal("model weights missing".to_string()))
    }
}

/// Speech model that panics
pub struct PanickingModel;

#[async_trait]
impl SpeechAffectModel for PanickingModel {
    fn name(&self) -> &'static str {
        "panicking"
    }

    async fn estimate(&self, _audio: &DecodedAudio) -> AdapterResult<String> {
        panic!("speech model exploded");
    }
}

pub fn speech_adapter(model: Arc<dyn SpeechAffectModel>, scratch_root: &Path) -> SpeechAdapter {
    SpeechAdapter::new(
        model,
        Transcoder::new(MISSING_FFMPEG, Duration::from_secs(5)),
        AudioFormatPolicy::default(),
        Some(scratch_root.to_path_buf()),
    )
}

/// Orchestrator wired with the given detector and speech model
pub struct TestRig {
    pub orchestrator: Arc<Orchestrator>,
    pub event_bus: EventBus,
    pub reader: VisualLabelReader,
    /// Write half when streaming mode is simulated
    pub writer: Option<VisualLabelWriter>,
    pub scratch: tempfile::TempDir,
}

impl TestRig {
    pub fn new(detector: Arc<dyn FaceEmotionDetector>, model: Arc<dyn SpeechAffectModel>) -> Self {
        Self::build(detector, model, false)
    }

    pub fn streaming(
        detector: Arc<dyn FaceEmotionDetector>,
        model: Arc<dyn SpeechAffectModel>,
    ) -> Self {
        Self::build(detector, model, true)
    }

    fn build(
        detector: Arc<dyn FaceEmotionDetector>,
        model: Arc<dyn SpeechAffectModel>,
        streaming: bool,
    ) -> Self {
        let scratch = tempfile::tempdir().unwrap();
        let event_bus = EventBus::new(16);
        let (writer, reader) = visual_label_cell();

        let orchestrator = Orchestrator::new(
            VisualAdapter::new(detector),
            speech_adapter(model, scratch.path()),
            TextAdapter::new(Arc::new(PassthroughTranslator), Arc::new(KeywordClassifier)),
            streaming.then(|| reader.clone()),
            event_bus.clone(),
        );

        Self {
            orchestrator: Arc::new(orchestrator),
            event_bus,
            reader,
            writer: streaming.then_some(writer),
            scratch,
        }
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(
            Arc::clone(&self.orchestrator),
            self.reader.clone(),
            self.event_bus.clone(),
            10 * 1024 * 1024,
        )
    }

    /// Number of entries left in the speech scratch root
    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(self.scratch.path()).unwrap().count()
    }
}

/// Default rig: happy faces, duration heuristic
pub fn default_rig() -> TestRig {
    TestRig::new(
        Arc::new(FixedDetector("happy")),
        Arc::new(DurationHeuristic::default()),
    )
}
