//! Wiring: build adapters, orchestrator and the optional streaming loop
//! from resolved configuration.

use emofuse_common::config::TomlConfig;
use emofuse_common::events::EventBus;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::adapters::{SpeechAdapter, TextAdapter, VisualAdapter};
use crate::orchestrator::Orchestrator;
use crate::services::{
    DurationHeuristic, FaceEmotionDetector, KeywordClassifier, PassthroughTranslator,
    RemoteFaceDetector, RemoteTranslator, SnapshotFrameSource, Translator, UnavailableDetector,
};
use crate::state::visual_label_cell;
use crate::streaming::VisualStream;
use crate::types::AdapterResult;
use crate::AppState;

/// Events buffered per SSE subscriber
pub const EVENT_BUS_CAPACITY: usize = 100;

/// Everything `main` needs to start serving
pub struct Bootstrap {
    pub state: AppState,
    /// Present iff a camera is configured; spawn it with a cancellation token
    pub stream: Option<VisualStream>,
}

pub fn bootstrap(config: &TomlConfig) -> AdapterResult<Bootstrap> {
    let timeout = Duration::from_secs(config.services.request_timeout_secs);
    let event_bus = EventBus::new(EVENT_BUS_CAPACITY);

    let detector: Arc<dyn FaceEmotionDetector> = match &config.services.face_detector_url {
        Some(url) => {
            info!(url = %url, "Face detector: remote");
            Arc::new(RemoteFaceDetector::new(url, timeout)?)
        }
        None => {
            warn!("No face detector configured, visual analysis will report Error");
            Arc::new(UnavailableDetector)
        }
    };

    let translator: Arc<dyn Translator> = match &config.services.translator_url {
        Some(url) => {
            info!(url = %url, "Translator: remote");
            Arc::new(RemoteTranslator::new(url, timeout)?)
        }
        None => {
            info!("No translator configured, text is classified untranslated");
            Arc::new(PassthroughTranslator)
        }
    };

    let visual = VisualAdapter::new(detector);
    let speech = SpeechAdapter::from_config(Arc::new(DurationHeuristic::default()), &config.audio);
    let text = TextAdapter::new(translator, Arc::new(KeywordClassifier));

    let (writer, reader) = visual_label_cell();
    let stream = match &config.camera.snapshot_url {
        Some(url) => {
            info!(
                url = %url,
                interval_ms = config.camera.capture_interval_ms,
                "Streaming mode enabled"
            );
            let source = SnapshotFrameSource::new(url, timeout)?;
            Some(VisualStream::new(
                Arc::new(source),
                visual.clone(),
                writer,
                event_bus.clone(),
                Duration::from_millis(config.camera.capture_interval_ms),
            ))
        }
        None => {
            info!("Streaming mode disabled (no camera snapshot URL)");
            None
        }
    };

    let live_visual = stream.as_ref().map(|_| reader.clone());
    let orchestrator = Orchestrator::new(visual, speech, text, live_visual, event_bus.clone());
    let state = AppState::new(
        Arc::new(orchestrator),
        reader,
        event_bus,
        config.server.max_upload_bytes,
    );

    Ok(Bootstrap { state, stream })
}
