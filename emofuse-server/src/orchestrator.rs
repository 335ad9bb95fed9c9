//! Request Orchestrator
//!
//! Drives one analysis request through
//! `Received -> Running -> Fusing -> Completed`, or to `Failed` on an
//! orchestrator-level fault (malformed request). Adapter faults never fail
//! the request; they arrive as `Error` labels and are fused like any other.
//!
//! The three adapters run as separate tasks so a panic in one is contained
//! to that modality.

use emofuse_common::events::{EmoEvent, EventBus};
use emofuse_common::{FusionOutcome, Modality, SignalResult};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::adapters::text::{LANG_STATUS_FAILED, LANG_STATUS_NONE, NO_INPUT_TEXT};
use crate::adapters::{SignalAdapter, SpeechAdapter, TextAdapter, TextSignal, VisualAdapter};
use crate::state::VisualLabelReader;
use crate::types::{AudioUpload, Frame};

/// Lifecycle phase of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPhase {
    Received,
    /// Adapters in flight
    Running,
    Fusing,
    Completed,
    Failed,
}

impl RequestPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestPhase::Completed | RequestPhase::Failed)
    }

    fn can_advance_to(self, next: RequestPhase) -> bool {
        use RequestPhase::*;
        match (self, next) {
            (Received, Running) | (Running, Fusing) | (Fusing, Completed) => true,
            (from, Failed) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestPhase::Received => "received",
            RequestPhase::Running => "running",
            RequestPhase::Fusing => "fusing",
            RequestPhase::Completed => "completed",
            RequestPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid request transition {from} -> {to}")]
pub struct InvalidTransition {
    pub from: RequestPhase,
    pub to: RequestPhase,
}

/// Identity and phase of one request
#[derive(Debug)]
pub struct RequestLifecycle {
    id: Uuid,
    phase: RequestPhase,
    started: Instant,
}

impl RequestLifecycle {
    pub fn received() -> Self {
        let id = Uuid::new_v4();
        debug!(request_id = %id, "Request received");
        Self {
            id,
            phase: RequestPhase::Received,
            started: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    pub fn advance(&mut self, next: RequestPhase) -> Result<(), InvalidTransition> {
        if !self.phase.can_advance_to(next) {
            return Err(InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        debug!(request_id = %self.id, from = %self.phase, to = %next, "Request phase");
        self.phase = next;
        Ok(())
    }

    /// Orchestrator-level fault
    pub fn fail(&mut self, reason: &str) {
        warn!(
            request_id = %self.id,
            phase = %self.phase,
            reason,
            "Request failed"
        );
        if !self.phase.is_terminal() {
            self.phase = RequestPhase::Failed;
        }
    }
}

/// Inputs of one request; every field may be absent
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub image: Option<Frame>,
    pub audio: Option<AudioUpload>,
    pub text: Option<String>,
}

/// Where the Visual label of a report came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualSource {
    /// The request's own image
    Upload,
    /// The shared streaming label
    Stream,
    /// Neither was available
    None,
}

/// Completed analysis
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub request_id: Uuid,
    pub outcome: FusionOutcome,
    pub translated_text: String,
    pub lang_status: String,
    pub visual_source: VisualSource,
}

pub struct Orchestrator {
    visual: Arc<VisualAdapter>,
    speech: Arc<SpeechAdapter>,
    text: Arc<TextAdapter>,
    /// Shared streaming label, `Some` iff streaming mode is active
    live_visual: Option<VisualLabelReader>,
    event_bus: EventBus,
}

impl Orchestrator {
    pub fn new(
        visual: VisualAdapter,
        speech: SpeechAdapter,
        text: TextAdapter,
        live_visual: Option<VisualLabelReader>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            visual: Arc::new(visual),
            speech: Arc::new(speech),
            text: Arc::new(text),
            live_visual,
            event_bus,
        }
    }

    pub fn streaming_enabled(&self) -> bool {
        self.live_visual.is_some()
    }

    /// Run all three modalities concurrently, then fuse
    pub async fn run(
        &self,
        mut lifecycle: RequestLifecycle,
        request: AnalysisRequest,
    ) -> Result<AnalysisReport, InvalidTransition> {
        let request_id = lifecycle.id();
        lifecycle.advance(RequestPhase::Running)?;

        let AnalysisRequest { image, audio, text } = request;
        let visual_source = match (&image, &self.live_visual) {
            (Some(_), _) => VisualSource::Upload,
            (None, Some(_)) => VisualSource::Stream,
            (None, None) => VisualSource::None,
        };

        let visual_task = {
            let adapter = Arc::clone(&self.visual);
            let live = self.live_visual.clone();
            tokio::spawn(async move {
                match (image, live) {
                    (Some(frame), _) => adapter.analyze(Some(frame)).await,
                    (None, Some(reader)) => {
                        let snapshot = reader.latest();
                        let diagnostic = match snapshot.updated_at {
                            Some(at) => format!("stream frame at {}", at.to_rfc3339()),
                            None => "stream initial value".to_string(),
                        };
                        SignalResult::new(Modality::Visual, snapshot.label, diagnostic)
                    }
                    (None, None) => SignalResult::no_data(Modality::Visual),
                }
            })
        };

        let speech_task = {
            let adapter = Arc::clone(&self.speech);
            tokio::spawn(async move { adapter.analyze(audio).await })
        };

        let submitted_text = text.clone();
        let text_task = {
            let adapter = Arc::clone(&self.text);
            tokio::spawn(async move { adapter.analyze_text(text).await })
        };

        let (visual, speech, text) = tokio::join!(visual_task, speech_task, text_task);

        let visual = contain(request_id, Modality::Visual, visual);
        let speech = contain(request_id, Modality::Speech, speech);
        let text = contain_text(request_id, submitted_text, text);

        lifecycle.advance(RequestPhase::Fusing)?;
        let TextSignal {
            signal: text_signal,
            translated_text,
            lang_status,
        } = text;
        let outcome = FusionOutcome::from_signals(visual, speech, text_signal);

        lifecycle.advance(RequestPhase::Completed)?;
        info!(
            request_id = %request_id,
            visual = %outcome.signal(Modality::Visual).label,
            speech = %outcome.signal(Modality::Speech).label,
            text = %outcome.signal(Modality::Text).label,
            final_emotion = %outcome.final_label,
            elapsed_ms = lifecycle.started.elapsed().as_millis() as u64,
            "Analysis completed"
        );

        self.event_bus.emit_lossy(EmoEvent::AnalysisCompleted {
            request_id,
            final_emotion: outcome.final_label.clone(),
            timestamp: chrono::Utc::now(),
        });

        Ok(AnalysisReport {
            request_id,
            outcome,
            translated_text,
            lang_status,
            visual_source,
        })
    }
}

/// Turn a crashed adapter task into that modality's `Error` result
fn contain(
    request_id: Uuid,
    modality: Modality,
    joined: Result<SignalResult, JoinError>,
) -> SignalResult {
    match joined {
        Ok(result) => result,
        Err(e) => {
            let reason = if e.is_panic() {
                "adapter panicked"
            } else {
                "adapter task cancelled"
            };
            warn!(request_id = %request_id, modality = %modality, error = %e, "{}", reason);
            SignalResult::failed(modality, reason)
        }
    }
}

/// Text counterpart of [`contain`]; echoes the submitted text like a failed
/// translation does
fn contain_text(
    request_id: Uuid,
    submitted: Option<String>,
    joined: Result<TextSignal, JoinError>,
) -> TextSignal {
    match joined {
        Ok(text) => text,
        Err(e) => {
            let signal = contain(request_id, Modality::Text, Err(e));
            match submitted {
                Some(text) if !text.trim().is_empty() => TextSignal {
                    signal,
                    translated_text: text,
                    lang_status: LANG_STATUS_FAILED.to_string(),
                },
                _ => TextSignal {
                    signal,
                    translated_text: NO_INPUT_TEXT.to_string(),
                    lang_status: LANG_STATUS_NONE.to_string(),
                },
            }
        }
    }
}
