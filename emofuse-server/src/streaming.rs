//! Streaming mode: continuous visual analysis
//!
//! One background task pulls a frame, runs the Visual adapter and publishes
//! the label to the shared cell, forever, until cancelled. A failed frame
//! read keeps the previous label and retries after one second. Each analysis
//! runs in its own task; a panicking detector publishes `Error` for that
//! cycle and the loop carries on.

use emofuse_common::events::{EmoEvent, EventBus};
use emofuse_common::{EmotionLabel, Modality};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::adapters::{SignalAdapter, VisualAdapter};
use crate::services::FrameSource;
use crate::state::VisualLabelWriter;

/// Delay before retrying after a failed frame read
pub const READ_RETRY_DELAY: Duration = Duration::from_secs(1);

pub struct VisualStream {
    source: Arc<dyn FrameSource>,
    adapter: Arc<VisualAdapter>,
    writer: VisualLabelWriter,
    event_bus: EventBus,
    interval: Duration,
    retry_delay: Duration,
}

impl VisualStream {
    pub fn new(
        source: Arc<dyn FrameSource>,
        adapter: VisualAdapter,
        writer: VisualLabelWriter,
        event_bus: EventBus,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            adapter: Arc::new(adapter),
            writer,
            event_bus,
            interval,
            retry_delay: READ_RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Run until `cancel` fires
    pub async fn run(self, cancel: CancellationToken) {
        info!(
            source = self.source.name(),
            interval_ms = self.interval.as_millis() as u64,
            "Visual stream started"
        );

        loop {
            let delay = tokio::select! {
                _ = cancel.cancelled() => break,
                delay = self.step() => delay,
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!("Visual stream stopped");
    }

    /// One capture/analyze/publish cycle; returns the delay before the next
    pub async fn step(&self) -> Duration {
        let frame = match self.source.next_frame().await {
            Ok(frame) if !frame.is_empty() => frame,
            Ok(_) => {
                warn!(source = self.source.name(), "Empty frame, retrying");
                return self.retry_delay;
            }
            Err(e) => {
                warn!(source = self.source.name(), error = %e, "Frame read failed, retrying");
                return self.retry_delay;
            }
        };

        let adapter = Arc::clone(&self.adapter);
        let label = match tokio::spawn(async move { adapter.analyze(Some(frame)).await }).await {
            Ok(result) => result.label,
            Err(e) => {
                warn!(modality = %Modality::Visual, error = %e, "Stream analysis task crashed");
                EmotionLabel::Error
            }
        };
        self.publish(label);
        self.interval
    }

    fn publish(&self, label: EmotionLabel) {
        let old_label = self.writer.publish(label.clone());
        if old_label == label {
            debug!(label = %label, "Visual label unchanged");
            return;
        }

        info!(old = %old_label, new = %label, "Visual label changed");
        self.event_bus.emit_lossy(EmoEvent::VisualEmotionChanged {
            old_label,
            new_label: label,
            timestamp: chrono::Utc::now(),
        });
    }
}
