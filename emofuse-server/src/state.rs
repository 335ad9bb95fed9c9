//! Shared visual label for streaming mode
//!
//! Single writer (the streaming loop), any number of readers (request
//! handlers, the live-status endpoint). Backed by `tokio::sync::watch`,
//! so a read never blocks the writer and always sees one whole snapshot.
//!
//! # Staleness
//! A reader gets the label of the most recently *completed* frame
//! analysis. It may be up to one capture interval plus one detector
//! round-trip old, and older still while the camera is failing (the
//! previous label is kept). `updated_at` lets callers judge this;
//! `None` means no frame has been analyzed yet and the label is the
//! initial `Neutral`.

use chrono::{DateTime, Utc};
use emofuse_common::EmotionLabel;
use serde::Serialize;
use tokio::sync::watch;

/// Label plus the time it was published
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualSnapshot {
    pub label: EmotionLabel,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for VisualSnapshot {
    fn default() -> Self {
        Self {
            label: EmotionLabel::Neutral,
            updated_at: None,
        }
    }
}

/// Create the cell, initialized to `Neutral`
pub fn visual_label_cell() -> (VisualLabelWriter, VisualLabelReader) {
    let (tx, rx) = watch::channel(VisualSnapshot::default());
    (VisualLabelWriter { tx }, VisualLabelReader { rx })
}

/// Write half; deliberately not `Clone`
#[derive(Debug)]
pub struct VisualLabelWriter {
    tx: watch::Sender<VisualSnapshot>,
}

impl VisualLabelWriter {
    /// Publish a new label, returning the previous one
    pub fn publish(&self, label: EmotionLabel) -> EmotionLabel {
        let previous = self.tx.send_replace(VisualSnapshot {
            label,
            updated_at: Some(Utc::now()),
        });
        previous.label
    }

    pub fn reader(&self) -> VisualLabelReader {
        VisualLabelReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read half
#[derive(Debug, Clone)]
pub struct VisualLabelReader {
    rx: watch::Receiver<VisualSnapshot>,
}

impl VisualLabelReader {
    pub fn latest(&self) -> VisualSnapshot {
        self.rx.borrow().clone()
    }

    pub fn label(&self) -> EmotionLabel {
        self.rx.borrow().label.clone()
    }

    /// Wait for the next publish. Errors once the writer is gone.
    pub async fn changed(&mut self) -> Result<VisualSnapshot, watch::error::RecvError> {
        self.rx.changed().await?;
        Ok(self.rx.borrow_and_update().clone())
    }
}
