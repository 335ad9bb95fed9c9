//! Event types for the emofuse event system
//!
//! Provides the shared event enum and the EventBus used to fan events out to
//! SSE clients.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::label::EmotionLabel;

/// emofuse event types
///
/// Broadcast via [`EventBus`] and serialized as JSON for SSE transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EmoEvent {
    /// Shared visual label changed (streaming mode)
    VisualEmotionChanged {
        old_label: EmotionLabel,
        new_label: EmotionLabel,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// One analysis request reached `Completed`
    AnalysisCompleted {
        request_id: Uuid,
        final_emotion: EmotionLabel,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl EmoEvent {
    /// SSE `event:` name
    pub fn event_type(&self) -> &str {
        match self {
            EmoEvent::VisualEmotionChanged { .. } => "VisualEmotionChanged",
            EmoEvent::AnalysisCompleted { .. } => "AnalysisCompleted",
        }
    }
}

/// Broadcast bus for [`EmoEvent`]s
///
/// Events emitted with no subscriber are dropped.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EmoEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<EmoEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: EmoEvent) {
        let _ = self.tx.send(event);
    }

    /// Current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
