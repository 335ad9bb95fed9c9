//! Live visual label
//!
//! GET /get_visual_emotion always succeeds. It reports `Neutral` until the
//! streaming loop analyzes its first frame, and forever when streaming mode
//! is off.

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use emofuse_common::EmotionLabel;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct VisualEmotionResponse {
    pub visual_emotion: EmotionLabel,
    /// Publish time of the label, `null` before the first frame
    pub updated_at: Option<DateTime<Utc>>,
    pub streaming: bool,
}

pub async fn get_visual_emotion(State(state): State<AppState>) -> Json<VisualEmotionResponse> {
    let snapshot = state.visual.latest();
    Json(VisualEmotionResponse {
        visual_emotion: snapshot.label,
        updated_at: snapshot.updated_at,
        streaming: state.orchestrator.streaming_enabled(),
    })
}

pub fn visual_routes() -> Router<AppState> {
    Router::new().route("/get_visual_emotion", get(get_visual_emotion))
}
