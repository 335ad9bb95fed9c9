//! Server-Sent Events for live label updates

use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;

use crate::AppState;

/// GET /events
///
/// Streams:
/// - VisualEmotionChanged (streaming mode)
/// - AnalysisCompleted
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    emofuse_common::sse::create_event_sse_stream("emofuse-server", state.event_bus.subscribe())
}
