//! Server-Sent Events (SSE) utilities

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::events::EmoEvent;

/// Create an SSE stream that forwards bus events plus a heartbeat
///
/// Sends a `ConnectionStatus` event first, then every [`EmoEvent`] received
/// on `rx` under its `event_type()` name with a JSON body. Lagged receivers
/// skip the missed events and keep streaming.
///
/// # Arguments
/// * `service_name` - Name of the service for logging (e.g., "emofuse-server")
/// * `rx` - Subscription taken from the service's `EventBus`
pub fn create_event_sse_stream(
    service_name: &'static str,
    mut rx: broadcast::Receiver<EmoEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected to {} events", service_name);

    let stream = async_stream::stream! {
        yield Ok(Event::default()
            .event("ConnectionStatus")
            .data("connected"));

        loop {
            tokio::select! {
                received = rx.recv() => match received {
                    Ok(event) => {
                        match serde_json::to_string(&event) {
                            Ok(json) => yield Ok(Event::default().event(event.event_type()).data(json)),
                            Err(e) => warn!("SSE: failed to serialize event: {}", e),
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("SSE: {} client lagged, skipped {} events", service_name, skipped);
                    }
                    Err(RecvError::Closed) => {
                        info!("SSE: {} event bus closed, ending stream", service_name);
                        break;
                    }
                },
                _ = tokio::time::sleep(Duration::from_secs(15)) => {
                    debug!("SSE: Sending heartbeat");
                    yield Ok(Event::default().comment("heartbeat"));
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    )
}
