//! emofuse-server library interface
//!
//! Multimodal emotion fusion service. Exposes the router, application state
//! and building blocks for integration testing.

pub mod adapters;
pub mod api;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod services;
pub mod state;
pub mod streaming;
pub mod types;
pub mod utils;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use emofuse_common::events::EventBus;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::orchestrator::Orchestrator;
use crate::state::VisualLabelReader;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    /// Read half of the shared visual label
    pub visual: VisualLabelReader,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Request body limit (multipart uploads)
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        visual: VisualLabelReader,
        event_bus: EventBus,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            orchestrator,
            visual,
            event_bus,
            startup_time: Utc::now(),
            max_upload_bytes,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let body_limit = state.max_upload_bytes;

    Router::new()
        .merge(api::ui_routes())
        .merge(api::analyze_routes())
        .merge(api::visual_routes())
        .merge(api::health_routes())
        .route("/events", get(api::event_stream))
        .route("/api/buildinfo", get(api::get_build_info))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
