//! HTTP API handlers for emofuse-server

pub mod analyze;
pub mod buildinfo;
pub mod health;
pub mod sse;
pub mod ui;
pub mod visual;

pub use analyze::analyze_routes;
pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use sse::event_stream;
pub use ui::ui_routes;
pub use visual::visual_routes;
