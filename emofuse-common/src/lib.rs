//! # emofuse Common Library
//!
//! Shared code for the emofuse service including:
//! - Emotion labels and the label normalizer
//! - Per-modality signal types and the fusion engine
//! - Event types (EmoEvent enum) and the SSE helper
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod error;
pub mod events;
pub mod fusion;
pub mod label;
pub mod signal;
pub mod sse;

pub use error::{Error, Result};
pub use fusion::{fuse, FusionOutcome};
pub use label::{normalize, normalize_label, EmotionLabel};
pub use signal::{Modality, SignalResult};
