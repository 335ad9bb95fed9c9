//! Test Helper Utilities
//!
//! Shared utilities for testing emofuse-server

#![allow(dead_code)]

pub mod audio_generator;
pub mod fakes;

// Re-export commonly used items
pub use audio_generator::{generate_wav_bytes, AudioConfig};
pub use fakes::{
    default_rig, speech_adapter, FailingModel, FixedDetector, PanickingModel, TestRig,
};
