//! Audio helpers for the Speech adapter

pub mod audio_decoder;
pub mod transcode;

pub use audio_decoder::{decode_audio_file, DecodedAudio};
pub use transcode::Transcoder;
