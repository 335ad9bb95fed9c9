//! Speech Adapter Integration Tests
//!
//! Real WAV decoding through symphonia, plus scratch-directory cleanup on
//! every exit path.

mod helpers;

use emofuse_common::{EmotionLabel, Modality};
use emofuse_server::adapters::SignalAdapter;
use emofuse_server::services::DurationHeuristic;
use emofuse_server::types::AudioUpload;
use helpers::{generate_wav_bytes, speech_adapter, AudioConfig, FailingModel, PanickingModel};
use std::sync::Arc;

fn entries(dir: &tempfile::TempDir) -> usize {
    std::fs::read_dir(dir.path()).unwrap().count()
}

#[tokio::test]
async fn test_wav_durations_map_to_labels() {
    // Given: adapter with the duration heuristic
    let root = tempfile::tempdir().unwrap();
    let adapter = speech_adapter(Arc::new(DurationHeuristic::default()), root.path());

    // When/Then: short, medium and long clips
    let short = AudioUpload::new("short.wav", generate_wav_bytes(&AudioConfig::seconds(1.0)));
    let result = adapter.analyze(Some(short)).await;
    assert_eq!(result.label, EmotionLabel::from("Fear"));
    assert!(result.raw_diagnostic.starts_with("Fear"), "{}", result.raw_diagnostic);

    let medium = AudioUpload::new("medium.WAV", generate_wav_bytes(&AudioConfig::seconds(3.0)));
    let result = adapter.analyze(Some(medium)).await;
    assert_eq!(result.label, EmotionLabel::Neutral, "Calm normalizes to Neutral");

    let long = AudioUpload::new("long.wav", generate_wav_bytes(&AudioConfig::seconds(6.0)));
    let result = adapter.analyze(Some(long)).await;
    assert_eq!(result.label, EmotionLabel::from("Surprise"));

    // And: nothing left behind
    assert_eq!(entries(&root), 0);
}

#[tokio::test]
async fn test_absent_or_empty_upload_is_no_data() {
    let root = tempfile::tempdir().unwrap();
    let adapter = speech_adapter(Arc::new(DurationHeuristic::default()), root.path());

    let result = adapter.analyze(None).await;
    assert_eq!(result.label, EmotionLabel::NoData);
    assert!(result.raw_diagnostic.is_empty());

    let result = adapter.analyze(Some(AudioUpload::new("clip.wav", vec![]))).await;
    assert_eq!(result.label, EmotionLabel::NoData);

    let result = adapter
        .analyze(Some(AudioUpload::new("", generate_wav_bytes(&AudioConfig::default()))))
        .await;
    assert_eq!(result.label, EmotionLabel::NoData);

    assert_eq!(entries(&root), 0);
}

#[tokio::test]
async fn test_corrupt_audio_is_error_and_cleaned_up() {
    let root = tempfile::tempdir().unwrap();
    let adapter = speech_adapter(Arc::new(DurationHeuristic::default()), root.path());

    let upload = AudioUpload::new("broken.wav", b"RIFF....not really audio".to_vec());
    let result = adapter.analyze(Some(upload)).await;

    assert_eq!(result.modality, Modality::Speech);
    assert_eq!(result.label, EmotionLabel::Error);
    assert!(result.raw_diagnostic.contains("Audio decoding error"), "{}", result.raw_diagnostic);
    assert_eq!(entries(&root), 0);
}

#[tokio::test]
async fn test_unsupported_extension_is_error() {
    let root = tempfile::tempdir().unwrap();
    let adapter = speech_adapter(Arc::new(DurationHeuristic::default()), root.path());

    let result = adapter
        .analyze(Some(AudioUpload::new("notes.txt", b"hello".to_vec())))
        .await;
    assert_eq!(result.label, EmotionLabel::Error);
    assert!(result.raw_diagnostic.contains("Unsupported format"));

    let result = adapter
        .analyze(Some(AudioUpload::new("blob", b"hello".to_vec())))
        .await;
    assert_eq!(result.label, EmotionLabel::Error);

    assert_eq!(entries(&root), 0);
}

#[tokio::test]
async fn test_failed_transcode_is_error_and_cleaned_up() {
    // Given: ffmpeg is not installed at the configured path
    let root = tempfile::tempdir().unwrap();
    let adapter = speech_adapter(Arc::new(DurationHeuristic::default()), root.path());

    // When: a WebM recording arrives
    let upload = AudioUpload::new("recording.webm", vec![0x1a, 0x45, 0xdf, 0xa3, 0, 0, 0, 0]);
    let result = adapter.analyze(Some(upload)).await;

    // Then: Error with the transcoder fault, no scratch left
    assert_eq!(result.label, EmotionLabel::Error);
    assert!(result.raw_diagnostic.contains("Transcode error"), "{}", result.raw_diagnostic);
    assert_eq!(entries(&root), 0);
}

#[tokio::test]
async fn test_model_fault_preserves_text() {
    let root = tempfile::tempdir().unwrap();
    let adapter = speech_adapter(Arc::new(FailingModel), root.path());

    let upload = AudioUpload::new("clip.wav", generate_wav_bytes(&AudioConfig::default()));
    let result = adapter.analyze(Some(upload)).await;

    assert_eq!(result.label, EmotionLabel::Error);
    assert!(result.raw_diagnostic.contains("model weights missing"));
    assert_eq!(entries(&root), 0);
}

#[tokio::test]
async fn test_scratch_removed_when_model_panics() {
    let root = tempfile::tempdir().unwrap();
    let adapter = Arc::new(speech_adapter(Arc::new(PanickingModel), root.path()));

    let upload = AudioUpload::new("clip.wav", generate_wav_bytes(&AudioConfig::default()));
    let task = {
        let adapter = Arc::clone(&adapter);
        tokio::spawn(async move { adapter.analyze(Some(upload)).await })
    };

    let joined = task.await;
    assert!(joined.unwrap_err().is_panic());
    assert_eq!(entries(&root), 0);
}
