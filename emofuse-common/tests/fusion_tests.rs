//! Normalizer + fusion engine, driven from raw source strings
//!
//! Mirrors what the service does per request: each source's raw output is
//! normalized first, then the three labels are fused.

use emofuse_common::{fuse, normalize, normalize_label, EmotionLabel, FusionOutcome, Modality, SignalResult};

fn fuse_raw(visual: &str, speech: &str, text: &str) -> EmotionLabel {
    fuse(
        &normalize_label(visual),
        &normalize_label(speech),
        &normalize_label(text),
    )
}

#[test]
fn test_raw_model_casing_is_normalized_before_voting() {
    // Detector says "happy", classifier says "Happy": same ballot after normalization
    assert_eq!(
        fuse_raw("happy", "sad", "Happy"),
        EmotionLabel::Emotion("Happy".into())
    );
}

#[test]
fn test_calm_speech_counts_as_neutral() {
    // Speech "calm" is not a vote, visual and text disagree: visual wins the tie
    assert_eq!(
        fuse_raw("angry", "calm", "sad"),
        EmotionLabel::Emotion("Angry".into())
    );
    assert_eq!(fuse_raw("neutral", "calm", ""), EmotionLabel::Neutral);
}

#[test]
fn test_failure_and_absence() {
    let visual = normalize::<&str, &str>(Err("detector unreachable"));
    let speech = normalize::<&str, &str>(Ok(None));
    let text = normalize_label("fear");

    assert_eq!(visual, EmotionLabel::Error);
    assert_eq!(speech, EmotionLabel::NoData);
    assert_eq!(fuse(&visual, &speech, &text), EmotionLabel::Emotion("Fear".into()));
}

#[test]
fn test_outcome_serializes_for_response() {
    let outcome = FusionOutcome::from_signals(
        SignalResult::new(Modality::Visual, normalize_label("surprise"), "face 0"),
        SignalResult::no_data(Modality::Speech),
        SignalResult::new(Modality::Text, normalize_label("surprise"), "what a surprise"),
    );

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["final_label"], "Surprise");
    assert_eq!(json["per_modality"][1]["modality"], "speech");
    assert_eq!(json["per_modality"][1]["label"], "No Data");
}
