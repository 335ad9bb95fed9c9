//! Fusion engine - plurality vote over the three modality labels
//!
//! Algorithm:
//! 1. Drop `NoData`, `Neutral` and `Error` (sentinel match is case-insensitive)
//! 2. Nothing left: `Neutral` if any input was `Neutral`, else `NoData`
//! 3. Otherwise the most frequent remaining label (case-sensitive counting)
//! 4. Ties go to the first label in modality order Visual, Speech, Text
//!
//! The tie-break is inherited from a stable count-then-first-match over the
//! insertion order Visual, Speech, Text. It is kept for compatibility even
//! though nothing makes Visual intrinsically more trustworthy.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::label::EmotionLabel;
use crate::signal::{Modality, SignalResult};

/// Fuse three normalized labels into one
pub fn fuse(visual: &EmotionLabel, speech: &EmotionLabel, text: &EmotionLabel) -> EmotionLabel {
    fuse_in_priority_order(&[visual, speech, text])
}

fn fuse_in_priority_order(labels: &[&EmotionLabel]) -> EmotionLabel {
    // (label, votes) in first-seen order
    let mut tally: Vec<(&EmotionLabel, usize)> = Vec::with_capacity(labels.len());
    for label in labels.iter().copied().filter(|l| l.is_vote()) {
        match tally.iter_mut().find(|(seen, _)| seen.as_str() == label.as_str()) {
            Some((_, votes)) => *votes += 1,
            None => tally.push((label, 1)),
        }
    }

    let mut winner: Option<(&EmotionLabel, usize)> = None;
    for &(label, votes) in &tally {
        // Strictly greater: an equal count never displaces an earlier label
        if winner.map_or(true, |(_, best)| votes > best) {
            winner = Some((label, votes));
        }
    }

    match winner {
        Some((label, _)) => label.clone(),
        None if labels.iter().any(|l| matches!(l, EmotionLabel::Neutral)) => EmotionLabel::Neutral,
        None => EmotionLabel::NoData,
    }
}

/// Final label plus the three per-modality results it was built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FusionOutcome {
    pub final_label: EmotionLabel,
    /// Always Visual, Speech, Text in that order
    pub per_modality: [SignalResult; 3],
}

impl FusionOutcome {
    /// Fuse one result per modality
    pub fn from_signals(visual: SignalResult, speech: SignalResult, text: SignalResult) -> Self {
        debug_assert_eq!(visual.modality, Modality::Visual);
        debug_assert_eq!(speech.modality, Modality::Speech);
        debug_assert_eq!(text.modality, Modality::Text);

        let final_label = fuse(&visual.label, &speech.label, &text.label);
        debug!(
            visual = %visual.label,
            speech = %speech.label,
            text = %text.label,
            final_label = %final_label,
            "Fused modality labels"
        );

        Self {
            final_label,
            per_modality: [visual, speech, text],
        }
    }

    /// Result for one modality
    pub fn signal(&self, modality: Modality) -> &SignalResult {
        match modality {
            Modality::Visual => &self.per_modality[0],
            Modality::Speech => &self.per_modality[1],
            Modality::Text => &self.per_modality[2],
        }
    }
}
