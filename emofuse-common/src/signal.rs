//! Per-modality signal types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::label::EmotionLabel;

/// One of the three input channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// Face image (uploaded frame or camera stream)
    Visual,
    /// Uploaded audio clip
    Speech,
    /// Free text, any language
    Text,
}

impl Modality {
    /// Fusion priority order, also the tie-break order
    pub const ALL: [Modality; 3] = [Modality::Visual, Modality::Speech, Modality::Text];
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modality::Visual => write!(f, "visual"),
            Modality::Speech => write!(f, "speech"),
            Modality::Text => write!(f, "text"),
        }
    }
}

/// Normalized result of one modality for one request
///
/// Produced once by a signal adapter, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalResult {
    pub modality: Modality,
    pub label: EmotionLabel,
    /// Free-form diagnostic (fault text, raw model output, source text)
    pub raw_diagnostic: String,
}

impl SignalResult {
    pub fn new(modality: Modality, label: EmotionLabel, raw_diagnostic: impl Into<String>) -> Self {
        Self {
            modality,
            label,
            raw_diagnostic: raw_diagnostic.into(),
        }
    }

    /// Input was not supplied: `NoData`, empty diagnostic
    pub fn no_data(modality: Modality) -> Self {
        Self::new(modality, EmotionLabel::NoData, String::new())
    }

    /// Modality faulted: `Error` with the fault text preserved
    pub fn failed(modality: Modality, diagnostic: impl Into<String>) -> Self {
        Self::new(modality, EmotionLabel::Error, diagnostic)
    }
}
