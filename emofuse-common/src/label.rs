//! Emotion labels and the label normalizer
//!
//! An [`EmotionLabel`] is either a concrete emotion name from an open-ended
//! set ("Happy", "Sad", "Surprise", ...) or one of three sentinels that are
//! never counted as votes during fusion:
//!
//! - [`EmotionLabel::Neutral`]: a valid detection without a strong signal
//! - [`EmotionLabel::NoData`]: the modality was not provided
//! - [`EmotionLabel::Error`]: the modality was attempted and failed
//!
//! Concrete names are not validated against a fixed list. Upstream models
//! add labels over time and every non-empty, non-sentinel string is accepted.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Normalized emotion label for one modality
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum EmotionLabel {
    /// Concrete emotion name, first letter upper-case, rest lower-case
    Emotion(String),
    /// Valid detection, absence of a strong signal
    Neutral,
    /// Modality not provided / not attempted
    #[default]
    NoData,
    /// Modality attempted and failed
    Error,
}

impl EmotionLabel {
    /// Rendered form used in responses, events and logs
    pub fn as_str(&self) -> &str {
        match self {
            EmotionLabel::Emotion(name) => name,
            EmotionLabel::Neutral => "Neutral",
            EmotionLabel::NoData => "No Data",
            EmotionLabel::Error => "Error",
        }
    }

    /// True for `Neutral`, `NoData` and `Error`
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, EmotionLabel::Emotion(_))
    }

    /// True if this label takes part in the fusion vote
    ///
    /// An `Emotion` holding a sentinel spelling (e.g. built by hand as
    /// `Emotion("neutral")`) is excluded as well.
    pub fn is_vote(&self) -> bool {
        match self {
            EmotionLabel::Emotion(name) => sentinel_spelling(name).is_none(),
            _ => false,
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EmotionLabel {
    fn from(raw: &str) -> Self {
        normalize_label(raw)
    }
}

impl Serialize for EmotionLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EmotionLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(normalize_label(&raw))
    }
}

/// Normalize a raw source output into an [`EmotionLabel`]
///
/// - `Err(_)` (any failure reason) -> `Error`
/// - `Ok(None)` or an empty / whitespace-only string -> `NoData`
/// - otherwise see [`normalize_label`]
///
/// Total function: never panics, never fails.
pub fn normalize<S, E>(raw: std::result::Result<Option<S>, E>) -> EmotionLabel
where
    S: AsRef<str>,
{
    match raw {
        Err(_) => EmotionLabel::Error,
        Ok(None) => EmotionLabel::NoData,
        Ok(Some(label)) => normalize_label(label.as_ref()),
    }
}

/// Normalize a raw label string
///
/// `"neutral"` and `"calm"` (any case) map to `Neutral`. The rendered
/// sentinel spellings (`"No Data"`, `"NoData"`, `"N/A"`, `"Error"`) map back
/// to their sentinel so that normalizing twice gives the same label.
pub fn normalize_label(raw: &str) -> EmotionLabel {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return EmotionLabel::NoData;
    }

    match sentinel_spelling(trimmed) {
        Some(sentinel) => sentinel,
        None => EmotionLabel::Emotion(capitalize(trimmed)),
    }
}

fn sentinel_spelling(name: &str) -> Option<EmotionLabel> {
    match name.trim().to_lowercase().as_str() {
        "neutral" | "calm" => Some(EmotionLabel::Neutral),
        "no data" | "nodata" | "n/a" => Some(EmotionLabel::NoData),
        "error" => Some(EmotionLabel::Error),
        _ => None,
    }
}

/// Upper-case the first character, lower-case the rest
///
/// A first character whose upper-case form expands to several characters
/// (e.g. 'ß') is kept lower-case so the result stays a fixed point.
fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut out = String::with_capacity(raw.len());
    let mut upper = first.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => out.push(single),
        _ => out.extend(first.to_lowercase()),
    }
    for ch in chars {
        out.extend(ch.to_lowercase());
    }
    out
}
