//! Speech affect estimation from decoded audio

use async_trait::async_trait;

use crate::types::AdapterResult;
use crate::utils::DecodedAudio;

#[async_trait]
pub trait SpeechAffectModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Raw emotion name for the clip; the caller normalizes it
    async fn estimate(&self, audio: &DecodedAudio) -> AdapterResult<String>;
}

/// Clip-length heuristic
///
/// Longer than `long_secs` -> "Surprise", shorter than `short_secs` ->
/// "Fear", otherwise "Calm". Placeholder until a real model is wired in.
#[derive(Debug, Clone, Copy)]
pub struct DurationHeuristic {
    pub short_secs: f64,
    pub long_secs: f64,
}

impl Default for DurationHeuristic {
    fn default() -> Self {
        Self {
            short_secs: 2.0,
            long_secs: 5.0,
        }
    }
}

impl DurationHeuristic {
    pub fn label_for(&self, duration_seconds: f64) -> &'static str {
        if duration_seconds > self.long_secs {
            "Surprise"
        } else if duration_seconds < self.short_secs {
            "Fear"
        } else {
            "Calm"
        }
    }
}

#[async_trait]
impl SpeechAffectModel for DurationHeuristic {
    fn name(&self) -> &'static str {
        "duration-heuristic"
    }

    async fn estimate(&self, audio: &DecodedAudio) -> AdapterResult<String> {
        Ok(self.label_for(audio.duration_seconds).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        let h = DurationHeuristic::default();
        assert_eq!(h.label_for(0.5), "Fear");
        assert_eq!(h.label_for(2.0), "Calm");
        assert_eq!(h.label_for(5.0), "Calm");
        assert_eq!(h.label_for(5.1), "Surprise");
    }

    #[tokio::test]
    async fn test_estimate_uses_duration() {
        let audio = DecodedAudio::from_mono(vec![0.0; 16_000 * 6], 16_000, 1);
        let label = DurationHeuristic::default().estimate(&audio).await.unwrap();
        assert_eq!(label, "Surprise");
    }
}
