//! Text emotion classification
//!
//! Operates on English text (post-translation).

use async_trait::async_trait;

use crate::types::AdapterResult;

#[async_trait]
pub trait TextEmotionClassifier: Send + Sync {
    fn name(&self) -> &'static str;

    /// Raw emotion name for `text`; the caller normalizes it
    async fn classify(&self, text: &str) -> AdapterResult<String>;
}

/// Keyword rules, first match wins
const KEYWORD_RULES: &[(&[&str], &str)] = &[
    (&["happy", "joy"], "Happy"),
    (&["sad", "grief"], "Sad"),
    (&["angry", "rage"], "Angry"),
];

/// Case-insensitive substring keyword classifier
///
/// Stand-in for a real sentiment model. Anything without a keyword is
/// "Neutral".
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn classify_sync(text: &str) -> &'static str {
        let lowered = text.to_lowercase();
        KEYWORD_RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(_, label)| *label)
            .unwrap_or("Neutral")
    }
}

#[async_trait]
impl TextEmotionClassifier for KeywordClassifier {
    fn name(&self) -> &'static str {
        "keyword"
    }

    async fn classify(&self, text: &str) -> AdapterResult<String> {
        Ok(Self::classify_sync(text).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(KeywordClassifier::classify_sync("I am so HAPPY today"), "Happy");
        assert_eq!(KeywordClassifier::classify_sync("pure joy"), "Happy");
        assert_eq!(KeywordClassifier::classify_sync("full of grief"), "Sad");
        assert_eq!(KeywordClassifier::classify_sync("road rage"), "Angry");
        assert_eq!(KeywordClassifier::classify_sync("the weather is mild"), "Neutral");
    }

    #[test]
    fn test_rule_order_happy_before_sad() {
        assert_eq!(KeywordClassifier::classify_sync("happy and sad"), "Happy");
        assert_eq!(KeywordClassifier::classify_sync("sad but not angry"), "Sad");
    }
}
