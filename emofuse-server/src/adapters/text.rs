//! Text adapter: translate to English, then classify

use async_trait::async_trait;
use emofuse_common::{normalize_label, Modality, SignalResult};
use std::sync::Arc;
use tracing::{debug, warn};

use super::SignalAdapter;
use crate::services::{TextEmotionClassifier, Translator};

/// `translated_text` when no text was supplied
pub const NO_INPUT_TEXT: &str = "No Input";
/// `lang_status` when no text was supplied
pub const LANG_STATUS_NONE: &str = "N/A";
/// `lang_status` when translation failed
pub const LANG_STATUS_FAILED: &str = "Translation Failed";

/// Text result plus what the translation step produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSignal {
    pub signal: SignalResult,
    /// English text that was classified (original text if translation failed)
    pub translated_text: String,
    /// Upper-cased source language tag, or one of the status constants
    pub lang_status: String,
}

impl TextSignal {
    fn no_input() -> Self {
        Self {
            signal: SignalResult::no_data(Modality::Text),
            translated_text: NO_INPUT_TEXT.to_string(),
            lang_status: LANG_STATUS_NONE.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct TextAdapter {
    translator: Arc<dyn Translator>,
    classifier: Arc<dyn TextEmotionClassifier>,
}

impl TextAdapter {
    pub fn new(translator: Arc<dyn Translator>, classifier: Arc<dyn TextEmotionClassifier>) -> Self {
        Self {
            translator,
            classifier,
        }
    }

    /// Whitespace-only text counts as absent
    pub async fn analyze_text(&self, text: Option<String>) -> TextSignal {
        let text = match text {
            Some(t) if !t.trim().is_empty() => t,
            _ => return TextSignal::no_input(),
        };

        let translation = match self.translator.translate(&text).await {
            Ok(translation) => translation,
            Err(e) => {
                warn!(
                    modality = %Modality::Text,
                    translator = self.translator.name(),
                    error = %e,
                    "Translation failed"
                );
                return TextSignal {
                    signal: SignalResult::failed(Modality::Text, text.clone()),
                    translated_text: text,
                    lang_status: LANG_STATUS_FAILED.to_string(),
                };
            }
        };

        let signal = match self.classifier.classify(&translation.text).await {
            Ok(raw) => {
                let label = normalize_label(&raw);
                debug!(
                    modality = %Modality::Text,
                    source_lang = %translation.source_lang,
                    raw = %raw,
                    label = %label,
                    "Text classified"
                );
                SignalResult::new(Modality::Text, label, raw)
            }
            Err(e) => {
                warn!(
                    modality = %Modality::Text,
                    classifier = self.classifier.name(),
                    error = %e,
                    "Text classification failed"
                );
                SignalResult::failed(Modality::Text, e.to_string())
            }
        };

        TextSignal {
            signal,
            translated_text: translation.text,
            lang_status: translation.source_lang.to_uppercase(),
        }
    }
}

#[async_trait]
impl SignalAdapter for TextAdapter {
    type Input = String;

    fn modality(&self) -> Modality {
        Modality::Text
    }

    async fn analyze_input(&self, text: String) -> SignalResult {
        self.analyze_text(Some(text)).await.signal
    }
}
