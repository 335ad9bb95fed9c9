//! Translation to English ahead of text classification

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::{AdapterError, AdapterResult};

/// Language tag reported when text was classified without translation
pub const UNTRANSLATED_TAG: &str = "UNTRANSLATED";

/// Target language of every translation
const TARGET_LANG: &str = "en";

/// Translated text and the detected source language
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Translation {
    #[serde(rename = "translated_text")]
    pub text: String,
    pub source_lang: String,
}

#[async_trait]
pub trait Translator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Translate `text` into English
    async fn translate(&self, text: &str) -> AdapterResult<Translation>;
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    target_lang: &'a str,
}

/// HTTP translator: `POST {base_url}/translate`
#[derive(Clone)]
pub struct RemoteTranslator {
    base_url: String,
    http: reqwest::Client,
}

impl RemoteTranslator {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AdapterResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl Translator for RemoteTranslator {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn translate(&self, text: &str) -> AdapterResult<Translation> {
        let url = format!("{}/translate", self.base_url);
        tracing::debug!(url = %url, chars = text.chars().count(), "Requesting translation");

        let response = self
            .http
            .post(&url)
            .json(&TranslateRequest {
                text,
                target_lang: TARGET_LANG,
            })
            .send()
            .await
            .map_err(|e| AdapterError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AdapterError::Api(format!("{} {}", status.as_u16(), error_text)));
        }

        response
            .json::<Translation>()
            .await
            .map_err(|e| AdapterError::Parse(format!("Failed to parse translation: {}", e)))
    }
}

/// Returns the input unchanged, tagged [`UNTRANSLATED_TAG`]
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughTranslator;

#[async_trait]
impl Translator for PassthroughTranslator {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    async fn translate(&self, text: &str) -> AdapterResult<Translation> {
        Ok(Translation {
            text: text.to_string(),
            source_lang: UNTRANSLATED_TAG.to_string(),
        })
    }
}
