//! Ad-hoc text translation for the sidebar widget
//!
//! Calls the public `translate_a/single` endpoint (client=gtx). Translation
//! is a convenience feature: on any failure the input text is returned
//! unchanged rather than surfacing an error.

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::Result;
use crate::config::DiscoveryConfig;
use crate::error::DiscoveryError;

/// Client for the translation endpoint
pub struct TranslateClient {
    client: Client,
    base_url: String,
}

impl TranslateClient {
    /// Create a client from the service configuration
    pub fn new(config: &DiscoveryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.services.timeout_seconds.into()))
            .user_agent(config.services.user_agent.clone())
            .build()
            .map_err(|e| DiscoveryError::service(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.services.translate_base_url.clone(),
        })
    }

    /// Translate `text` from `source_lang` to `target_lang`.
    ///
    /// Returns the input unchanged when the upstream call fails or its
    /// payload cannot be interpreted.
    #[instrument(skip(self, text))]
    pub async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> String {
        match self.call(text, source_lang, target_lang).await {
            Some(translated) => translated,
            None => {
                warn!("Translation failed, returning original text");
                text.to_string()
            }
        }
    }

    async fn call(&self, text: &str, source_lang: &str, target_lang: &str) -> Option<String> {
        let url = format!(
            "{}?client=gtx&sl={}&tl={}&dt=t&q={}",
            self.base_url,
            urlencoding::encode(source_lang),
            urlencoding::encode(target_lang),
            urlencoding::encode(text)
        );

        let response = self.client.get(&url).send().await.ok()?;
        if !response.status().is_success() {
            warn!("Translation endpoint returned HTTP {}", response.status());
            return None;
        }

        let payload: Value = response.json().await.ok()?;
        let translated = extract_translation(&payload)?;
        debug!("Translated {} chars {} -> {}", text.len(), source_lang, target_lang);
        Some(translated)
    }
}

/// Pull the translated text out of the gtx payload.
///
/// The endpoint answers with nested arrays: `[[["Xin chào","Hello",..],..],..]`.
/// Long inputs are split into segments, so the first elements of every
/// segment are concatenated.
fn extract_translation(payload: &Value) -> Option<String> {
    let segments = payload.get(0)?.as_array()?;
    let mut translated = String::new();
    for segment in segments {
        if let Some(part) = segment.get(0).and_then(Value::as_str) {
            translated.push_str(part);
        }
    }
    if translated.is_empty() {
        None
    } else {
        Some(translated)
    }
}
