//! OpenAI-compatible chat-completions rewriter.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use vitrina_core::config::LlmConfig;
use vitrina_core::error::{Result, VitrinaError};
use vitrina_core::traits::Rewriter;

/// Chat-completions provider used for description rewrites.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    base_url: String,
    request_timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Build from config. The API key falls back to the OPENAI_API_KEY
    /// env var when the config field is empty.
    pub fn from_config(config: &LlmConfig) -> Self {
        let api_key = if !config.api_key.is_empty() {
            config.api_key.clone()
        } else {
            std::env::var("OPENAI_API_KEY").unwrap_or_default()
        };
        Self {
            api_key,
            model: config.model.clone(),
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Rewriter for OpenAiProvider {
    async fn prompt(&self, prompt: &str) -> Result<Option<String>> {
        if self.api_key.is_empty() {
            return Err(VitrinaError::ApiKeyMissing("openai".into()));
        }

        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| VitrinaError::Http(format!("openai connection failed ({url}): {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(VitrinaError::Provider(format!(
                "openai API error {status}: {text}"
            )));
        }

        let reply: Value = response
            .json()
            .await
            .map_err(|e| VitrinaError::Http(e.to_string()))?;
        let content = reply["choices"]
            .get(0)
            .and_then(|choice| choice["message"]["content"].as_str());

        let text = content.map(strip_fences).filter(|text| !text.is_empty());
        if text.is_none() {
            tracing::debug!("openai returned no usable content");
        }
        Ok(text)
    }
}

/// Strip the markdown code fences models tend to wrap JSON replies in.
fn strip_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}
