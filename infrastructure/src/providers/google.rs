//! Google Gemini adapter

use super::ProviderKind;
use super::http::{AdapterSettings, invalid, send_json};
use async_trait::async_trait;
use chorus_application::{Backend, BackendError};
use chorus_domain::{ModelCapabilities, PromptTemplate};
use serde_json::{Value, json};
use tracing::debug;

/// Backend over `POST {base}/v1beta/models/{model}:generateContent`
#[derive(Debug)]
pub struct GoogleBackend {
    settings: AdapterSettings,
    capabilities: ModelCapabilities,
    client: reqwest::Client,
}

impl GoogleBackend {
    pub fn new(
        settings: AdapterSettings,
        capabilities: ModelCapabilities,
        client: reqwest::Client,
    ) -> Self {
        Self {
            settings,
            capabilities,
            client,
        }
    }

    fn build_request_body(&self, prompt: &str, system_prompt: &str) -> Value {
        json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.settings.temperature,
                "maxOutputTokens": self.settings.max_tokens,
            },
        })
    }

    async fn send_once(&self, body: &Value, api_key: &str) -> Result<String, BackendError> {
        let url = self.settings.endpoint(&format!(
            "/v1beta/models/{}:generateContent",
            self.settings.model
        ));
        let request = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(body);
        parse_response(&send_json(request).await?)
    }
}

fn parse_response(body: &Value) -> Result<String, BackendError> {
    let candidate = body["candidates"]
        .as_array()
        .and_then(|candidates| candidates.first())
        .ok_or_else(|| invalid("Missing candidates in response"))?;

    let text: String = candidate["content"]["parts"]
        .as_array()
        .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate["finishReason"].as_str().unwrap_or("unknown");
        return Err(BackendError::InvalidResponse(format!(
            "Response contained no text (finish reason: {})",
            reason
        )));
    }
    Ok(text.trim().to_string())
}

#[async_trait]
impl Backend for GoogleBackend {
    fn capabilities(&self) -> &ModelCapabilities {
        &self.capabilities
    }

    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, BackendError> {
        let Some(api_key) = self.settings.api_key.as_deref() else {
            return Err(BackendError::Unavailable(
                ProviderKind::Google
                    .missing_key_message(&self.settings.name, &self.settings.api_key_env),
            ));
        };

        let body = self.build_request_body(
            prompt,
            system_prompt.unwrap_or(PromptTemplate::default_system()),
        );
        debug!(backend = %self.settings.name, model = %self.settings.model, "Sending generateContent");
        self.settings
            .retry
            .execute(&self.settings.name, || self.send_once(&body, api_key))
            .await
    }
}
