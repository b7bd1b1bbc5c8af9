//! Anthropic messages adapter

use super::ProviderKind;
use super::http::{AdapterSettings, invalid, send_json};
use async_trait::async_trait;
use chorus_application::{Backend, BackendError};
use chorus_domain::{ModelCapabilities, PromptTemplate};
use serde_json::{Value, json};
use tracing::debug;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Backend over `POST {base}/v1/messages`
#[derive(Debug)]
pub struct AnthropicBackend {
    settings: AdapterSettings,
    capabilities: ModelCapabilities,
    client: reqwest::Client,
}

impl AnthropicBackend {
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
            "model": self.settings.model,
            "system": system_prompt,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": self.settings.max_tokens,
            "temperature": self.settings.temperature,
        })
    }

    async fn send_once(&self, body: &Value, api_key: &str) -> Result<String, BackendError> {
        let request = self
            .client
            .post(self.settings.endpoint("/v1/messages"))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(body);
        parse_response(&send_json(request).await?)
    }
}

/// Concatenate the text blocks of a messages response
fn parse_response(body: &Value) -> Result<String, BackendError> {
    let blocks = body["content"]
        .as_array()
        .ok_or_else(|| invalid("Missing content in response"))?;

    let text: String = blocks
        .iter()
        .filter(|block| block["type"] == "text")
        .filter_map(|block| block["text"].as_str())
        .collect();

    if text.trim().is_empty() {
        return Err(invalid("Response contained no text"));
    }
    Ok(text.trim().to_string())
}

#[async_trait]
impl Backend for AnthropicBackend {
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
                ProviderKind::Anthropic
                    .missing_key_message(&self.settings.name, &self.settings.api_key_env),
            ));
        };

        let body = self.build_request_body(
            prompt,
            system_prompt.unwrap_or(PromptTemplate::default_system()),
        );
        debug!(backend = %self.settings.name, model = %self.settings.model, "Sending message");
        self.settings
            .retry
            .execute(&self.settings.name, || self.send_once(&body, api_key))
            .await
    }
}
