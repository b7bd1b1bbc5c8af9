//! OpenAI chat completions adapter

use super::ProviderKind;
use super::http::{AdapterSettings, invalid, send_json};
use async_trait::async_trait;
use chorus_application::{Backend, BackendError};
use chorus_domain::{ModelCapabilities, PromptTemplate};
use serde_json::{Value, json};
use tracing::debug;

/// Backend over `POST {base}/v1/chat/completions`
#[derive(Debug)]
pub struct OpenAiBackend {
    settings: AdapterSettings,
    capabilities: ModelCapabilities,
    client: reqwest::Client,
}

impl OpenAiBackend {
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
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": prompt },
            ],
            "temperature": self.settings.temperature,
            "max_tokens": self.settings.max_tokens,
        })
    }

    async fn send_once(&self, body: &Value, api_key: &str) -> Result<String, BackendError> {
        let request = self
            .client
            .post(self.settings.endpoint("/v1/chat/completions"))
            .bearer_auth(api_key)
            .json(body);
        parse_response(&send_json(request).await?)
    }
}

fn parse_response(body: &Value) -> Result<String, BackendError> {
    let choice = body["choices"]
        .as_array()
        .and_then(|choices| choices.first())
        .ok_or_else(|| invalid("Missing choices in response"))?;
    choice["message"]["content"]
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| invalid("Missing message content"))
}

#[async_trait]
impl Backend for OpenAiBackend {
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
                ProviderKind::OpenAi
                    .missing_key_message(&self.settings.name, &self.settings.api_key_env),
            ));
        };

        let body = self.build_request_body(
            prompt,
            system_prompt.unwrap_or(PromptTemplate::default_system()),
        );
        debug!(backend = %self.settings.name, model = %self.settings.model, "Sending chat completion");
        self.settings
            .retry
            .execute(&self.settings.name, || self.send_once(&body, api_key))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::RetryPolicy;

    fn backend(api_key: Option<&str>) -> OpenAiBackend {
        let settings = AdapterSettings {
            name: "openai".into(),
            model: "gpt-4".into(),
            api_key: api_key.map(str::to_string),
            api_key_env: "OPENAI_API_KEY".into(),
            // Unroutable: a test that reaches the network fails loudly
            base_url: "http://127.0.0.1:9".into(),
            max_tokens: 1000,
            temperature: 0.7,
            retry: RetryPolicy::none(),
        };
        OpenAiBackend::new(
            settings,
            ProviderKind::OpenAi.default_capabilities("openai", "gpt-4"),
            reqwest::Client::new(),
        )
    }

    #[test]
    fn test_build_request_body() {
        let body = backend(None).build_request_body("Hi there", "Be brief.");
        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "Be brief.");
        assert_eq!(body["messages"][1]["content"], "Hi there");
        assert_eq!(body["max_tokens"], 1000);
    }

    #[test]
    fn test_parse_response() {
        let body = json!({
            "choices": [{ "message": { "role": "assistant", "content": "  Hello!\n" } }]
        });
        assert_eq!(parse_response(&body), Ok("Hello!".to_string()));
    }

    #[test]
    fn test_parse_response_without_choices() {
        let body = json!({ "choices": [] });
        assert!(matches!(
            parse_response(&body),
            Err(BackendError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_is_unavailable() {
        let result = backend(None).generate("hello", None).await;
        match result {
            Err(BackendError::Unavailable(msg)) => {
                assert!(msg.starts_with("OpenAI API key not configured."));
            }
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }
}
