//! HTTP plumbing shared by the provider adapters

use super::retry::RetryPolicy;
use chorus_application::BackendError;
use chorus_domain::core::string::truncate;
use reqwest::StatusCode;
use serde_json::Value;

/// Connection and generation settings of one adapter
#[derive(Debug, Clone)]
pub struct AdapterSettings {
    /// Backend name as registered
    pub name: String,
    /// Provider model identifier, passed through as is
    pub model: String,
    /// `None` makes every call fail with `Unavailable`
    pub api_key: Option<String>,
    /// Environment variable the key was expected in, for error messages
    pub api_key_env: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub retry: RetryPolicy,
}

impl AdapterSettings {
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Send a prepared request and return the JSON body of a 2xx response
pub(crate) async fn send_json(request: reqwest::RequestBuilder) -> Result<Value, BackendError> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    let body = response.text().await.map_err(map_transport_error)?;

    if !status.is_success() {
        return Err(map_status(status, &body));
    }

    serde_json::from_str(&body)
        .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

fn map_transport_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Transport(e.to_string())
    }
}

/// Map a non-2xx status: 429 and 5xx are transient, 401/403 mean the
/// backend is unusable, everything else is a permanent rejection.
pub(crate) fn map_status(status: StatusCode, body: &str) -> BackendError {
    let message = extract_error_message(body);
    match status.as_u16() {
        429 => BackendError::Transport(format!("rate limited: {}", message)),
        401 | 403 => BackendError::Unavailable(format!(
            "authentication failed (HTTP {}): {}",
            status.as_u16(),
            message
        )),
        500..=599 => BackendError::Transport(format!("HTTP {}: {}", status.as_u16(), message)),
        code => BackendError::Rejected {
            status: code,
            message,
        },
    }
}

const MAX_ERROR_LEN: usize = 300;

/// Pull `error.message` out of a provider error body, else use the raw body
pub(crate) fn extract_error_message(body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    truncate(&message, MAX_ERROR_LEN)
}

pub(crate) fn invalid(message: &str) -> BackendError {
    BackendError::InvalidResponse(message.to_string())
}
