//! Build backends from configuration

use super::http::AdapterSettings;
use super::retry::RetryPolicy;
use super::{AnthropicBackend, GoogleBackend, OpenAiBackend, ProviderKind};
use crate::config::{ConfigError, FileBackendConfig, FileConfig};
use chorus_application::{Backend, CapabilityRegistry, ExecutionParams};
use chorus_domain::ModelCapabilities;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Create one adapter per enabled backend and freeze them into a registry
///
/// Backends are registered in the order of `config.backends` (by name).
/// A backend without an API key is still registered; its calls fail with
/// `Unavailable`.
pub fn build_registry(config: &FileConfig) -> Result<CapabilityRegistry, ConfigError> {
    let client = reqwest::Client::builder()
        .build()
        .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
    let retry = RetryPolicy::from(&config.retry);

    let mut builder = CapabilityRegistry::builder();
    for (name, backend_config) in config.enabled_backends() {
        let backend = build_backend(name, backend_config, retry.clone(), client.clone())?;
        builder = builder.register(backend)?;
    }
    Ok(builder.build())
}

fn build_backend(
    name: &str,
    config: &FileBackendConfig,
    retry: RetryPolicy,
    client: reqwest::Client,
) -> Result<Arc<dyn Backend>, ConfigError> {
    let kind = config
        .provider_kind()
        .ok_or_else(|| ConfigError::UnknownProvider {
            backend: name.to_string(),
            provider: config.provider.clone(),
        })?;

    let model = if config.model.trim().is_empty() {
        kind.default_model().to_string()
    } else {
        config.model.clone()
    };

    let api_key = config.resolve_api_key(kind);
    let api_key_env = config
        .api_key_env
        .clone()
        .unwrap_or_else(|| kind.default_api_key_env().to_string());
    if api_key.is_none() {
        warn!(backend = name, "No API key found in {}", api_key_env);
    }

    let settings = AdapterSettings {
        name: name.to_string(),
        model: model.clone(),
        api_key,
        api_key_env,
        base_url: config
            .base_url
            .clone()
            .unwrap_or_else(|| kind.default_base_url().to_string()),
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        retry,
    };
    let capabilities = capabilities_for(kind, name, &model, config);
    debug!(backend = name, provider = %kind, model = %model, "Built backend");

    Ok(match kind {
        ProviderKind::OpenAi => Arc::new(OpenAiBackend::new(settings, capabilities, client)),
        ProviderKind::Anthropic => Arc::new(AnthropicBackend::new(settings, capabilities, client)),
        ProviderKind::Google => Arc::new(GoogleBackend::new(settings, capabilities, client)),
    })
}

/// Provider defaults with the configured overrides applied
fn capabilities_for(
    kind: ProviderKind,
    name: &str,
    model: &str,
    config: &FileBackendConfig,
) -> ModelCapabilities {
    let mut caps = kind.default_capabilities(name, model);
    if let Some(strengths) = &config.strengths {
        caps = caps.with_strengths(strengths.iter().cloned());
    }
    if let Some(weaknesses) = &config.weaknesses {
        caps = caps.with_weaknesses(weaknesses.iter().cloned());
    }
    if let Some(cost) = config.cost_per_1k_tokens {
        caps = caps.with_cost(cost);
    }
    caps
}

/// Timeouts and system prompt for the execution coordinator
pub fn execution_params(config: &FileConfig) -> ExecutionParams {
    let mut params =
        ExecutionParams::default().with_default_timeout(Duration::from_secs(config.execution.timeout_seconds));
    for (name, backend) in config.enabled_backends() {
        if let Some(secs) = backend.timeout_seconds {
            params = params.with_backend_timeout(name.clone(), Duration::from_secs(secs));
        }
    }
    if let Some(prompt) = &config.execution.system_prompt {
        params = params.with_system_prompt(prompt.clone());
    }
    params
}
