//! Answer query use case
//!
//! The single entry point: route a query, invoke the selected backends and
//! fuse whatever came back into one response.

use crate::config::ExecutionParams;
use crate::ports::backend::Backend;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::registry::CapabilityRegistry;
use crate::use_cases::execute_backends::ExecutionCoordinator;
use chorus_domain::{DomainError, FinalResponse, PromptTemplate, Query, ResponseMixer, Router};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Use case for answering one query with one or more backends
pub struct AnswerQueryUseCase {
    registry: Arc<CapabilityRegistry>,
    router: Router,
    mixer: ResponseMixer,
    coordinator: ExecutionCoordinator,
}

impl AnswerQueryUseCase {
    /// Fails with [`DomainError::NoBackendAvailable`] when the registry is empty
    pub fn new(
        registry: Arc<CapabilityRegistry>,
        router: Router,
        mixer: ResponseMixer,
        params: ExecutionParams,
    ) -> Result<Self, DomainError> {
        if registry.is_empty() {
            return Err(DomainError::NoBackendAvailable);
        }
        Ok(Self {
            registry,
            router,
            mixer,
            coordinator: ExecutionCoordinator::new(params),
        })
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn mixer(&self) -> &ResponseMixer {
        &self.mixer
    }

    /// Answer a query. Never fails: total backend failure yields a degraded
    /// response with an empty `models_used`.
    pub async fn answer(&self, query: &Query) -> FinalResponse {
        self.answer_with_progress(query, &NoProgress).await
    }

    pub async fn answer_with_progress(
        &self,
        query: &Query,
        progress: &dyn ProgressNotifier,
    ) -> FinalResponse {
        match self.run(query, None, progress).await {
            Ok(response) => response,
            Err(e) => FinalResponse::degraded(e.to_string()),
        }
    }

    /// Like [`answer_with_progress`](Self::answer_with_progress), but stops
    /// early with [`DomainError::Cancelled`] when `token` fires.
    pub async fn answer_with_cancellation(
        &self,
        query: &Query,
        token: &CancellationToken,
        progress: &dyn ProgressNotifier,
    ) -> Result<FinalResponse, DomainError> {
        if token.is_cancelled() {
            return Err(DomainError::Cancelled);
        }
        match self.run(query, Some(token), progress).await {
            Err(DomainError::Cancelled) => Err(DomainError::Cancelled),
            Err(e) => Ok(FinalResponse::degraded(e.to_string())),
            Ok(response) => Ok(response),
        }
    }

    /// Answer a raw message. A blank message is answered without consulting
    /// any backend.
    pub async fn answer_text(&self, message: &str) -> FinalResponse {
        match Query::new(message) {
            Ok(query) => self.answer(&query).await,
            Err(_) => FinalResponse::degraded(PromptTemplate::no_message()),
        }
    }

    async fn run(
        &self,
        query: &Query,
        cancel: Option<&CancellationToken>,
        progress: &dyn ProgressNotifier,
    ) -> Result<FinalResponse, DomainError> {
        let classified = self.router.classify(query);
        let selected = self.router.select(&classified, self.registry.all())?;
        info!(
            topics = ?classified.topics,
            "Routed to {}",
            selected.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ")
        );
        progress.on_route(&classified.topics, &selected);

        let backends: Vec<Arc<dyn Backend>> = selected
            .iter()
            .filter_map(|c| self.registry.backend(&c.name))
            .collect();

        let results = self
            .coordinator
            .execute(&backends, query, cancel, progress)
            .await?;

        let successes = results.successes();
        match successes.as_slice() {
            [] => {
                info!("All {} backend(s) failed", results.len());
                Ok(FinalResponse::degraded(PromptTemplate::all_backends_failed(
                    results.failures(),
                )))
            }
            [only] => {
                debug!("Single response from {}, skipping mixer", only.backend);
                Ok(FinalResponse::new(
                    only.text.clone(),
                    vec![only.backend.clone()],
                ))
            }
            many => {
                progress.on_mix(self.mixer.strategy(), many.len());
                info!(
                    "Mixing {} responses with {}",
                    many.len(),
                    self.mixer.strategy()
                );
                let text = self.mixer.mix(many, query);
                let models_used = many.iter().map(|a| a.backend.clone()).collect();
                Ok(FinalResponse::new(text, models_used))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::backend::BackendError;
    use async_trait::async_trait;
    use chorus_domain::{
        MixStrategy, MixerConfig, ModelCapabilities, RoutingPolicy, Topic, TopicClassifier,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedBackend {
        capabilities: ModelCapabilities,
        reply: Result<String, BackendError>,
        calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn ok(caps: ModelCapabilities, text: &str) -> Arc<Self> {
            Arc::new(Self {
                capabilities: caps,
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(caps: ModelCapabilities, error: BackendError) -> Arc<Self> {
            Arc::new(Self {
                capabilities: caps,
                reply: Err(error),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Backend for ScriptedBackend {
        fn capabilities(&self) -> &ModelCapabilities {
            &self.capabilities
        }

        async fn generate(&self, _: &str, _: Option<&str>) -> Result<String, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn use_case(backends: Vec<Arc<ScriptedBackend>>, policy: RoutingPolicy) -> AnswerQueryUseCase {
        let mut builder = CapabilityRegistry::builder();
        for backend in backends {
            builder = builder.register(backend).unwrap();
        }
        AnswerQueryUseCase::new(
            Arc::new(builder.build()),
            Router::new(TopicClassifier::default(), policy),
            ResponseMixer::new(MixerConfig::default().with_strategy(MixStrategy::BestParts))
                .unwrap(),
            ExecutionParams::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_empty_registry_rejected() {
        let result = AnswerQueryUseCase::new(
            Arc::new(CapabilityRegistry::builder().build()),
            Router::new(TopicClassifier::default(), RoutingPolicy::default()),
            ResponseMixer::new(MixerConfig::default()).unwrap(),
            ExecutionParams::default(),
        );
        assert!(matches!(result, Err(DomainError::NoBackendAvailable)));
    }

    #[tokio::test]
    async fn test_single_success_skips_mixer() {
        let only = ScriptedBackend::ok(ModelCapabilities::new("solo"), "Just me.");
        let uc = use_case(vec![only], RoutingPolicy::default());

        let response = uc.answer(&Query::new("hello there").unwrap()).await;
        assert_eq!(response.text, "Just me.");
        assert_eq!(response.models_used, vec!["solo".to_string()]);
    }

    #[tokio::test]
    async fn test_code_query_routes_to_strongest() {
        let coder = ScriptedBackend::ok(
            ModelCapabilities::new("a").with_strengths([Topic::Code]),
            "Use s[::-1].",
        );
        let writer = ScriptedBackend::ok(
            ModelCapabilities::new("b").with_strengths([Topic::Creative]),
            "Once upon a time.",
        );
        let uc = use_case(vec![coder.clone(), writer.clone()], RoutingPolicy::default());

        let response = uc
            .answer(&Query::new("Write a Python function to reverse a string").unwrap())
            .await;
        assert_eq!(response.models_used, vec!["a".to_string()]);
        assert_eq!(writer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_failed_is_degraded() {
        let a = ScriptedBackend::failing(
            ModelCapabilities::new("a").with_strengths([Topic::Code]),
            BackendError::Unavailable("A API key not configured.".into()),
        );
        let b = ScriptedBackend::failing(
            ModelCapabilities::new("b").with_strengths([Topic::Code]),
            BackendError::Transport("connection reset".into()),
        );
        let uc = use_case(vec![a, b], RoutingPolicy::default());

        let response = uc.answer(&Query::new("debug this code").unwrap()).await;
        assert!(response.models_used.is_empty());
        assert!(response.text.contains("A API key not configured."));
        assert!(response.text.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_partial_failure_uses_survivors() {
        let a = ScriptedBackend::failing(
            ModelCapabilities::new("a").with_strengths([Topic::Code]),
            BackendError::Timeout,
        );
        let b = ScriptedBackend::ok(
            ModelCapabilities::new("b").with_strengths([Topic::Code]),
            "Here is the fix.",
        );
        let uc = use_case(vec![a, b], RoutingPolicy::default());

        let response = uc.answer(&Query::new("fix this code").unwrap()).await;
        assert_eq!(response.text, "Here is the fix.");
        assert_eq!(response.models_used, vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn test_mixed_models_in_invocation_order() {
        let a = ScriptedBackend::ok(
            ModelCapabilities::new("a").with_strengths([Topic::Code]),
            "Slicing reverses strings in Python.",
        );
        let b = ScriptedBackend::ok(
            ModelCapabilities::new("b").with_strengths([Topic::Code]),
            "The reversed builtin also works.",
        );
        let uc = use_case(vec![a, b], RoutingPolicy::default());

        let response = uc
            .answer(&Query::new("How do I reverse a string in Python?").unwrap())
            .await;
        assert_eq!(response.models_used, vec!["a".to_string(), "b".to_string()]);
        assert!(response.text.contains("Slicing reverses strings in Python."));
    }

    #[tokio::test]
    async fn test_blank_message() {
        let only = ScriptedBackend::ok(ModelCapabilities::new("solo"), "unused");
        let uc = use_case(vec![only.clone()], RoutingPolicy::default());

        let response = uc.answer_text("   ").await;
        assert_eq!(response.text, "No message provided");
        assert!(response.models_used.is_empty());
        assert_eq!(only.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_pre_cancelled_token() {
        let only = ScriptedBackend::ok(ModelCapabilities::new("solo"), "hi");
        let uc = use_case(vec![only], RoutingPolicy::default());
        let token = CancellationToken::new();
        token.cancel();

        let result = uc
            .answer_with_cancellation(&Query::new("hello").unwrap(), &token, &NoProgress)
            .await;
        assert_eq!(result, Err(DomainError::Cancelled));
    }
}
