//! Execute backends use case
//!
//! Fans a query out to the selected backends concurrently and collects one
//! result per backend.

use crate::config::ExecutionParams;
use crate::ports::backend::Backend;
use crate::ports::progress::ProgressNotifier;
use chorus_domain::{
    BackendFailure, BackendResult, DomainError, FailureKind, Outcome, Query, ResponseSet,
};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runs backends concurrently, each under its own timeout
#[derive(Debug, Clone, Default)]
pub struct ExecutionCoordinator {
    params: ExecutionParams,
}

impl ExecutionCoordinator {
    pub fn new(params: ExecutionParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ExecutionParams {
        &self.params
    }

    /// Invoke every backend with `query` and wait for all of them to settle.
    ///
    /// The returned set holds exactly one result per backend, in the order
    /// given. A failing or slow backend never affects its siblings. When
    /// `cancel` fires first, in-flight invocations are aborted and
    /// [`DomainError::Cancelled`] is returned.
    pub async fn execute(
        &self,
        backends: &[Arc<dyn Backend>],
        query: &Query,
        cancel: Option<&CancellationToken>,
        progress: &dyn ProgressNotifier,
    ) -> Result<ResponseSet, DomainError> {
        info!("Invoking {} backend(s)", backends.len());

        let mut join_set = JoinSet::new();
        for (index, backend) in backends.iter().enumerate() {
            let backend = Arc::clone(backend);
            let prompt = query.content().to_string();
            let system_prompt = self.params.system_prompt.clone();
            let limit = self.params.timeout_for(backend.name());

            join_set.spawn(async move {
                let call = backend.generate(&prompt, system_prompt.as_deref());
                let outcome = match tokio::time::timeout(limit, call).await {
                    Ok(Ok(text)) => Outcome::Success(text),
                    Ok(Err(e)) => Outcome::Failure(e.to_failure()),
                    Err(_) => Outcome::Failure(BackendFailure::timeout(limit)),
                };
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<BackendResult>> = vec![None; backends.len()];

        let collect = async {
            while let Some(joined) = join_set.join_next().await {
                match joined {
                    Ok((index, outcome)) => {
                        let name = backends[index].name();
                        match &outcome {
                            Outcome::Success(text) => {
                                info!("Backend {} responded ({} chars)", name, text.len());
                                progress.on_backend_complete(name, true);
                            }
                            Outcome::Failure(failure) => {
                                warn!("Backend {} failed: {}", name, failure);
                                progress.on_backend_complete(name, false);
                            }
                        }
                        slots[index] = Some(BackendResult {
                            backend: name.to_string(),
                            outcome,
                        });
                    }
                    Err(e) => {
                        warn!("Task join error: {}", e);
                    }
                }
            }
        };

        let cancelled = match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => true,
                _ = collect => false,
            },
            None => {
                collect.await;
                false
            }
        };

        if cancelled {
            join_set.abort_all();
            info!("Query cancelled, aborted in-flight backends");
            return Err(DomainError::Cancelled);
        }

        let results = slots
            .into_iter()
            .zip(backends)
            .map(|(slot, backend)| {
                slot.unwrap_or_else(|| {
                    debug!("Backend {} produced no result", backend.name());
                    progress.on_backend_complete(backend.name(), false);
                    BackendResult::failure(
                        backend.name(),
                        BackendFailure::new(FailureKind::Aborted, "invocation aborted"),
                    )
                })
            })
            .collect();

        Ok(ResponseSet::new(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::backend::BackendError;
    use crate::ports::progress::NoProgress;
    use async_trait::async_trait;
    use chorus_domain::{ModelCapabilities, Topic};
    use std::collections::BTreeSet;
    use std::sync::Mutex;
    use std::time::Duration;

    enum Behavior {
        Reply(&'static str),
        Fail(BackendError),
        Sleep(Duration),
        Panic,
    }

    struct MockBackend {
        capabilities: ModelCapabilities,
        behavior: Behavior,
        seen_system_prompt: Mutex<Option<String>>,
    }

    impl MockBackend {
        fn new(name: &str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                capabilities: ModelCapabilities::new(name),
                behavior,
                seen_system_prompt: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl Backend for MockBackend {
        fn capabilities(&self) -> &ModelCapabilities {
            &self.capabilities
        }

        async fn generate(
            &self,
            _prompt: &str,
            system_prompt: Option<&str>,
        ) -> Result<String, BackendError> {
            *self.seen_system_prompt.lock().unwrap() = system_prompt.map(str::to_string);
            match &self.behavior {
                Behavior::Reply(text) => Ok(text.to_string()),
                Behavior::Fail(e) => Err(e.clone()),
                Behavior::Sleep(d) => {
                    tokio::time::sleep(*d).await;
                    Ok("late".to_string())
                }
                Behavior::Panic => panic!("backend exploded"),
            }
        }
    }

    fn query() -> Query {
        Query::new("hello").unwrap()
    }

    fn as_dyn(backends: Vec<Arc<MockBackend>>) -> Vec<Arc<dyn Backend>> {
        backends.into_iter().map(|b| b as Arc<dyn Backend>).collect()
    }

    #[tokio::test]
    async fn test_results_in_invocation_order() {
        let backends = as_dyn(vec![
            MockBackend::new("slow", Behavior::Sleep(Duration::from_millis(50))),
            MockBackend::new("fast", Behavior::Reply("quick")),
        ]);
        let set = ExecutionCoordinator::default()
            .execute(&backends, &query(), None, &NoProgress)
            .await
            .unwrap();

        let names: Vec<_> = set.results().iter().map(|r| r.backend.as_str()).collect();
        assert_eq!(names, vec!["slow", "fast"]);
        assert!(set.results().iter().all(|r| r.is_success()));
    }

    #[tokio::test]
    async fn test_failure_isolated() {
        let backends = as_dyn(vec![
            MockBackend::new("bad", Behavior::Fail(BackendError::Transport("reset".into()))),
            MockBackend::new("good", Behavior::Reply("fine")),
        ]);
        let set = ExecutionCoordinator::default()
            .execute(&backends, &query(), None, &NoProgress)
            .await
            .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(
            set.get("bad").and_then(|r| r.failure_ref()).map(|f| f.kind),
            Some(FailureKind::Transport)
        );
        assert_eq!(set.successes()[0].text, "fine");
    }

    #[tokio::test]
    async fn test_timeout_recorded() {
        let params = ExecutionParams::default()
            .with_backend_timeout("sleepy", Duration::from_millis(20));
        let backends = as_dyn(vec![
            MockBackend::new("sleepy", Behavior::Sleep(Duration::from_secs(5))),
            MockBackend::new("awake", Behavior::Reply("here")),
        ]);
        let set = ExecutionCoordinator::new(params)
            .execute(&backends, &query(), None, &NoProgress)
            .await
            .unwrap();

        let failure = set.get("sleepy").and_then(|r| r.failure_ref()).unwrap();
        assert_eq!(failure.kind, FailureKind::Timeout);
        assert!(set.get("awake").unwrap().is_success());
    }

    #[tokio::test]
    async fn test_panic_becomes_aborted() {
        let backends = as_dyn(vec![
            MockBackend::new("boom", Behavior::Panic),
            MockBackend::new("calm", Behavior::Reply("ok")),
        ]);
        let set = ExecutionCoordinator::default()
            .execute(&backends, &query(), None, &NoProgress)
            .await
            .unwrap();

        assert_eq!(set.results()[0].backend, "boom");
        assert_eq!(
            set.results()[0].failure_ref().map(|f| f.kind),
            Some(FailureKind::Aborted)
        );
        assert!(set.results()[1].is_success());
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl ProgressNotifier for RecordingProgress {
        fn on_route(&self, _topics: &BTreeSet<Topic>, _selected: &[ModelCapabilities]) {}

        fn on_backend_complete(&self, backend: &str, success: bool) {
            self.events
                .lock()
                .unwrap()
                .push(format!("{}:{}", backend, success));
        }
    }

    #[tokio::test]
    async fn test_panicked_backend_reported_to_progress() {
        let backends = as_dyn(vec![
            MockBackend::new("boom", Behavior::Panic),
            MockBackend::new("calm", Behavior::Reply("ok")),
        ]);
        let progress = RecordingProgress::default();
        ExecutionCoordinator::default()
            .execute(&backends, &query(), None, &progress)
            .await
            .unwrap();

        let events = progress.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.contains(&"boom:false".to_string()));
        assert!(events.contains(&"calm:true".to_string()));
    }

    #[tokio::test]
    async fn test_cancellation() {
        let backends = as_dyn(vec![MockBackend::new(
            "slow",
            Behavior::Sleep(Duration::from_secs(5)),
        )]);
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let result = ExecutionCoordinator::default()
            .execute(&backends, &query(), Some(&token), &NoProgress)
            .await;
        assert_eq!(result, Err(DomainError::Cancelled));
    }

    #[tokio::test]
    async fn test_system_prompt_forwarded() {
        let backend = MockBackend::new("a", Behavior::Reply("x"));
        let backends: Vec<Arc<dyn Backend>> = vec![backend.clone()];
        let params = ExecutionParams::default().with_system_prompt("be brief");
        ExecutionCoordinator::new(params)
            .execute(&backends, &query(), None, &NoProgress)
            .await
            .unwrap();

        assert_eq!(
            backend.seen_system_prompt.lock().unwrap().as_deref(),
            Some("be brief")
        );
    }
}
