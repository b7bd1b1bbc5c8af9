//! End-to-end tests of the answer flow with in-memory backends.

use async_trait::async_trait;
use chorus_application::{
    AnswerQueryUseCase, Backend, BackendError, CapabilityRegistry, ExecutionParams, NoProgress,
    ProgressNotifier,
};
use chorus_domain::{
    AgreementRule, MixStrategy, MixerConfig, ModelCapabilities, PriorityOrder, Query,
    ResponseMixer, Router, RoutingPolicy, Topic, TopicClassifier,
};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

struct FakeBackend {
    capabilities: ModelCapabilities,
    reply: Result<String, BackendError>,
    delay: Duration,
}

impl FakeBackend {
    fn new(capabilities: ModelCapabilities, reply: &str) -> Arc<dyn Backend> {
        Arc::new(Self {
            capabilities,
            reply: Ok(reply.to_string()),
            delay: Duration::ZERO,
        })
    }

    fn slow(capabilities: ModelCapabilities, delay: Duration) -> Arc<dyn Backend> {
        Arc::new(Self {
            capabilities,
            reply: Ok("too late".to_string()),
            delay,
        })
    }
}

#[async_trait]
impl Backend for FakeBackend {
    fn capabilities(&self) -> &ModelCapabilities {
        &self.capabilities
    }

    async fn generate(&self, _: &str, _: Option<&str>) -> Result<String, BackendError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply.clone()
    }
}

#[derive(Default)]
struct RecordingProgress {
    events: Mutex<Vec<String>>,
}

impl ProgressNotifier for RecordingProgress {
    fn on_route(&self, _topics: &BTreeSet<Topic>, selected: &[ModelCapabilities]) {
        let names: Vec<_> = selected.iter().map(|c| c.name.as_str()).collect();
        self.events
            .lock()
            .unwrap()
            .push(format!("route:{}", names.join(",")));
    }

    fn on_backend_complete(&self, backend: &str, success: bool) {
        self.events
            .lock()
            .unwrap()
            .push(format!("done:{}:{}", backend, success));
    }

    fn on_mix(&self, strategy: MixStrategy, responses: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("mix:{}:{}", strategy, responses));
    }
}

fn build(
    backends: Vec<Arc<dyn Backend>>,
    policy: RoutingPolicy,
    mixer: MixerConfig,
    params: ExecutionParams,
) -> AnswerQueryUseCase {
    let mut builder = CapabilityRegistry::builder();
    for backend in backends {
        builder = builder.register(backend).unwrap();
    }
    AnswerQueryUseCase::new(
        Arc::new(builder.build()),
        Router::new(TopicClassifier::default(), policy),
        ResponseMixer::new(mixer).unwrap(),
        params,
    )
    .unwrap()
}

fn default_trio() -> Vec<Arc<dyn Backend>> {
    vec![
        FakeBackend::new(
            ModelCapabilities::new("openai")
                .with_strengths([Topic::GeneralKnowledge, Topic::Code, Topic::Creative, Topic::Reasoning])
                .with_weaknesses([Topic::RecentEvents, Topic::Math]),
            "OpenAI answer.",
        ),
        FakeBackend::new(
            ModelCapabilities::new("anthropic")
                .with_strengths([Topic::Reasoning, Topic::Creative, Topic::Code, Topic::GeneralKnowledge])
                .with_weaknesses([Topic::RecentEvents]),
            "Anthropic answer.",
        ),
        FakeBackend::new(
            ModelCapabilities::new("google")
                .with_strengths([Topic::RecentEvents, Topic::Math, Topic::GeneralKnowledge])
                .with_weaknesses([Topic::Creative]),
            "Google answer.",
        ),
    ]
}

#[tokio::test]
async fn recent_events_go_to_google() {
    let uc = build(
        default_trio(),
        RoutingPolicy::default(),
        MixerConfig::default(),
        ExecutionParams::default(),
    );
    let response = uc
        .answer(&Query::new("What are the latest news headlines today?").unwrap())
        .await;
    assert_eq!(response.models_used, vec!["google".to_string()]);
    assert_eq!(response.text, "Google answer.");
}

#[tokio::test]
async fn no_topic_uses_default_model() {
    let uc = build(
        default_trio(),
        RoutingPolicy::default().with_default_model("anthropic"),
        MixerConfig::default(),
        ExecutionParams::default(),
    );
    let response = uc.answer(&Query::new("hello").unwrap()).await;
    assert_eq!(response.models_used, vec!["anthropic".to_string()]);
}

#[tokio::test]
async fn single_mode_picks_priority_winner() {
    let uc = build(
        default_trio(),
        RoutingPolicy::default()
            .with_multi_model(false)
            .with_priority(PriorityOrder::new(["anthropic", "openai"])),
        MixerConfig::default(),
        ExecutionParams::default(),
    );
    let response = uc
        .answer(&Query::new("Write a poem about a rust compiler").unwrap())
        .await;
    assert_eq!(response.models_used, vec!["anthropic".to_string()]);
}

#[tokio::test]
async fn vote_strategy_keeps_shared_claim() {
    let backends = vec![
        FakeBackend::new(
            ModelCapabilities::new("a").with_strengths([Topic::GeneralKnowledge]),
            "Paris is the capital of France. It has many museums.",
        ),
        FakeBackend::new(
            ModelCapabilities::new("b").with_strengths([Topic::GeneralKnowledge]),
            "The capital of France is Paris.",
        ),
        FakeBackend::new(
            ModelCapabilities::new("c").with_strengths([Topic::GeneralKnowledge]),
            "France's capital is Paris. Lyon is smaller.",
        ),
    ];
    let uc = build(
        backends,
        RoutingPolicy::default(),
        MixerConfig::default()
            .with_strategy(MixStrategy::Vote)
            .with_vote_rule(AgreementRule::Majority),
        ExecutionParams::default(),
    );
    let response = uc
        .answer(&Query::new("What is the capital of France?").unwrap())
        .await;
    assert_eq!(response.models_used.len(), 3);
    assert_eq!(response.text, "Paris is the capital of France.");
}

#[tokio::test]
async fn slow_backend_times_out_without_blocking_others() {
    let backends = vec![
        FakeBackend::slow(
            ModelCapabilities::new("slow").with_strengths([Topic::Math]),
            Duration::from_secs(5),
        ),
        FakeBackend::new(
            ModelCapabilities::new("quick").with_strengths([Topic::Math]),
            "42",
        ),
    ];
    let uc = build(
        backends,
        RoutingPolicy::default(),
        MixerConfig::default(),
        ExecutionParams::default().with_default_timeout(Duration::from_millis(50)),
    );
    let response = uc
        .answer(&Query::new("calculate the integral of x").unwrap())
        .await;
    assert_eq!(response.models_used, vec!["quick".to_string()]);
    assert_eq!(response.text, "42");
}

#[tokio::test]
async fn cancellation_returns_cancelled() {
    let backends = vec![FakeBackend::slow(
        ModelCapabilities::new("slow"),
        Duration::from_secs(5),
    )];
    let uc = build(
        backends,
        RoutingPolicy::default(),
        MixerConfig::default(),
        ExecutionParams::default(),
    );
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let result = uc
        .answer_with_cancellation(&Query::new("hello").unwrap(), &token, &NoProgress)
        .await;
    assert!(result.unwrap_err().is_cancelled());
}

#[tokio::test]
async fn progress_sees_route_completion_and_mix() {
    let backends = vec![
        FakeBackend::new(
            ModelCapabilities::new("a").with_strengths([Topic::Code]),
            "Use iterators.",
        ),
        FakeBackend::new(
            ModelCapabilities::new("b").with_strengths([Topic::Code]),
            "Prefer slices.",
        ),
    ];
    let uc = build(
        backends,
        RoutingPolicy::default(),
        MixerConfig::default(),
        ExecutionParams::default(),
    );
    let progress = RecordingProgress::default();
    uc.answer_with_progress(&Query::new("refactor this rust code").unwrap(), &progress)
        .await;

    let events = progress.events.lock().unwrap().clone();
    assert_eq!(events.first().map(String::as_str), Some("route:a,b"));
    assert!(events.contains(&"done:a:true".to_string()));
    assert!(events.contains(&"done:b:true".to_string()));
    assert_eq!(events.last().map(String::as_str), Some("mix:best_parts:2"));
}
