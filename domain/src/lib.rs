//! Domain layer for chorus
//!
//! Pure routing and fusion logic. No I/O and no async runtime: the
//! application layer drives backends and feeds their responses back here.
//!
//! # Core Concepts
//!
//! ## Routing
//!
//! A query is classified into topics, each registered model is scored by
//! its strengths and weaknesses on those topics, and the best-scoring models
//! are selected in priority order.
//!
//! ## Mixing
//!
//! When several models answer, their responses are fused by one of three
//! strategies: `best_parts` (default), `average` or `vote`.

pub mod capability;
pub mod config;
pub mod core;
pub mod mixing;
pub mod orchestration;
pub mod prompt;
pub mod routing;

pub use capability::{ModelCapabilities, Topic};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{error::DomainError, query::Query};
pub use mixing::{AgreementRule, MixStrategy, MixerConfig, ResponseMixer};
pub use orchestration::value_objects::{
    BackendFailure, BackendResult, FailureKind, FinalResponse, ModelAnswer, Outcome, ResponseSet,
};
pub use prompt::PromptTemplate;
pub use routing::{
    ClassifiedQuery, PriorityOrder, Router, RoutingPolicy, TopicClassifier, TopicVocabulary,
};
