//! Static capability descriptor of a backend

use super::topic::Topic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What a backend declares about itself (Value Object)
///
/// Created once when the adapter is constructed and never mutated.
/// `name` is the unique backend identifier used throughout routing and in
/// `models_used`; `model` is the provider's opaque model identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCapabilities {
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub strengths: BTreeSet<Topic>,
    #[serde(default)]
    pub weaknesses: BTreeSet<Topic>,
    #[serde(default, rename = "cost_per_1k_tokens")]
    pub cost_per_thousand_tokens: f64,
}

impl ModelCapabilities {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: String::new(),
            strengths: BTreeSet::new(),
            weaknesses: BTreeSet::new(),
            cost_per_thousand_tokens: 0.0,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_strengths(mut self, topics: impl IntoIterator<Item = Topic>) -> Self {
        self.strengths = topics.into_iter().collect();
        self
    }

    pub fn with_weaknesses(mut self, topics: impl IntoIterator<Item = Topic>) -> Self {
        self.weaknesses = topics.into_iter().collect();
        self
    }

    pub fn with_cost(mut self, cost_per_thousand_tokens: f64) -> Self {
        self.cost_per_thousand_tokens = cost_per_thousand_tokens;
        self
    }

    pub fn is_strong_at(&self, topic: &Topic) -> bool {
        self.strengths.contains(topic)
    }

    pub fn is_weak_at(&self, topic: &Topic) -> bool {
        self.weaknesses.contains(topic)
    }
}
