//! Capability-based backend selection

use super::classifier::{ClassifiedQuery, TopicClassifier};
use super::priority::PriorityOrder;
use crate::capability::{ModelCapabilities, Topic};
use crate::core::error::DomainError;
use crate::core::query::Query;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Router configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingPolicy {
    /// Backend used when no topic is detected
    pub default_model: String,
    /// When false, exactly one backend is ever selected
    pub multi_model: bool,
    /// Tie-break order
    pub priority: PriorityOrder,
    /// Score added per detected topic listed in a backend's strengths
    pub strength_weight: i32,
    /// Score removed per detected topic listed in a backend's weaknesses
    pub weakness_penalty: i32,
    /// Optional cap on the number of backends consulted
    pub max_models: Option<usize>,
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self {
            default_model: "openai".to_string(),
            multi_model: true,
            priority: PriorityOrder::default(),
            strength_weight: 1,
            weakness_penalty: 1,
            max_models: None,
        }
    }
}

impl RoutingPolicy {
    pub fn with_default_model(mut self, name: impl Into<String>) -> Self {
        self.default_model = name.into();
        self
    }

    pub fn with_multi_model(mut self, enabled: bool) -> Self {
        self.multi_model = enabled;
        self
    }

    pub fn with_priority(mut self, priority: PriorityOrder) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_max_models(mut self, max: Option<usize>) -> Self {
        self.max_models = max;
        self
    }
}

/// Selects which backends answer a query.
///
/// Pure: the result depends only on the query, the candidates and the
/// policy.
#[derive(Debug, Clone)]
pub struct Router {
    classifier: TopicClassifier,
    policy: RoutingPolicy,
}

impl Router {
    pub fn new(classifier: TopicClassifier, policy: RoutingPolicy) -> Self {
        Self { classifier, policy }
    }

    pub fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    pub fn classify(&self, query: &Query) -> ClassifiedQuery {
        self.classifier.classify(query)
    }

    /// Score a backend against a set of detected topics
    pub fn score(&self, capabilities: &ModelCapabilities, topics: &BTreeSet<Topic>) -> i32 {
        let mut score = 0;
        for topic in topics {
            if capabilities.is_strong_at(topic) {
                score += self.policy.strength_weight;
            }
            if capabilities.is_weak_at(topic) {
                score -= self.policy.weakness_penalty;
            }
        }
        score
    }

    /// Classify and select in one step
    pub fn route(
        &self,
        query: &Query,
        candidates: &[ModelCapabilities],
    ) -> Result<Vec<ModelCapabilities>, DomainError> {
        self.select(&self.classify(query), candidates)
    }

    /// Select a non-empty, duplicate-free, ordered subset of `candidates`
    pub fn select(
        &self,
        query: &ClassifiedQuery,
        candidates: &[ModelCapabilities],
    ) -> Result<Vec<ModelCapabilities>, DomainError> {
        let candidates = unique_by_name(candidates);
        if candidates.is_empty() {
            return Err(DomainError::NoBackendAvailable);
        }

        if !query.has_topics() {
            let chosen = candidates
                .iter()
                .copied()
                .find(|c| c.name == self.policy.default_model)
                .or_else(|| {
                    self.policy
                        .priority
                        .highest(candidates.iter().map(|c| c.name.as_str()))
                        .map(|i| candidates[i])
                })
                .ok_or(DomainError::NoBackendAvailable)?;
            tracing::debug!(model = %chosen.name, "No topic detected, using default model");
            return Ok(vec![chosen.clone()]);
        }

        let scored: Vec<(i32, (usize, usize), &ModelCapabilities)> = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| {
                (
                    self.score(c, &query.topics),
                    self.policy.priority.rank(&c.name, i),
                    *c,
                )
            })
            .collect();

        for (score, _, caps) in &scored {
            tracing::debug!(model = %caps.name, score, "Routing score");
        }

        // candidates is non-empty, so a maximum exists
        let best = scored.iter().map(|(s, _, _)| *s).max().unwrap_or(0);

        let mut selected: Vec<_> = scored.into_iter().filter(|(s, _, _)| *s == best).collect();
        selected.sort_by_key(|(_, rank, _)| *rank);

        let mut limit = selected.len();
        if !self.policy.multi_model {
            limit = 1;
        }
        if let Some(max) = self.policy.max_models {
            limit = limit.min(max.max(1));
        }
        selected.truncate(limit);

        Ok(selected.into_iter().map(|(_, _, c)| c.clone()).collect())
    }
}

fn unique_by_name(candidates: &[ModelCapabilities]) -> Vec<&ModelCapabilities> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .filter(|c| seen.insert(c.name.as_str()))
        .collect()
}
