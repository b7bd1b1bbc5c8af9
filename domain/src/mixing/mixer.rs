//! Response mixer - fuses several successful responses into one text

use super::best_parts::ranked_sources;
use super::rule::AgreementRule;
use super::strategy::MixStrategy;
use super::{average, best_parts, vote};
use crate::core::error::DomainError;
use crate::core::query::Query;
use crate::orchestration::value_objects::ModelAnswer;
use crate::routing::PriorityOrder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Mixer settings, validated once at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixerConfig {
    pub strategy: MixStrategy,
    /// best_parts: maximum overlap with an accepted unit
    pub redundancy_threshold: f64,
    /// vote: minimum overlap for two claims to count as the same
    pub vote_similarity: f64,
    pub vote_rule: AgreementRule,
    /// best_parts: maximum number of units in the output
    pub max_units: usize,
    /// Source order used for ties and fallbacks
    pub priority: PriorityOrder,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            strategy: MixStrategy::BestParts,
            redundancy_threshold: 0.6,
            vote_similarity: 0.5,
            vote_rule: AgreementRule::Majority,
            max_units: 12,
            priority: PriorityOrder::default(),
        }
    }
}

impl MixerConfig {
    pub fn with_strategy(mut self, strategy: MixStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_priority(mut self, priority: PriorityOrder) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_vote_rule(mut self, rule: AgreementRule) -> Self {
        self.vote_rule = rule;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        for (name, value) in [
            ("redundancy_threshold", self.redundancy_threshold),
            ("vote_similarity", self.vote_similarity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(DomainError::InvalidThreshold { name, value });
            }
        }
        if self.max_units == 0 {
            return Err(DomainError::InvalidThreshold {
                name: "max_units",
                value: 0.0,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ResponseMixer {
    config: MixerConfig,
}

impl ResponseMixer {
    pub fn new(config: MixerConfig) -> Result<Self, DomainError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MixerConfig {
        &self.config
    }

    pub fn strategy(&self) -> MixStrategy {
        self.config.strategy
    }

    /// Fuse `responses` into one text.
    ///
    /// Callers pass two or more responses; one is returned as is and none
    /// yields an empty string. Every strategy falls back to the
    /// highest-priority response when it cannot produce anything.
    pub fn mix(&self, responses: &[ModelAnswer], query: &Query) -> String {
        match responses {
            [] => return String::new(),
            [only] => return only.text.clone(),
            _ => {}
        }

        let config = &self.config;
        let fused = match config.strategy {
            MixStrategy::BestParts => best_parts::fuse(
                responses,
                query,
                &config.priority,
                config.redundancy_threshold,
                config.max_units,
            ),
            MixStrategy::Average => {
                let averaged = average::fuse(responses);
                if averaged.is_none() {
                    info!("average: responses are not all numeric, using highest-priority response");
                }
                averaged
            }
            MixStrategy::Vote => vote::fuse(
                responses,
                &config.priority,
                config.vote_similarity,
                &config.vote_rule,
            ),
        };

        fused.unwrap_or_else(|| {
            let fallback = self.highest_priority(responses);
            debug!(
                strategy = %config.strategy,
                backend = %fallback.backend,
                "Mixer fell back to highest-priority response"
            );
            fallback.text.clone()
        })
    }

    fn highest_priority<'a>(&self, responses: &'a [ModelAnswer]) -> &'a ModelAnswer {
        let index = ranked_sources(responses, &self.config.priority)
            .first()
            .copied()
            .unwrap_or(0);
        &responses[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(items: &[(&str, &str)]) -> Vec<ModelAnswer> {
        items.iter().map(|(b, t)| ModelAnswer::new(*b, *t)).collect()
    }

    fn mixer(strategy: MixStrategy) -> ResponseMixer {
        ResponseMixer::new(MixerConfig::default().with_strategy(strategy)).unwrap()
    }

    #[test]
    fn test_single_and_empty() {
        let query = Query::new("hello").unwrap();
        let m = mixer(MixStrategy::Vote);
        assert_eq!(m.mix(&[], &query), "");
        assert_eq!(m.mix(&answers(&[("a", "only one")]), &query), "only one");
    }

    #[test]
    fn test_average_falls_back_to_priority() {
        let query = Query::new("rate this").unwrap();
        let m = ResponseMixer::new(
            MixerConfig::default()
                .with_strategy(MixStrategy::Average)
                .with_priority(PriorityOrder::new(["b", "a"])),
        )
        .unwrap();
        let out = m.mix(&answers(&[("a", "8"), ("b", "Pretty good overall.")]), &query);
        assert_eq!(out, "Pretty good overall.");
    }

    #[test]
    fn test_average_numeric() {
        let query = Query::new("rate this").unwrap();
        let out = mixer(MixStrategy::Average).mix(&answers(&[("a", "8/10"), ("b", "6/10")]), &query);
        assert_eq!(out, "7/10");
    }

    #[test]
    fn test_vote_fallback_without_agreement() {
        let query = Query::new("animals").unwrap();
        let out = mixer(MixStrategy::Vote).mix(
            &answers(&[("a", "Cats purr."), ("b", "Dogs bark.")]),
            &query,
        );
        assert_eq!(out, "Cats purr.");
    }

    #[test]
    fn test_best_parts_is_deterministic() {
        let query = Query::new("explain rust ownership").unwrap();
        let responses = answers(&[
            ("a", "Ownership is Rust's memory model. Values have one owner."),
            ("b", "Rust frees values when the owner goes out of scope."),
        ]);
        let m = mixer(MixStrategy::BestParts);
        assert_eq!(m.mix(&responses, &query), m.mix(&responses, &query));
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let config = MixerConfig {
            redundancy_threshold: 1.5,
            ..MixerConfig::default()
        };
        assert_eq!(
            ResponseMixer::new(config).unwrap_err(),
            DomainError::InvalidThreshold {
                name: "redundancy_threshold",
                value: 1.5
            }
        );

        let config = MixerConfig {
            max_units: 0,
            ..MixerConfig::default()
        };
        assert!(ResponseMixer::new(config).is_err());
    }
}
