//! Router configuration from TOML (`[router]` section)

use chorus_domain::routing::{default_vocabulary, merge_vocabulary};
use chorus_domain::{PriorityOrder, RoutingPolicy, Topic, TopicVocabulary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw router configuration from TOML
///
/// # Example
///
/// ```toml
/// [router]
/// default_model = "openai"
/// multi_model = true
/// priority = ["openai", "anthropic", "google"]
/// max_models = 2
///
/// [router.topics]
/// code = ["kotlin", "terraform"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRouterConfig {
    /// Backend used when no topic is detected
    pub default_model: String,
    /// When false, a single backend answers every query
    pub multi_model: bool,
    /// Tie-break order, highest priority first
    pub priority: Vec<String>,
    pub strength_weight: i32,
    pub weakness_penalty: i32,
    /// Cap on the number of backends consulted per query
    pub max_models: Option<usize>,
    /// Extra keywords per topic
    pub topics: BTreeMap<String, Vec<String>>,
    /// Replace the built-in keywords of configured topics instead of extending them
    pub replace_topics: bool,
}

impl Default for FileRouterConfig {
    fn default() -> Self {
        Self {
            default_model: "openai".to_string(),
            multi_model: true,
            priority: vec![
                "openai".to_string(),
                "anthropic".to_string(),
                "google".to_string(),
            ],
            strength_weight: 1,
            weakness_penalty: 1,
            max_models: None,
            topics: BTreeMap::new(),
            replace_topics: false,
        }
    }
}

impl FileRouterConfig {
    pub fn priority_order(&self) -> PriorityOrder {
        PriorityOrder::new(self.priority.iter().cloned())
    }

    pub fn to_routing_policy(&self) -> RoutingPolicy {
        RoutingPolicy {
            default_model: self.default_model.clone(),
            multi_model: self.multi_model,
            priority: self.priority_order(),
            strength_weight: self.strength_weight,
            weakness_penalty: self.weakness_penalty,
            max_models: self.max_models,
        }
    }

    /// Built-in vocabulary merged with the configured topics
    pub fn vocabulary(&self) -> TopicVocabulary {
        let configured: TopicVocabulary = self
            .topics
            .iter()
            .map(|(topic, keywords)| {
                // Topic parsing is infallible; unknown names become custom topics
                let topic = topic.parse::<Topic>().unwrap_or_else(|never| match never {});
                (topic, keywords.clone())
            })
            .collect();
        merge_vocabulary(default_vocabulary(), configured, self.replace_topics)
    }
}
