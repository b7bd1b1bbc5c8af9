//! Keyword-based topic classification
//!
//! Deterministic and explainable: a topic is detected when one of its
//! keywords (or multi-word phrases) appears in the query as a whole word,
//! case-insensitively.

use crate::capability::Topic;
use crate::core::error::DomainError;
use crate::core::query::Query;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// Topic → keywords mapping
pub type TopicVocabulary = BTreeMap<Topic, Vec<String>>;

/// A query together with the topics detected in it
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedQuery {
    pub query: Query,
    pub topics: BTreeSet<Topic>,
}

impl ClassifiedQuery {
    pub fn has_topics(&self) -> bool {
        !self.topics.is_empty()
    }
}

/// Built-in keyword vocabulary
pub fn default_vocabulary() -> TopicVocabulary {
    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    let mut vocab = TopicVocabulary::new();
    vocab.insert(
        Topic::Code,
        words(&[
            "code", "coding", "program", "programming", "function", "method", "class",
            "python", "rust", "javascript", "typescript", "java", "golang", "c++", "sql",
            "compile", "compiler", "bug", "debug", "stack trace", "algorithm", "api",
            "script", "regex", "refactor", "unit test",
        ]),
    );
    vocab.insert(
        Topic::Math,
        words(&[
            "math", "mathematics", "calculate", "calculation", "equation", "integral",
            "derivative", "algebra", "geometry", "probability", "statistics", "solve",
            "percent", "percentage", "sum of", "square root",
        ]),
    );
    vocab.insert(
        Topic::Creative,
        words(&[
            "poem", "poetry", "story", "short story", "creative", "lyrics", "song",
            "fiction", "novel", "haiku", "imagine", "screenplay", "slogan",
        ]),
    );
    vocab.insert(
        Topic::RecentEvents,
        words(&[
            "news", "latest", "recent", "recently", "today", "yesterday", "this week",
            "current events", "currently", "breaking", "election results",
        ]),
    );
    vocab.insert(
        Topic::Reasoning,
        words(&[
            "why", "reason", "reasoning", "logic", "logical", "prove", "proof",
            "compare", "comparison", "pros and cons", "trade-off", "tradeoff", "analyze",
            "analyse", "evaluate",
        ]),
    );
    vocab.insert(
        Topic::GeneralKnowledge,
        words(&[
            "what is", "who is", "who was", "explain", "define", "definition", "history",
            "capital of", "meaning of",
        ]),
    );
    vocab
}

/// Merge configured vocabulary entries into a base vocabulary.
///
/// With `replace = false` the configured keywords extend the base list for
/// their topic; with `replace = true` they replace it.
pub fn merge_vocabulary(
    mut base: TopicVocabulary,
    configured: TopicVocabulary,
    replace: bool,
) -> TopicVocabulary {
    for (topic, keywords) in configured {
        let entry = base.entry(topic).or_default();
        if replace {
            entry.clear();
        }
        for keyword in keywords {
            if !entry.iter().any(|k| k.eq_ignore_ascii_case(&keyword)) {
                entry.push(keyword);
            }
        }
    }
    base
}

/// Classifies queries into topics by whole-word keyword matches
#[derive(Debug, Clone)]
pub struct TopicClassifier {
    patterns: Vec<(Topic, Regex)>,
}

impl TopicClassifier {
    /// Compile one pattern per topic.
    ///
    /// Topics with no non-blank keywords are ignored.
    pub fn new(vocabulary: &TopicVocabulary) -> Result<Self, DomainError> {
        let mut patterns = Vec::new();

        for (topic, keywords) in vocabulary {
            let alternatives: Vec<String> = keywords
                .iter()
                .map(|k| k.trim())
                .filter(|k| !k.is_empty())
                .map(|k| {
                    k.split_whitespace()
                        .map(regex::escape)
                        .collect::<Vec<_>>()
                        .join(r"\s+")
                })
                .collect();

            if alternatives.is_empty() {
                continue;
            }

            // \b fails next to non-word characters ("c++"), so delimit with \W instead
            let pattern = format!(r"(?i)(?:^|\W)(?:{})(?:$|\W)", alternatives.join("|"));
            let regex = Regex::new(&pattern)
                .map_err(|e| DomainError::InvalidVocabulary(format!("{}: {}", topic, e)))?;
            patterns.push((topic.clone(), regex));
        }

        Ok(Self { patterns })
    }

    /// Classifier with the built-in vocabulary
    pub fn with_default_vocabulary() -> Self {
        // The built-in keywords are escaped literals, so compilation cannot fail
        Self::new(&default_vocabulary()).unwrap_or(Self {
            patterns: Vec::new(),
        })
    }

    /// Detect the topics present in a piece of text
    pub fn detect(&self, text: &str) -> BTreeSet<Topic> {
        self.patterns
            .iter()
            .filter(|(_, regex)| regex.is_match(text))
            .map(|(topic, _)| topic.clone())
            .collect()
    }

    /// Classify a query
    pub fn classify(&self, query: &Query) -> ClassifiedQuery {
        ClassifiedQuery {
            query: query.clone(),
            topics: self.detect(query.content()),
        }
    }

    /// Topics this classifier knows how to detect
    pub fn topics(&self) -> impl Iterator<Item = &Topic> {
        self.patterns.iter().map(|(t, _)| t)
    }
}

impl Default for TopicClassifier {
    fn default() -> Self {
        Self::with_default_vocabulary()
    }
}
