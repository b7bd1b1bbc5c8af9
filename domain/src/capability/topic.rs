//! Topic value object used for routing

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A domain category a query can belong to (Value Object)
///
/// Backends declare topics as strengths or weaknesses; the classifier
/// detects topics in a query. Unknown names become [`Topic::Custom`] so a
/// configured vocabulary can introduce new categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topic {
    Code,
    Math,
    Creative,
    RecentEvents,
    Reasoning,
    GeneralKnowledge,
    Custom(String),
}

impl Topic {
    /// Get the canonical string identifier for this topic
    pub fn as_str(&self) -> &str {
        match self {
            Topic::Code => "code",
            Topic::Math => "math",
            Topic::Creative => "creative",
            Topic::RecentEvents => "recent_events",
            Topic::Reasoning => "reasoning",
            Topic::GeneralKnowledge => "general_knowledge",
            Topic::Custom(s) => s,
        }
    }

    /// The well-known topics, in a fixed order
    pub fn well_known() -> [Topic; 6] {
        [
            Topic::Code,
            Topic::Math,
            Topic::Creative,
            Topic::RecentEvents,
            Topic::Reasoning,
            Topic::GeneralKnowledge,
        ]
    }

    /// Check if this is a configured (non built-in) topic
    pub fn is_custom(&self) -> bool {
        matches!(self, Topic::Custom(_))
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Topic {
    type Err = std::convert::Infallible;

    /// Parse a topic name. Accepts the canonical snake_case names as well
    /// as the descriptive labels providers publish ("code generation",
    /// "very recent events", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Ok(match normalized.as_str() {
            "code" | "code_generation" | "coding" | "programming" => Topic::Code,
            "math" | "mathematics" | "mathematical_calculations" | "calculation" => Topic::Math,
            "creative" | "creative_writing" | "creativity" => Topic::Creative,
            "recent_events" | "very_recent_events" | "current_events" | "news" => {
                Topic::RecentEvents
            }
            "reasoning" | "logical_reasoning" | "logic" | "analysis" => Topic::Reasoning,
            "general_knowledge" | "general" | "knowledge" => Topic::GeneralKnowledge,
            _ => Topic::Custom(normalized),
        })
    }
}

impl Serialize for Topic {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Topic {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        // FromStr is infallible; unknown names become Custom(...)
        Ok(s.parse().unwrap_or(Topic::Custom(s)))
    }
}
