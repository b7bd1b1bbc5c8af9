//! Mixer strategy selection

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How multiple backend responses are fused into one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MixStrategy {
    /// Assemble the most query-relevant, non-redundant sentences
    #[default]
    BestParts,
    /// Average numeric judgments; falls back to the highest-priority response
    Average,
    /// Keep claims a sufficient share of responses agree on
    Vote,
}

impl MixStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MixStrategy::BestParts => "best_parts",
            MixStrategy::Average => "average",
            MixStrategy::Vote => "vote",
        }
    }

    pub fn all() -> [MixStrategy; 3] {
        [MixStrategy::BestParts, MixStrategy::Average, MixStrategy::Vote]
    }
}

impl std::fmt::Display for MixStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MixStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "best_parts" | "bestparts" => Ok(MixStrategy::BestParts),
            "average" => Ok(MixStrategy::Average),
            "vote" => Ok(MixStrategy::Vote),
            _ => Err(DomainError::UnknownStrategy(s.to_string())),
        }
    }
}

impl Serialize for MixStrategy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MixStrategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
