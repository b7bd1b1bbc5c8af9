//! Query value object

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// A user query to be answered by one or more backends (Value Object)
///
/// Holds the opaque text only. Derived features (detected topics) are
/// computed per call by the classifier and never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    content: String,
}

impl Query {
    /// Create a new query, rejecting blank text
    pub fn new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::InvalidQuery(
                "query cannot be empty".to_string(),
            ));
        }
        Ok(Self { content })
    }

    /// Try to create a new query, returning None if invalid
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        Self::new(content).ok()
    }

    /// Get the query content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl std::str::FromStr for Query {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Query::new(s)
    }
}
