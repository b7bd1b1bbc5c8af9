//! Configured backend priority order
//!
//! Used to break routing ties and by the mixer whenever it needs "the
//! highest-priority model". Backends not listed rank after all listed ones,
//! in the order they were given (registration or invocation order).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorityOrder {
    names: Vec<String>,
}

impl PriorityOrder {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Sort key for `name` found at `position` in its original sequence.
    ///
    /// Lower sorts first.
    pub fn rank(&self, name: &str, position: usize) -> (usize, usize) {
        let listed = self
            .names
            .iter()
            .position(|n| n == name)
            .unwrap_or(self.names.len());
        (listed, position)
    }

    /// Index of the highest-priority entry among `names`, if any
    pub fn highest<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Option<usize> {
        names
            .into_iter()
            .enumerate()
            .min_by_key(|(i, name)| self.rank(name, *i))
            .map(|(i, _)| i)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
