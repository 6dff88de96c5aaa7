//! Component-signature query descriptors.
//!
//! A [`ComponentQuery`] declares which component names an entity must carry
//! (`with`) and which it must not (`without`). The registry evaluates it
//! against a per-call snapshot of the live entity set.

use serde::{Deserialize, Serialize};

/// Describes the component signature an entity must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentQuery {
    /// Component names the entity must have (all of them).
    pub with: Vec<String>,
    /// Component names the entity must NOT have (none of them).
    pub without: Vec<String>,
}

impl ComponentQuery {
    /// Create a new empty query, which matches every entity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a component name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>) -> Self {
        self.with.push(name.into());
        self
    }

    /// Exclude entities carrying a component name.
    #[must_use]
    pub fn without(mut self, name: impl Into<String>) -> Self {
        self.without.push(name.into());
        self
    }

    /// Evaluate the query against a membership predicate.
    pub fn matches(&self, has: impl Fn(&str) -> bool) -> bool {
        self.with.iter().all(|n| has(n.as_str())) && !self.without.iter().any(|n| has(n.as_str()))
    }
}

impl<S: Into<String>> FromIterator<S> for ComponentQuery {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            with: iter.into_iter().map(Into::into).collect(),
            without: Vec::new(),
        }
    }
}
