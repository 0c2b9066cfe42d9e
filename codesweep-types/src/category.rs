use crate::change::TextChange;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a class of detectable issue (a rule id).
///
/// Many-to-one with feature flags: one flag may map to several categories,
/// and the same category may appear under more than one flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Full-document set of proposed edits for one category, produced by fix
/// discovery and consumed exactly once per category per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixCollection {
    pub category: CategoryId,
    pub edits: Vec<TextChange>,
}

impl FixCollection {
    pub fn new(category: CategoryId, edits: Vec<TextChange>) -> Self {
        Self { category, edits }
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}
