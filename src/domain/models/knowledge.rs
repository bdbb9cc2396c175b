//! Knowledge fragments stored in the vector-backed collections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single document in a knowledge collection.
///
/// IDs are unique within their collection; re-upserting an existing ID
/// replaces the stored content wholesale, it never merges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeFragment {
    pub id: String,
    pub text: String,
    /// Flat string metadata, e.g. `source`, `topic`, `depth`.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl KnowledgeFragment {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata tag.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Single key-equality filter applied to fragment metadata during queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataFilter {
    pub key: String,
    pub value: String,
}

impl MetadataFilter {
    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Whether a fragment's metadata satisfies this filter.
    pub fn matches(&self, metadata: &BTreeMap<String, String>) -> bool {
        metadata.get(&self.key).is_some_and(|v| v == &self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_filter_matches_exact_value() {
        let fragment = KnowledgeFragment::new("p1", "a pattern")
            .with_metadata("topic", "trust")
            .with_metadata("depth", "3");

        assert!(MetadataFilter::equals("topic", "trust").matches(&fragment.metadata));
        assert!(!MetadataFilter::equals("topic", "power").matches(&fragment.metadata));
        assert!(!MetadataFilter::equals("missing", "x").matches(&fragment.metadata));
    }
}
