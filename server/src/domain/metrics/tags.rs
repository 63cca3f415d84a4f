//! Tag filtering policy
//!
//! Reserved tag keys (by default only `host`) are surfaced as dedicated record
//! attributes. The filter decides which of a metric's tags are attached to its
//! records as generic labels.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::model::Tag;

/// Tag key whose value becomes the record's host attribute
pub const HOST_TAG: &str = "host";

/// Which side of the reserved-key set is kept as generic tags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagFilterMode {
    /// Keep every tag whose key is not reserved
    #[default]
    Exclude,
    /// Keep only tags whose key is reserved
    Include,
}

impl fmt::Display for TagFilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagFilterMode::Exclude => write!(f, "exclude"),
            TagFilterMode::Include => write!(f, "include"),
        }
    }
}

/// Read-only tag policy shared by every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    mode: TagFilterMode,
    reserved: BTreeSet<String>,
}

impl Default for TagFilter {
    fn default() -> Self {
        Self::new(TagFilterMode::Exclude, [HOST_TAG])
    }
}

impl TagFilter {
    pub fn new<I, S>(mode: TagFilterMode, reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode,
            reserved: reserved.into_iter().map(Into::into).collect(),
        }
    }

    pub fn mode(&self) -> TagFilterMode {
        self.mode
    }

    pub fn reserved(&self) -> impl Iterator<Item = &str> {
        self.reserved.iter().map(String::as_str)
    }

    fn keeps(&self, key: &str) -> bool {
        let reserved = self.reserved.contains(key);
        match self.mode {
            TagFilterMode::Exclude => !reserved,
            TagFilterMode::Include => reserved,
        }
    }

    /// Filter a raw tag map. Output is ordered by key.
    pub fn apply(&self, tags: &BTreeMap<String, String>) -> Vec<Tag> {
        tags.iter()
            .filter(|(k, _)| self.keeps(k))
            .map(|(k, v)| Tag::new(k.as_str(), v.as_str()))
            .collect()
    }

    /// Filter an already-built tag sequence, keeping its order
    pub fn apply_tags(&self, tags: &[Tag]) -> Vec<Tag> {
        tags.iter().filter(|t| self.keeps(&t.key)).cloned().collect()
    }

    /// Host value and filtered tags for one metric
    pub fn split(&self, tags: &BTreeMap<String, String>) -> (String, Arc<[Tag]>) {
        let host = tags.get(HOST_TAG).cloned().unwrap_or_default();
        (host, Arc::from(self.apply(tags)))
    }
}
