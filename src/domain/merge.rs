//! Reconciliation of an old configuration with a freshly installed one.

use std::fmt;

use serde_json::Value;

use crate::domain::AppError;
use crate::domain::document::{CollisionPolicy, ConfigPath, JsonDocument};

/// An old leaf with no place in the new configuration: its path is absent,
/// or the new configuration holds a populated object there.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeMiss {
    pub path: ConfigPath,
    pub value: Value,
}

impl fmt::Display for MergeMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.value)
    }
}

/// Result of merging an old document into a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub document: JsonDocument,
    pub misses: Vec<MergeMiss>,
}

/// Apply every leaf of `old` onto `new` where `new` already has that path.
///
/// Leaves with no counterpart are collected as misses and never abort the
/// merge. A leaf never replaces a populated object of `new`. `new` is not
/// modified; the merged document is returned.
pub fn merge_documents(old: &JsonDocument, new: &JsonDocument) -> Result<MergeOutcome, AppError> {
    let mut document = new.clone();
    let mut misses = Vec::new();

    for leaf in old.leaves() {
        match document.get(&leaf.path) {
            Some(Value::Object(children)) if !children.is_empty() => {
                tracing::debug!(path = %leaf.path, "old leaf shadows a populated object");
                misses.push(MergeMiss { path: leaf.path, value: leaf.value.clone() });
            }
            Some(_) => {
                // every prefix of an existing path is an object
                document.insert(&leaf.path, leaf.value.clone(), CollisionPolicy::Reject)?;
            }
            None => misses.push(MergeMiss { path: leaf.path, value: leaf.value.clone() }),
        }
    }

    Ok(MergeOutcome { document, misses })
}

/// Every leaf of `old` reported as a miss, for when no new document exists.
pub fn all_misses(old: &JsonDocument) -> Vec<MergeMiss> {
    old.leaves().map(|leaf| MergeMiss { path: leaf.path, value: leaf.value.clone() }).collect()
}
