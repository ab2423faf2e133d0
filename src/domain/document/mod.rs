//! Path-addressed JSON documents.
//!
//! A [`JsonDocument`] always has an object root. Values are addressed with a
//! [`ConfigPath`]; lookups distinguish an absent location (`None`) from a
//! stored `null` (`Some(Value::Null)`). Key insertion order is preserved, so a
//! document read from disk is written back with untouched levels in their
//! original order.

mod leaves;
mod path;
#[cfg(test)]
pub(crate) mod strategies;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::AppError;

pub use leaves::{Leaf, Leaves};
pub use path::ConfigPath;

/// How `set` treats a path whose prefix addresses a non-object value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the blocking value with an object and continue.
    #[default]
    Restructure,
    /// Fail with [`AppError::PathCollision`].
    Reject,
}

/// A JSON configuration document with an object root.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonDocument {
    root: Map<String, Value>,
}

impl JsonDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value; only objects are accepted.
    pub fn from_value(value: Value) -> Result<Self, AppError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(AppError::NotADocument(format!("value of type {}", type_name(&other)))),
        }
    }

    /// Read a document from `path`.
    pub fn read(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path)?;
        let value: Value =
            serde_json::from_str(&content).map_err(|err| AppError::json(path, err))?;
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(AppError::NotADocument(path.display().to_string())),
        }
    }

    /// Write the document to `path`, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = self.to_pretty_string().map_err(|err| AppError::json(path, err))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Serialize with 4-space indentation and a single trailing newline.
    pub fn to_pretty_string(&self) -> Result<String, serde_json::Error> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.root.serialize(&mut serializer)?;
        buffer.push(b'\n');
        // serde_json only emits UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Value stored at `path`, or `None` when the location does not exist.
    pub fn get(&self, path: &ConfigPath) -> Option<&Value> {
        let (last, parents) = path.segments().split_last()?;
        let mut current = &self.root;
        for segment in parents {
            current = current.get(segment)?.as_object()?;
        }
        current.get(last)
    }

    pub fn contains(&self, path: &ConfigPath) -> bool {
        self.get(path).is_some()
    }

    /// Place `value` at `path`, creating missing intermediate objects.
    ///
    /// Sibling keys are preserved and an existing key keeps its position.
    pub fn insert(
        &mut self,
        path: &ConfigPath,
        value: Value,
        policy: CollisionPolicy,
    ) -> Result<(), AppError> {
        let Some((last, parents)) = path.segments().split_last() else {
            return Err(AppError::Validation("Cannot replace the document root".to_string()));
        };

        let mut current = &mut self.root;
        for (depth, segment) in parents.iter().enumerate() {
            let entry =
                current.entry(segment.clone()).or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                if policy == CollisionPolicy::Reject {
                    return Err(AppError::PathCollision {
                        path: path.to_string(),
                        at: path.prefix(depth + 1).to_string(),
                    });
                }
                tracing::debug!(
                    path = %path,
                    at = %path.prefix(depth + 1),
                    "restructuring scalar into object"
                );
                *entry = Value::Object(Map::new());
            }
            current = match entry {
                Value::Object(map) => map,
                _ => unreachable!("entry normalized to an object above"),
            };
        }

        current.insert(last.clone(), value);
        Ok(())
    }

    /// Copy of this document with `value` placed at `path`.
    pub fn with_value(
        &self,
        path: &ConfigPath,
        value: Value,
        policy: CollisionPolicy,
    ) -> Result<Self, AppError> {
        let mut next = self.clone();
        next.insert(path, value, policy)?;
        Ok(next)
    }

    /// Copy of this document with every `(path, value)` pair applied in order.
    ///
    /// A later pair overwrites an earlier one when their paths collide.
    pub fn with_values<I>(&self, entries: I, policy: CollisionPolicy) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (ConfigPath, Value)>,
    {
        let mut next = self.clone();
        for (path, value) in entries {
            next.insert(&path, value, policy)?;
        }
        Ok(next)
    }

    /// Depth-first iterator over every leaf, in key insertion order.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves::new(&self.root)
    }

    /// Rebuild a document from leaves.
    pub fn from_leaves<'a, I>(leaves: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = Leaf<'a>>,
    {
        let mut document = Self::new();
        for leaf in leaves {
            document.insert(&leaf.path, leaf.value.clone(), CollisionPolicy::Reject)?;
        }
        Ok(document)
    }
}

impl TryFrom<Value> for JsonDocument {
    type Error = AppError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
