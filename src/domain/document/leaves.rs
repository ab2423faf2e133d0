use serde_json::{Map, Value, map};

use super::ConfigPath;

/// A terminal value together with its location.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf<'a> {
    pub path: ConfigPath,
    pub value: &'a Value,
}

/// Lazy depth-first traversal over the leaves of a document.
///
/// Objects are descended into; every other value, arrays included, is a leaf.
/// Empty objects yield nothing.
pub struct Leaves<'a> {
    stack: Vec<map::Iter<'a>>,
    prefix: Vec<String>,
}

impl<'a> Leaves<'a> {
    pub(super) fn new(root: &'a Map<String, Value>) -> Self {
        Self { stack: vec![root.iter()], prefix: Vec::new() }
    }
}

impl<'a> Iterator for Leaves<'a> {
    type Item = Leaf<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some((key, Value::Object(children))) => {
                    if !children.is_empty() {
                        self.prefix.push(key.clone());
                        self.stack.push(children.iter());
                    }
                }
                Some((key, value)) => {
                    let path = ConfigPath::new(self.prefix.iter().cloned().chain([key.clone()]));
                    return Some(Leaf { path, value });
                }
                None => {
                    self.stack.pop();
                    self.prefix.pop();
                }
            }
        }
    }
}
