use std::fmt;
use std::str::FromStr;

use crate::domain::AppError;

/// Location inside a configuration document, addressed by object keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ConfigPath {
    segments: Vec<String>,
}

impl ConfigPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { segments: segments.into_iter().map(Into::into).collect() }
    }

    /// Parse a dotted path such as `conjoon.application.title`.
    pub fn parse(dotted: &str) -> Result<Self, AppError> {
        if dotted.is_empty() {
            return Err(AppError::Validation("Config path must not be empty".to_string()));
        }
        let segments: Vec<String> = dotted.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(AppError::Validation(format!(
                "Config path '{}' contains an empty segment",
                dotted
            )));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Path extended by one trailing segment.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Leading `len` segments of this path.
    pub fn prefix(&self, len: usize) -> Self {
        Self { segments: self.segments[..len.min(self.segments.len())].to_vec() }
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for ConfigPath {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
