use std::cmp::Ordering;

/// Published package version such as `1.2.3` or `v1.3.0-rc.1`.
///
/// Numeric parts compare numerically, missing parts count as zero, and a
/// pre-release sorts before the release it precedes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    parts: Vec<u32>,
    pre_release: Option<String>,
}

impl Version {
    /// Returns `None` if the core contains non-numeric segments.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().trim_start_matches('v');
        let (core, pre_release) = match normalized.split_once('-') {
            Some((core, pre)) if !pre.is_empty() => (core, Some(pre.to_string())),
            Some(_) => return None,
            None => (normalized, None),
        };
        let parts = core
            .split('.')
            .map(|segment| segment.parse::<u32>().ok())
            .collect::<Option<Vec<_>>>()?;
        Some(Self { parts, pre_release })
    }

    pub fn is_pre_release(&self) -> bool {
        self.pre_release.is_some()
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.parts.len().max(other.parts.len());
        for idx in 0..max_len {
            let left_value = *self.parts.get(idx).unwrap_or(&0);
            let right_value = *other.parts.get(idx).unwrap_or(&0);
            match left_value.cmp(&right_value) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        match (&self.pre_release, &other.pre_release) {
            (None, None) => Ordering::Equal,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(left), Some(right)) => left.cmp(right),
        }
    }
}
